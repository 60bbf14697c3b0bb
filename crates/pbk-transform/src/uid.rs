//! Identifier allocation for generated objects.
//!
//! Reproducible identifiers are a SHA-256 digest of their key parts written
//! as a decimal number under the configured root. The last three digits are
//! replaced with a role code so identifiers are distinguishable by kind:
//!
//! | Role | Code |
//! |---|---|
//! | CT image | slice ordinal, `001`.. |
//! | Structure set | plan id padded with `7` (`770`) |
//! | Plan | plan id padded with `9` (`990`) |
//! | Dose | plan id padded with `8` (`880`) |
//! | Frame of reference | `444` |
//! | Study | `555` |
//! | Series | `666` |

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::trace;
use uuid::Uuid;

/// Longest identifier the output format allows.
pub const MAX_UID_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UidRole {
    CtImage,
    StructureSet,
    Plan,
    Dose,
    FrameOfReference,
    Study,
    Series,
}

impl UidRole {
    pub fn tag(self) -> &'static str {
        match self {
            Self::CtImage => "CT",
            Self::StructureSet => "RS",
            Self::Plan => "RP",
            Self::Dose => "RD",
            Self::FrameOfReference => "Frame",
            Self::Study => "Study",
            Self::Series => "Series",
        }
    }

    /// Study and series identifiers only need to be unique within a run.
    pub fn is_reproducible(self) -> bool {
        !matches!(self, Self::Study | Self::Series)
    }

    fn code(self, index: u64) -> String {
        let index = index % 1000;
        match self {
            Self::CtImage => format!("{index:03}"),
            Self::StructureSet => format!("{index:7>3}"),
            Self::Plan => format!("{index:9>3}"),
            Self::Dose => format!("{index:8>3}"),
            Self::FrameOfReference => "444".to_string(),
            Self::Study => "555".to_string(),
            Self::Series => "666".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UidKey {
    role: UidRole,
    index: u64,
    parts: Vec<String>,
}

/// Per-run identifier cache.
///
/// The same role, index and key parts always yield the same identifier
/// within one allocator. One allocator serves exactly one conversion run.
#[derive(Debug, Clone)]
pub struct IdentityAllocator {
    prefix: String,
    cache: HashMap<UidKey, String>,
}

impl IdentityAllocator {
    /// Creates an allocator under `root`, with or without its trailing dot.
    pub fn new(root: &str) -> Self {
        Self {
            prefix: format!("{}.", root.trim_end_matches('.')),
            cache: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the identifier for `role`, `index` and `parts`, allocating it on
    /// first use.
    ///
    /// `index` feeds the role code: the slice ordinal for CT images, the
    /// plan id for structure sets, plans and doses.
    pub fn allocate(&mut self, role: UidRole, index: u64, parts: &[&str]) -> String {
        let key = UidKey {
            role,
            index,
            parts: parts.iter().map(|part| (*part).to_string()).collect(),
        };
        if let Some(existing) = self.cache.get(&key) {
            return existing.clone();
        }
        let number = if role.is_reproducible() {
            digest_number(role, parts)
        } else {
            Uuid::new_v4().as_u128()
        };
        let uid = self.compose(number, &role.code(index));
        trace!(role = role.tag(), uid = %uid, "allocated identifier");
        self.cache.insert(key, uid.clone());
        uid
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn compose(&self, number: u128, code: &str) -> String {
        // The top bit keeps the decimal form at 39 digits with no leading zero.
        let number = number | (1u128 << 127);
        let mut uid = format!("{}{number}", self.prefix);
        uid.truncate(MAX_UID_LEN);
        uid.truncate(uid.len() - code.len());
        uid.push_str(code);
        uid
    }
}

fn digest_number(role: UidRole, parts: &[&str]) -> u128 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.update(role.tag().as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(bytes)
}
