use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown object kind: {0}")]
    UnknownObjectKind(String),
    #[error("invalid UID root '{0}': expected digits separated by dots")]
    InvalidUidRoot(String),
    #[error("invalid setting {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
