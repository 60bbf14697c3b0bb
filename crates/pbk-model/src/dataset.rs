//! Encoder-neutral output dataset: an ordered set of tagged attributes.
//!
//! Builders fill a [`Dataset`] with [`Element`]s; the encoder crate turns it
//! into the binary container. Elements are kept sorted by tag so every
//! dataset, and every sequence item, is already in canonical order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute tag as `(group, element)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag(pub u16, pub u16);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

/// Value representations used by the generated objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vr {
    AE,
    AS,
    AT,
    CS,
    DA,
    DS,
    DT,
    FD,
    FL,
    IS,
    LO,
    LT,
    OB,
    OW,
    PN,
    SH,
    SQ,
    SS,
    ST,
    TM,
    UI,
    UL,
    US,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Empty,
    /// Textual values, including decimal and integer strings.
    Text(Vec<String>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Bytes(Vec<u8>),
    Tags(Vec<Tag>),
    Sequence(Vec<Dataset>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Tag,
    pub vr: Vr,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    elements: BTreeMap<Tag, Element>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an element.
    pub fn put(&mut self, tag: Tag, vr: Vr, value: Value) -> &mut Self {
        self.elements.insert(tag, Element { tag, vr, value });
        self
    }

    pub fn put_empty(&mut self, tag: Tag, vr: Vr) -> &mut Self {
        self.put(tag, vr, Value::Empty)
    }

    /// Single textual value; an empty string is stored as an empty element.
    pub fn put_str(&mut self, tag: Tag, vr: Vr, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if value.is_empty() {
            return self.put_empty(tag, vr);
        }
        self.put(tag, vr, Value::Text(vec![value]))
    }

    pub fn put_strs<I, S>(&mut self, tag: Tag, vr: Vr, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.put_empty(tag, vr);
        }
        self.put(tag, vr, Value::Text(values))
    }

    /// Decimal string (DS).
    pub fn put_ds(&mut self, tag: Tag, value: f64) -> &mut Self {
        self.put(tag, Vr::DS, Value::Text(vec![format_decimal(value)]))
    }

    pub fn put_ds_values(&mut self, tag: Tag, values: &[f64]) -> &mut Self {
        self.put_strs(tag, Vr::DS, values.iter().map(|value| format_decimal(*value)))
    }

    /// Integer string (IS).
    pub fn put_is(&mut self, tag: Tag, value: i64) -> &mut Self {
        self.put(tag, Vr::IS, Value::Text(vec![value.to_string()]))
    }

    pub fn put_is_values(&mut self, tag: Tag, values: &[i64]) -> &mut Self {
        self.put_strs(tag, Vr::IS, values.iter().map(ToString::to_string))
    }

    pub fn put_u16(&mut self, tag: Tag, value: u16) -> &mut Self {
        self.put(tag, Vr::US, Value::U16(vec![value]))
    }

    pub fn put_i16(&mut self, tag: Tag, value: i16) -> &mut Self {
        self.put(tag, Vr::SS, Value::I16(vec![value]))
    }

    pub fn put_f32(&mut self, tag: Tag, value: f32) -> &mut Self {
        self.put(tag, Vr::FL, Value::F32(vec![value]))
    }

    pub fn put_sequence(&mut self, tag: Tag, items: Vec<Dataset>) -> &mut Self {
        self.put(tag, Vr::SQ, Value::Sequence(items))
    }

    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.elements.get(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.elements.contains_key(&tag)
    }

    /// All textual values of an element.
    pub fn texts(&self, tag: Tag) -> Option<&[String]> {
        match &self.get(tag)?.value {
            Value::Text(values) => Some(values),
            _ => None,
        }
    }

    /// First textual value of an element.
    pub fn text(&self, tag: Tag) -> Option<&str> {
        self.texts(tag)?.first().map(String::as_str)
    }

    pub fn items(&self, tag: Tag) -> Option<&[Dataset]> {
        match &self.get(tag)?.value {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Formats a decimal string value that fits the 16-character DS limit.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let plain = if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    };
    if plain.len() <= 16 {
        return plain;
    }
    for precision in (0..=10).rev() {
        let fixed = format!("{value:.precision$}");
        if fixed.len() <= 16 {
            return trim_fraction(fixed);
        }
    }
    format!("{value:.6e}")
}

fn trim_fraction(value: String) -> String {
    if !value.contains('.') {
        return value;
    }
    let trimmed = value.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
