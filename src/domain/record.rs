//! Record payloads stored in info lists.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Values that know how to present themselves as a tree node.
///
/// A tree node is displayed through the first value of its info list: the
/// label if there is one, the value's `Display` rendering otherwise.
pub trait Labelled {
    fn label(&self) -> Option<&str> {
        None
    }
}

impl Labelled for String {}
impl Labelled for &str {}

// Plain numbers render through `Display`.
macro_rules! unlabelled {
    ($($t:ty),*) => {
        $(impl Labelled for $t {})*
    };
}

unlabelled!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Numeric view of the value, `None` for text and booleans.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Bool(_) | AttrValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{}", x),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Default payload of an info list: an optional display label plus caller
/// attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }
}

impl Labelled for Record {
    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Renders every attribute as `key: value`, label first.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_none() && self.attributes.is_empty() {
            return f.write_str("(empty)");
        }
        let label = self.label.iter().map(|l| format!("label: {}", l));
        let attrs = self.attributes.iter().map(|(k, v)| format!("{}: {}", k, v));
        write!(f, "{}", label.chain(attrs).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display_lists_label_then_sorted_attributes() {
        let record = Record::labelled("enc")
            .with_attr("width", 512)
            .with_attr("act", "relu");
        assert_eq!(record.to_string(), "label: enc, act: relu, width: 512");
    }

    #[test]
    fn test_record_display_without_attributes() {
        assert_eq!(Record::new().to_string(), "(empty)");
        assert_eq!(Record::new().with_attr("n", 1).to_string(), "n: 1");
    }

    #[test]
    fn test_attr_value_numeric_view() {
        assert_eq!(AttrValue::from(3).as_f64(), Some(3.0));
        assert_eq!(AttrValue::from(0.5).as_f64(), Some(0.5));
        assert_eq!(AttrValue::from("x").as_f64(), None);
        assert_eq!(AttrValue::from(true).as_f64(), None);
    }

    #[test]
    fn test_label_falls_back_to_none_for_plain_values() {
        assert_eq!("plain".label(), None);
        assert_eq!(Record::labelled("x").label(), Some("x"));
    }
}
