//! Field value types used for filtered scans and unique indexes

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A polymorphic field value that can hold the column types of our records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Uuid(Uuid),
    Decimal(Decimal),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Canonical textual form, used as the key of unique indexes
    pub fn to_key(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Uuid(u) => u.to_string(),
            FieldValue::Decimal(d) => d.normalize().to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Compare against a raw value coming from a query string or path
    ///
    /// The raw value is parsed according to the variant, so `"100"` matches a
    /// decimal `100.00` and UUIDs match regardless of letter case.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            FieldValue::String(s) => s == raw,
            FieldValue::Uuid(u) => Uuid::parse_str(raw).is_ok_and(|other| other == *u),
            FieldValue::Decimal(d) => Decimal::from_str(raw).is_ok_and(|other| other == *d),
            FieldValue::Null => raw.is_empty(),
        }
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::String(value.clone())
    }
}

impl From<&Uuid> for FieldValue {
    fn from(value: &Uuid) -> Self {
        FieldValue::Uuid(*value)
    }
}

impl From<&Decimal> for FieldValue {
    fn from(value: &Decimal) -> Self {
        FieldValue::Decimal(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_uuid(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::Null;
        assert!(value.is_null());
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_decimal_matches_regardless_of_scale() {
        let value = FieldValue::from(&dec!(100.00));
        assert!(value.matches("100"));
        assert!(value.matches("100.0"));
        assert!(!value.matches("100.01"));
        assert!(!value.matches("abc"));
    }

    #[test]
    fn test_uuid_matches_uppercase_input() {
        let id = Uuid::new_v4();
        let value = FieldValue::from(&id);
        assert!(value.matches(&id.to_string().to_uppercase()));
        assert!(!value.matches("not-a-uuid"));
    }

    #[test]
    fn test_decimal_key_is_normalized() {
        assert_eq!(FieldValue::from(&dec!(42.50)).to_key(), "42.5");
    }
}
