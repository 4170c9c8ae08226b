//! Allow-listed optional fields.
//!
//! Requests may carry optional attributes beyond the typed ones each
//! document declares. Only names listed in the document's schema are kept,
//! and each kept value must have the declared type. Unknown names follow the
//! configured `FieldPolicy`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ledgerbridge_shared::types::FieldPolicy;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

/// Type of an allow-listed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Free text.
    Text,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Decimal number (number or numeric string).
    Decimal,
    /// Whole number.
    Int,
    /// Boolean (`true`/`false` or `1`/`0`).
    Bool,
}

impl FieldType {
    /// Returns the name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Decimal => "decimal",
            Self::Int => "integer",
            Self::Bool => "boolean",
        }
    }
}

/// One allow-listed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as sent by the caller.
    pub name: &'static str,
    /// Expected type.
    pub kind: FieldType,
}

impl FieldSpec {
    /// Declares a field.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldType) -> Self {
        Self { name, kind }
    }
}

/// Errors raised while merging optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is not part of the document schema.
    #[error("Unknown field: {field}")]
    UnknownField {
        /// Field name.
        field: String,
    },

    /// The field value does not have the declared type.
    #[error("Field {field} must be a {expected}")]
    InvalidFieldType {
        /// Field name.
        field: String,
        /// Expected type name.
        expected: &'static str,
    },
}

/// Result of merging optional fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedFields {
    /// Recognized fields with normalized values.
    pub fields: BTreeMap<String, Value>,
    /// Unknown field names dropped under `FieldPolicy::Ignore`.
    pub ignored: Vec<String>,
}

/// Merges caller-supplied optional fields against an allow-list.
///
/// `null` values are treated as absent. Values are normalized: dates to
/// `YYYY-MM-DD`, decimals to strings, booleans from `0`/`1`.
pub fn merge_fields(
    schema: &[FieldSpec],
    input: &Map<String, Value>,
    policy: FieldPolicy,
) -> Result<MergedFields, FieldError> {
    let mut merged = MergedFields::default();

    for (name, value) in input {
        let Some(spec) = schema.iter().find(|s| s.name == name) else {
            match policy {
                FieldPolicy::Ignore => {
                    merged.ignored.push(name.clone());
                    continue;
                }
                FieldPolicy::Reject => {
                    return Err(FieldError::UnknownField { field: name.clone() });
                }
            }
        };

        if value.is_null() {
            continue;
        }

        let normalized = normalize(spec.kind, value).ok_or_else(|| FieldError::InvalidFieldType {
            field: name.clone(),
            expected: spec.kind.as_str(),
        })?;
        merged.fields.insert(name.clone(), normalized);
    }

    Ok(merged)
}

fn normalize(kind: FieldType, value: &Value) -> Option<Value> {
    match kind {
        FieldType::Text => value.as_str().map(|s| Value::String(s.to_string())),
        FieldType::Date => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        FieldType::Decimal => {
            let parsed = match value {
                Value::String(s) => s.trim().parse::<Decimal>().ok(),
                Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
                _ => None,
            };
            parsed.map(|d| Value::String(d.normalize().to_string()))
        }
        FieldType::Int => match value {
            Value::Number(n) => n.as_i64().map(Value::from),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        FieldType::Bool => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(Value::Bool(false)),
                Some(1) => Some(Value::Bool(true)),
                _ => None,
            },
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &[FieldSpec] = &[
        FieldSpec::new("title", FieldType::Text),
        FieldSpec::new("cheque_date", FieldType::Date),
        FieldSpec::new("write_off_amount", FieldType::Decimal),
        FieldSpec::new("is_opening", FieldType::Bool),
        FieldSpec::new("priority", FieldType::Int),
    ];

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_recognized_fields_are_normalized() {
        let input = object(json!({
            "title": "Rent",
            "cheque_date": "2026-03-01",
            "write_off_amount": 12.50,
            "is_opening": 1,
            "priority": "3"
        }));

        let merged = merge_fields(SCHEMA, &input, FieldPolicy::Reject).unwrap();

        assert_eq!(merged.fields["title"], json!("Rent"));
        assert_eq!(merged.fields["cheque_date"], json!("2026-03-01"));
        assert_eq!(merged.fields["write_off_amount"], json!("12.5"));
        assert_eq!(merged.fields["is_opening"], json!(true));
        assert_eq!(merged.fields["priority"], json!(3));
        assert!(merged.ignored.is_empty());
    }

    #[test]
    fn test_unknown_field_ignored() {
        let input = object(json!({ "titel": "typo", "title": "Rent" }));

        let merged = merge_fields(SCHEMA, &input, FieldPolicy::Ignore).unwrap();

        assert_eq!(merged.ignored, vec!["titel".to_string()]);
        assert_eq!(merged.fields.len(), 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let input = object(json!({ "titel": "typo" }));

        let err = merge_fields(SCHEMA, &input, FieldPolicy::Reject).unwrap_err();

        assert_eq!(
            err,
            FieldError::UnknownField {
                field: "titel".to_string()
            }
        );
        assert_eq!(err.to_string(), "Unknown field: titel");
    }

    #[test]
    fn test_wrong_type_rejected_under_any_policy() {
        let input = object(json!({ "cheque_date": "01/03/2026" }));

        for policy in [FieldPolicy::Ignore, FieldPolicy::Reject] {
            let err = merge_fields(SCHEMA, &input, policy).unwrap_err();
            assert_eq!(err.to_string(), "Field cheque_date must be a date");
        }
    }

    #[test]
    fn test_null_is_absent() {
        let input = object(json!({ "title": null }));

        let merged = merge_fields(SCHEMA, &input, FieldPolicy::Reject).unwrap();

        assert!(merged.fields.is_empty());
    }

    #[test]
    fn test_bool_rejects_other_numbers() {
        let input = object(json!({ "is_opening": 2 }));

        assert!(matches!(
            merge_fields(SCHEMA, &input, FieldPolicy::Ignore),
            Err(FieldError::InvalidFieldType { .. })
        ));
    }
}
