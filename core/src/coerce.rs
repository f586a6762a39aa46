//! Raw data validation.
//!
//! The resolvers collect raw values as strings (and `true` for boolean
//! flags), nested by key-path. A [`Validator`] turns that raw object into
//! validated data: it coerces types, applies defaults and enforces
//! required, enum and length constraints. [`SchemaValidator`] is the
//! built-in implementation; callers can supply their own.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::{FieldKind, FieldSchema, LengthRange, ScalarKind, Schema};

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Key-path of the offending field, outermost first.
    pub path: Vec<String>,
    /// Message without the field name (`"is required"`).
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Ordered list of validation failures.
///
/// Never empty when returned from a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Convenience for validators that report one problem.
    pub fn single(path: Vec<String>, message: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue::new(path, message)])
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// First issue in schema order.
    pub fn first(&self) -> Option<&ValidationIssue> {
        self.issues.first()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", issue.path.join("."), issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Turns raw resolver output into validated data.
pub trait Validator: Send + Sync {
    /// Validates `raw` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns every issue found, ordered by schema declaration.
    fn validate(
        &self,
        raw: &Map<String, Value>,
        schema: &Schema,
    ) -> Result<Map<String, Value>, ValidationErrors>;
}

/// Built-in validator.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
/// use serde_json::{Map, json};
///
/// let schema = Schema::new()
///     .with_field(FieldSchema::number("retries").with_default(3))
///     .with_field(FieldSchema::string("user").required());
///
/// let mut raw = Map::new();
/// raw.insert("user".into(), json!("alice"));
/// let data = SchemaValidator.validate(&raw, &schema).unwrap();
/// assert_eq!(data["retries"], json!(3));
///
/// let errors = SchemaValidator.validate(&Map::new(), &schema).unwrap_err();
/// assert_eq!(errors.to_string(), "user: is required");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl Validator for SchemaValidator {
    fn validate(
        &self,
        raw: &Map<String, Value>,
        schema: &Schema,
    ) -> Result<Map<String, Value>, ValidationErrors> {
        let mut issues = Vec::new();
        let data = validate_fields(&schema.fields, raw, &[], &mut issues);
        if issues.is_empty() {
            Ok(data)
        } else {
            Err(ValidationErrors::new(issues))
        }
    }
}

fn validate_fields(
    fields: &[FieldSchema],
    raw: &Map<String, Value>,
    prefix: &[String],
    issues: &mut Vec<ValidationIssue>,
) -> Map<String, Value> {
    let mut out = Map::new();

    for field in fields {
        let mut path = prefix.to_vec();
        path.push(field.name.clone());

        let value = match raw.get(&field.name) {
            None | Some(Value::Null) => missing(field, &path, issues),
            Some(value) => match coerce(field, value, &path, issues) {
                Ok(value) => check_len(field, value, &path, issues),
                Err(message) => {
                    issues.push(ValidationIssue::new(path.clone(), message));
                    None
                }
            },
        };

        if let Some(value) = value {
            out.insert(field.name.clone(), value);
        }
    }

    out
}

fn missing(
    field: &FieldSchema,
    path: &[String],
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    if let FieldKind::Object { fields } = &field.kind {
        let nested = validate_fields(fields, &Map::new(), path, issues);
        return (!nested.is_empty()).then_some(Value::Object(nested));
    }
    if let Some(default) = &field.default {
        return Some(default.clone());
    }
    if field.required {
        issues.push(ValidationIssue::new(path.to_vec(), "is required"));
    }
    None
}

fn coerce(
    field: &FieldSchema,
    value: &Value,
    path: &[String],
    issues: &mut Vec<ValidationIssue>,
) -> Result<Value, String> {
    match &field.kind {
        FieldKind::Array { items } => {
            let values = match value {
                Value::Array(values) => values.as_slice(),
                other => std::slice::from_ref(other),
            };
            values
                .iter()
                .map(|v| coerce_scalar(*items, v))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        FieldKind::Object { fields } => match value {
            Value::Object(map) => Ok(Value::Object(validate_fields(fields, map, path, issues))),
            _ => Err("expects nested options".to_string()),
        },
        _ if value.is_array() => {
            let count = value.as_array().map_or(0, Vec::len);
            Err(format!("expects a single value, got {count}"))
        }
        FieldKind::String => coerce_scalar(ScalarKind::String, value),
        FieldKind::Number => coerce_scalar(ScalarKind::Number, value),
        FieldKind::Boolean => coerce_scalar(ScalarKind::Boolean, value),
        FieldKind::Enum { values } => {
            let text = as_text(value);
            if values.iter().any(|v| *v == text) {
                Ok(Value::String(text))
            } else {
                Err(format!("must be one of: {}, got `{text}`", values.join(", ")))
            }
        }
    }
}

fn coerce_scalar(kind: ScalarKind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (ScalarKind::String, _) => Ok(Value::String(as_text(value))),
        (ScalarKind::Number, Value::Number(_)) | (ScalarKind::Boolean, Value::Bool(_)) => {
            Ok(value.clone())
        }
        (ScalarKind::Number, _) => {
            let text = as_text(value);
            parse_number(&text).ok_or_else(|| format!("must be a number, got `{text}`"))
        }
        (ScalarKind::Boolean, _) => match as_text(value).as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(format!("must be true or false, got `{other}`")),
        },
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn check_len(
    field: &FieldSchema,
    value: Value,
    path: &[String],
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let Some(range) = field.len else {
        return Some(value);
    };
    let (len, unit) = match &value {
        Value::String(s) => (s.chars().count(), "characters"),
        Value::Array(items) => (items.len(), "values"),
        _ => return Some(value),
    };
    if range.contains(len) {
        Some(value)
    } else {
        issues.push(ValidationIssue::new(path.to_vec(), describe_len(range, unit)));
        None
    }
}

fn describe_len(range: LengthRange, unit: &str) -> String {
    match (range.min, range.max) {
        (Some(min), Some(max)) if min == max => format!("must be exactly {min} {unit}"),
        (Some(min), Some(max)) => format!("must be between {min} and {max} {unit}"),
        (Some(min), None) => format!("must be at least {min} {unit}"),
        (None, Some(max)) => format!("must be at most {max} {unit}"),
        (None, None) => format!("has an invalid number of {unit}"),
    }
}
