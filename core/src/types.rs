//! Field schema definitions for declarative argument parsing.
//!
//! A [`Schema`] is an ordered list of [`FieldSchema`] values. Each field
//! carries a discriminated [`FieldKind`] plus the metadata used for binding
//! (short alias, required flag, default) and for help output (description,
//! default description, secret flag). The types serialize with [`serde`] so
//! schemas can be written as JSON or YAML definition files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SchemaError;

/// Element type of an array field.
///
/// # Examples
///
/// ```
/// use command_args_core::ScalarKind;
///
/// assert_eq!(ScalarKind::default(), ScalarKind::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// Free-form text (the default).
    #[default]
    String,
    /// Integer or floating point number.
    Number,
    /// `true` / `false`.
    Boolean,
}

impl ScalarKind {
    /// Name used in help placeholders and validation messages.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
        }
    }
}

/// Value type of a field.
///
/// Serialized with a `type` tag, so `{"type": "enum", "values": ["a", "b"]}`
/// deserializes into [`FieldKind::Enum`].
///
/// # Examples
///
/// ```
/// use command_args_core::{FieldKind, ScalarKind};
///
/// let kind: FieldKind = serde_json::from_str(r#"{"type":"array","items":"number"}"#).unwrap();
/// assert_eq!(kind, FieldKind::Array { items: ScalarKind::Number });
/// assert!(FieldKind::Boolean.is_boolean());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Single text value.
    String,
    /// Single numeric value.
    Number,
    /// Presence flag; never consumes a value token.
    Boolean,
    /// Repeatable value; each occurrence appends one item.
    Array {
        #[serde(default)]
        items: ScalarKind,
    },
    /// One of a fixed set of strings.
    Enum { values: Vec<String> },
    /// Nested group of fields, flattened into dotted option names.
    Object { fields: Vec<FieldSchema> },
}

impl FieldKind {
    /// Returns `true` for boolean fields.
    pub fn is_boolean(&self) -> bool {
        matches!(self, FieldKind::Boolean)
    }

    /// Returns `true` for array fields.
    pub fn is_array(&self) -> bool {
        matches!(self, FieldKind::Array { .. })
    }

    /// Short type name used for value placeholders in help output.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Array { items } => items.name(),
            FieldKind::Enum { .. } => "choice",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// Inclusive length bounds written as `"6-"`, `"-10"`, `"3-8"` or `"5"`.
///
/// Applies to the character count of strings and to the item count of
/// arrays.
///
/// # Examples
///
/// ```
/// use command_args_core::LengthRange;
///
/// let range: LengthRange = "6-".parse().unwrap();
/// assert_eq!(range.min, Some(6));
/// assert_eq!(range.max, None);
/// assert!(range.contains(7));
/// assert!(!range.contains(5));
/// assert_eq!(range.to_string(), "6-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LengthRange {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthRange {
    /// Checks whether `len` lies within the bounds.
    pub fn contains(&self, len: usize) -> bool {
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }
}

impl FromStr for LengthRange {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidLength(s.to_string());
        let bound = |part: &str| -> Result<Option<usize>, SchemaError> {
            let part = part.trim();
            if part.is_empty() {
                Ok(None)
            } else {
                part.parse().map(Some).map_err(|_| invalid())
            }
        };

        let range = match s.split_once('-') {
            Some((min, max)) => Self {
                min: bound(min)?,
                max: bound(max)?,
            },
            None => {
                let exact = bound(s)?;
                Self {
                    min: exact,
                    max: exact,
                }
            }
        };

        match range {
            Self {
                min: None,
                max: None,
            } => Err(invalid()),
            Self {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(invalid()),
            range => Ok(range),
        }
    }
}

impl TryFrom<String> for LengthRange {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LengthRange> for String {
    fn from(range: LengthRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{min}"),
            (Some(min), Some(max)) => write!(f, "{min}-{max}"),
            (Some(min), None) => write!(f, "{min}-"),
            (None, Some(max)) => write!(f, "-{max}"),
            (None, None) => f.write_str("-"),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Schema for a single field.
///
/// Use the typed constructors ([`string`](FieldSchema::string),
/// [`boolean`](FieldSchema::boolean), ...) and chain builder methods.
///
/// # Examples
///
/// ```
/// use command_args_core::{FieldKind, FieldSchema};
///
/// let password = FieldSchema::string("password")
///     .required()
///     .with_short('p')
///     .with_len("6-".parse().unwrap())
///     .secret();
///
/// assert_eq!(password.kind, FieldKind::String);
/// assert!(password.required);
/// assert_eq!(password.short, Some('p'));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Internal key (camelCase by convention).
    pub name: String,
    /// Value type.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Whether the validator rejects a missing value.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Value applied by the validator when none was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable replacement for `default` in help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_description: Option<String>,
    /// Help text; may span several lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Single-character alias (`-u`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Hide the default value in help output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub secret: bool,
    /// Length bounds for strings and arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<LengthRange>,
}

impl FieldSchema {
    /// Creates a field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            default_description: None,
            description: None,
            short: None,
            secret: false,
            len: None,
        }
    }

    /// Creates a string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Creates a number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// Creates a boolean flag.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Creates a repeatable field.
    pub fn array(name: impl Into<String>, items: ScalarKind) -> Self {
        Self::new(name, FieldKind::Array { items })
    }

    /// Creates a field restricted to `values`.
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            FieldKind::Enum {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Creates a nested group.
    pub fn object(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self::new(name, FieldKind::Object { fields })
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the text shown instead of the default value.
    pub fn with_default_description(mut self, text: impl Into<String>) -> Self {
        self.default_description = Some(text.into());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the short alias.
    pub fn with_short(mut self, alias: char) -> Self {
        self.short = Some(alias);
        self
    }

    /// Hides the default value from help output.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Sets length bounds.
    pub fn with_len(mut self, len: LengthRange) -> Self {
        self.len = Some(len);
        self
    }
}

/// Ordered collection of fields.
///
/// Serializes as a plain list so definition files read naturally:
///
/// ```
/// use command_args_core::Schema;
///
/// let schema: Schema = serde_json::from_str(r#"[
///     {"name": "username", "type": "string", "required": true},
///     {"name": "verbose", "type": "boolean", "short": "v"}
/// ]"#).unwrap();
///
/// assert_eq!(schema.len(), 2);
/// assert!(schema.field("verbose").unwrap().kind.is_boolean());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Finds a top-level field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<FieldSchema>> for Schema {
    fn from(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
