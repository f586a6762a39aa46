//! Schema model and validation for schema-driven argument parsing.
//!
//! This crate defines the declarative side of the parser:
//!
//! - [`FieldSchema`] / [`FieldKind`]: one typed field (string, number,
//!   boolean, array, enum or nested object) with short alias, default and
//!   help metadata.
//! - [`Schema`]: an ordered list of fields.
//! - [`OptionsSchema`]: a schema flattened into long/short option lookups,
//!   construction-checked for alias collisions.
//! - [`ValuesSchema`]: a schema bound positionally, construction-checked
//!   for string-only fields and required-before-optional ordering.
//! - [`CommandDef`]: a declarative command tree for definition files.
//! - [`Validator`] / [`SchemaValidator`]: coercion, defaults and
//!   constraint checks over raw parsed data.
//! - [`convert`]: kebab/camel case conversion.
//!
//! The parsing engine itself lives in the `command-args` crate.
//!
//! # Example
//!
//! ```
//! use command_args_core::*;
//!
//! let schema = Schema::new()
//!     .with_field(FieldSchema::string("username").required().with_short('u'))
//!     .with_field(FieldSchema::boolean("verbose").with_short('v'));
//!
//! let options = OptionsSchema::new(schema).unwrap();
//! assert_eq!(options.find_short('u').unwrap().flag, "username");
//! assert!(options.find_long("verbose").unwrap().field.kind.is_boolean());
//! ```

mod case;
mod coerce;
mod definition;
mod options;
mod types;
mod validate;
mod values;

pub use case::{Case, convert};
pub use coerce::{SchemaValidator, ValidationErrors, ValidationIssue, Validator};
pub use definition::{CommandBody, CommandDef, ParseDef};
pub use options::{KeyPath, OptionEntry, OptionsSchema, VariadicPolicy};
pub use types::*;
pub use validate::{
    SchemaError, command_key, validate_definition, validate_options, validate_values,
};
pub use values::ValuesSchema;
