use crate::{Schema, SchemaError, VariadicPolicy, validate_values};

/// Construction-checked positional field list for the positional resolver.
///
/// Fields bind to argument tokens by index, in declaration order.
///
/// # Examples
///
/// ```
/// use command_args_core::*;
///
/// let values = ValuesSchema::new(
///     Schema::new()
///         .with_field(FieldSchema::string("name").required())
///         .with_field(FieldSchema::string("greeting").with_default("Hello")),
/// )
/// .unwrap();
/// assert_eq!(values.names().collect::<Vec<_>>(), vec!["name", "greeting"]);
///
/// let bad = ValuesSchema::new(Schema::new().with_field(FieldSchema::boolean("force")));
/// assert!(matches!(bad, Err(SchemaError::NonStringPositional(_))));
/// ```
#[derive(Debug, Clone)]
pub struct ValuesSchema {
    schema: Schema,
    variadic: VariadicPolicy,
}

impl ValuesSchema {
    /// Builds the list.
    ///
    /// # Errors
    ///
    /// Returns [`NonStringPositional`](SchemaError::NonStringPositional) or
    /// [`RequiredAfterOptional`](SchemaError::RequiredAfterOptional).
    pub fn new(schema: impl Into<Schema>) -> Result<Self, SchemaError> {
        let schema = schema.into();
        if let Some(error) = validate_values(&schema).into_iter().next() {
            return Err(error);
        }
        Ok(Self {
            schema,
            variadic: VariadicPolicy::default(),
        })
    }

    /// Sets the policy for tokens beyond the declared fields.
    pub fn with_variadic(mut self, policy: VariadicPolicy) -> Self {
        self.variadic = policy;
        self
    }

    /// Policy for tokens beyond the declared fields.
    pub fn variadic(&self) -> VariadicPolicy {
        self.variadic
    }

    /// Source schema, as handed to the validator.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Field names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schema.iter().map(|f| f.name.as_str())
    }
}
