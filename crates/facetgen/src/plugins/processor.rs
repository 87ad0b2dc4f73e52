//! Pre-processor and post-processor plugin traits.
//!
//! Pre-processors transform the *input* destined for an extraction method
//! (normally the file path). Post-processors transform an *already
//! extracted* facet value before it is merged into the item record.
//!
//! Both roles receive their per-facet option mapping as a
//! `serde_json::Value` and deserialize it into a typed option struct with
//! [`parse_config`]. `validate_config` runs at chain-resolution time so
//! malformed options fail before any file is processed.

use crate::plugins::Plugin;
use crate::{FacetgenError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Shape of the value a post-processor consumes or produces.
///
/// Used at chain-resolution time to reject chains whose adjacent
/// processors cannot agree on a value shape, rather than failing at run
/// time deep in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A plain string value.
    Text,
    /// A mapping of string keys to values (e.g. named capture groups).
    Mapping,
    /// An ordered list of values.
    List,
    /// Shape determined at run time; compatible with anything.
    Any,
}

impl ValueShape {
    /// Whether a value of shape `produced` can be fed to a consumer
    /// expecting `self`.
    pub fn accepts(self, produced: ValueShape) -> bool {
        matches!(self, ValueShape::Any) || matches!(produced, ValueShape::Any) || self == produced
    }

    /// The runtime shape of a concrete value.
    pub fn of(value: &Value) -> ValueShape {
        match value {
            Value::Object(_) => ValueShape::Mapping,
            Value::Array(_) => ValueShape::List,
            _ => ValueShape::Text,
        }
    }
}

/// The JSON type of a value, for diagnostics.
///
/// Unlike [`ValueShape::of`], which folds every scalar into `Text` for
/// chain-compatibility purposes, this names the concrete JSON type so
/// error messages can say what was actually received.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl std::fmt::Display for ValueShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueShape::Text => "Text",
            ValueShape::Mapping => "Mapping",
            ValueShape::List => "List",
            ValueShape::Any => "Any",
        };
        f.write_str(name)
    }
}

/// Deserialize a processor option mapping into a typed option struct.
///
/// A `Null` config (the default when a facet definition omits the mapping)
/// yields the struct's `Default`.
pub fn parse_config<T>(config: &Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if config.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(config.clone()).map_err(|e| FacetgenError::Validation {
        message: format!("invalid processor options: {}", e),
        source: Some(Box::new(e)),
    })
}

/// Trait for pre-processor plugins.
///
/// Pre-processors are pure string transforms over the extraction input;
/// they never see the extracted facet value and must not touch the
/// filesystem.
pub trait PreProcessor: Plugin {
    /// Validate the option mapping for one chain entry.
    ///
    /// Called at resolution time, before any file is processed.
    fn validate_config(&self, config: &Value) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Transform the extraction input.
    fn apply(&self, input: &str, config: &Value) -> Result<String>;
}

/// Trait for post-processor plugins.
///
/// Post-processors run in the order declared in the facet definition, each
/// consuming the previous one's output.
pub trait PostProcessor: Plugin {
    /// Validate the option mapping for one chain entry.
    fn validate_config(&self, config: &Value) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// The value shape this processor expects as input.
    fn input_shape(&self) -> ValueShape {
        ValueShape::Any
    }

    /// The value shape this processor produces.
    fn output_shape(&self) -> ValueShape {
        ValueShape::Any
    }

    /// Transform an extracted facet value.
    fn apply(&self, value: Value, config: &Value) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct DemoOptions {
        #[serde(default)]
        strict: bool,
    }

    #[test]
    fn test_parse_config_null_yields_default() {
        let opts: DemoOptions = parse_config(&Value::Null).unwrap();
        assert_eq!(opts, DemoOptions::default());
    }

    #[test]
    fn test_parse_config_mapping() {
        let opts: DemoOptions = parse_config(&json!({"strict": true})).unwrap();
        assert!(opts.strict);
    }

    #[test]
    fn test_parse_config_unknown_field_rejected() {
        let result: Result<DemoOptions> = parse_config(&json!({"sloppy": true}));
        assert!(matches!(result, Err(FacetgenError::Validation { .. })));
    }

    #[test]
    fn test_shape_accepts() {
        assert!(ValueShape::Text.accepts(ValueShape::Text));
        assert!(ValueShape::Any.accepts(ValueShape::List));
        assert!(ValueShape::Mapping.accepts(ValueShape::Any));
        assert!(!ValueShape::Text.accepts(ValueShape::List));
        assert!(!ValueShape::List.accepts(ValueShape::Mapping));
    }

    #[test]
    fn test_shape_of_value() {
        assert_eq!(ValueShape::of(&json!("x")), ValueShape::Text);
        assert_eq!(ValueShape::of(&json!({"a": 1})), ValueShape::Mapping);
        assert_eq!(ValueShape::of(&json!([1, 2])), ValueShape::List);
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(ValueShape::Mapping.to_string(), "Mapping");
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(value_type_name(&Value::Null), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(42)), "number");
        assert_eq!(value_type_name(&json!("x")), "string");
        assert_eq!(value_type_name(&json!([1])), "array");
        assert_eq!(value_type_name(&json!({"a": 1})), "object");
    }
}
