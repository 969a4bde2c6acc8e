//! Value conversion and verification.
//!
//! Raw token strings become typed [`Value`]s through a fixed priority chain:
//! the option's own [`Converter`] first, then a registry override for the
//! target type, then the built-in conversion, with [`ValueType::Choice`]
//! candidates matched case-insensitively as the built-in for enum-typed
//! fields. [`Verifier`]s run after conversion and reject values with a
//! human-readable message.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::model::{ChoiceValue, ValueType};

/// A converted field value.
///
/// # Examples
///
/// ```
/// use command_bind_core::Value;
///
/// let v = Value::Int(42);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
    List(Vec<Value>),
}

impl Value {
    /// Returns the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float payload, if any.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list payload, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::from(*n),
            Self::Float(x) => serde_json::Value::from(*x),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::Path(p) => serde_json::Value::String(p.display().to_string()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

/// A string-to-value conversion function.
///
/// Cheap to clone; failures carry a human-readable message that the binder
/// wraps into its conversion error.
#[derive(Clone)]
pub struct Converter(Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>);

impl Converter {
    /// Wraps a conversion closure.
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self(Arc::new(convert))
    }

    /// Converts one raw token string.
    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        (self.0)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

/// A post-conversion validation function.
#[derive(Clone)]
pub struct Verifier(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>);

impl Verifier {
    /// Wraps a verification closure.
    pub fn new<F>(verify: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(verify))
    }

    /// Verifies a converted value.
    pub fn verify(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Verifier(..)")
    }
}

/// Registry key: a [`ValueType`] stripped of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Bool,
    Int,
    Float,
    Str,
    Path,
    Choice,
}

impl ValueType {
    /// The registry key for this type.
    pub fn key(&self) -> TypeKey {
        match self {
            Self::Bool => TypeKey::Bool,
            Self::Int => TypeKey::Int,
            Self::Float => TypeKey::Float,
            Self::Str => TypeKey::Str,
            Self::Path => TypeKey::Path,
            Self::Choice(_) => TypeKey::Choice,
        }
    }
}

/// Global converter overrides, keyed by target type.
///
/// An empty registry falls through to the built-in conversions; registering
/// an override replaces the built-in for every field of that type that does
/// not carry its own converter.
///
/// # Examples
///
/// ```
/// use command_bind_core::{Converter, ConverterRegistry, TypeKey, Value, ValueType};
///
/// let mut registry = ConverterRegistry::new();
/// registry.register(
///     TypeKey::Int,
///     Converter::new(|raw| {
///         let raw = raw.trim_start_matches('+');
///         raw.parse().map(Value::Int).map_err(|_| format!("'{raw}' is not a valid integer"))
///     }),
/// );
///
/// let value = registry.convert(None, &ValueType::Int, "+7").unwrap();
/// assert_eq!(value, Value::Int(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    overrides: HashMap<TypeKey, Converter>,
}

impl ConverterRegistry {
    /// Creates a registry with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a global override for `key`.
    pub fn register(&mut self, key: TypeKey, converter: Converter) {
        self.overrides.insert(key, converter);
    }

    /// Converts `raw` for a field of type `value_type`.
    ///
    /// Priority: the field's own converter (`custom`), then a registered
    /// override for the type, then the built-in conversion.
    pub fn convert(
        &self,
        custom: Option<&Converter>,
        value_type: &ValueType,
        raw: &str,
    ) -> Result<Value, String> {
        if let Some(converter) = custom {
            return converter.convert(raw);
        }
        if let Some(converter) = self.overrides.get(&value_type.key()) {
            return converter.convert(raw);
        }
        convert_builtin(value_type, raw)
    }
}

/// Built-in conversion for `value_type`.
pub fn convert_builtin(value_type: &ValueType, raw: &str) -> Result<Value, String> {
    match value_type {
        ValueType::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| format!("'{raw}' is not a valid boolean (expected true or false)")),
        ValueType::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("'{raw}' is not a valid integer")),
        ValueType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("'{raw}' is not a valid number")),
        ValueType::Str => Ok(Value::Str(raw.to_string())),
        ValueType::Path => Ok(Value::Path(PathBuf::from(raw))),
        ValueType::Choice(candidates) => match_choice(candidates, raw),
    }
}

/// Parses an explicit boolean literal, case-insensitively.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn match_choice(candidates: &[ChoiceValue], raw: &str) -> Result<Value, String> {
    candidates
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(raw))
        .map(|c| Value::Str(c.name.clone()))
        .ok_or_else(|| {
            let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
            format!("'{raw}' is not one of {}", names.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bool() {
        assert_eq!(
            convert_builtin(&ValueType::Bool, "TRUE").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            convert_builtin(&ValueType::Bool, "false").unwrap(),
            Value::Bool(false)
        );
        assert!(convert_builtin(&ValueType::Bool, "yes").is_err());
    }

    #[test]
    fn test_builtin_int_and_float() {
        assert_eq!(
            convert_builtin(&ValueType::Int, "-17").unwrap(),
            Value::Int(-17)
        );
        assert!(convert_builtin(&ValueType::Int, "abc").is_err());
        assert_eq!(
            convert_builtin(&ValueType::Float, "2.5").unwrap(),
            Value::Float(2.5)
        );
    }

    #[test]
    fn test_builtin_path_and_str() {
        assert_eq!(
            convert_builtin(&ValueType::Str, "hello").unwrap(),
            Value::Str("hello".into())
        );
        assert_eq!(
            convert_builtin(&ValueType::Path, "/tmp/x").unwrap(),
            Value::Path(PathBuf::from("/tmp/x"))
        );
    }

    #[test]
    fn test_choice_matches_case_insensitively() {
        let candidates = vec![ChoiceValue::new("JSON"), ChoiceValue::new("Yaml")];
        let choice = ValueType::Choice(candidates);

        assert_eq!(
            convert_builtin(&choice, "json").unwrap(),
            Value::Str("JSON".into())
        );
        assert_eq!(
            convert_builtin(&choice, "YAML").unwrap(),
            Value::Str("Yaml".into())
        );
        let err = convert_builtin(&choice, "toml").unwrap_err();
        assert!(err.contains("JSON, Yaml"));
    }

    #[test]
    fn test_registry_priority_custom_beats_override() {
        let mut registry = ConverterRegistry::new();
        registry.register(
            TypeKey::Int,
            Converter::new(|_| Ok(Value::Int(100))),
        );
        let custom = Converter::new(|_| Ok(Value::Int(7)));

        let with_custom = registry.convert(Some(&custom), &ValueType::Int, "1").unwrap();
        assert_eq!(with_custom, Value::Int(7));

        let with_override = registry.convert(None, &ValueType::Int, "1").unwrap();
        assert_eq!(with_override, Value::Int(100));

        let builtin = ConverterRegistry::new()
            .convert(None, &ValueType::Int, "1")
            .unwrap();
        assert_eq!(builtin, Value::Int(1));
    }

    #[test]
    fn test_verifier_rejects_with_message() {
        let positive = Verifier::new(|v| match v.as_int() {
            Some(n) if n > 0 => Ok(()),
            _ => Err("value must be positive".to_string()),
        });

        assert!(positive.verify(&Value::Int(2)).is_ok());
        assert_eq!(
            positive.verify(&Value::Int(-2)).unwrap_err(),
            "value must be positive"
        );
    }

    #[test]
    fn test_parse_bool_literals_only() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("1"), None);
        assert_eq!(parse_bool(""), None);
    }
}
