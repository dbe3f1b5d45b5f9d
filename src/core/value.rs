//! Scalar values for configuration fields
//!
//! Every scalar is kept as the lexeme the loader saw. Typed views are parsed
//! on demand, so a malformed number only becomes an error when someone asks
//! for a number.

use crate::error::{CfgTreeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// A string-backed scalar with lazy typed coercion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar {
    lexeme: String,
}

impl Scalar {
    /// Create a new scalar from its textual form
    pub fn new(lexeme: impl Into<String>) -> Self {
        Self {
            lexeme: lexeme.into(),
        }
    }

    /// Get the raw lexeme
    pub fn as_str(&self) -> &str {
        &self.lexeme
    }

    /// Consume the scalar, returning the raw lexeme
    pub fn into_string(self) -> String {
        self.lexeme
    }

    /// Parse as a signed integer
    pub fn to_int(&self) -> Result<i64> {
        self.lexeme
            .trim()
            .parse::<i64>()
            .map_err(|_| CfgTreeError::type_conversion(&self.lexeme, "integer"))
    }

    /// Parse as a float
    pub fn to_float(&self) -> Result<f64> {
        self.lexeme
            .trim()
            .parse::<f64>()
            .map_err(|_| CfgTreeError::type_conversion(&self.lexeme, "float"))
    }

    /// Interpret as a boolean.
    ///
    /// A numeric lexeme (integer or finite float) is true when it is at least
    /// 1. Anything else is true only if it equals `"true"` ignoring ASCII
    /// case. This never fails.
    pub fn to_bool(&self) -> bool {
        let trimmed = self.lexeme.trim();
        let number = trimmed
            .parse::<i64>()
            .map(|n| n as f64)
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().filter(|n| n.is_finite()));
        match number {
            Some(n) if n >= 1.0 => true,
            _ => trimmed.eq_ignore_ascii_case("true"),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::new(value.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::new(value.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::new(value.to_string())
    }
}

/// The typed views a caller can request from a scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
}

impl ValueType {
    /// Coerce a scalar into a JSON value of this type.
    ///
    /// Floats must be finite; JSON has no spelling for NaN or infinity.
    pub fn to_json(&self, scalar: &Scalar) -> Result<JsonValue> {
        Ok(match self {
            Self::String => JsonValue::String(scalar.as_str().to_string()),
            Self::Int => JsonValue::from(scalar.to_int()?),
            Self::Float => serde_json::Number::from_f64(scalar.to_float()?)
                .map(JsonValue::Number)
                .ok_or_else(|| CfgTreeError::type_conversion(scalar.as_str(), self.to_string()))?,
            Self::Bool => JsonValue::Bool(scalar.to_bool()),
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_creation() {
        let s = Scalar::from("hello");
        assert_eq!(s.as_str(), "hello");
        assert_eq!(Scalar::from(42i64).as_str(), "42");
        assert_eq!(Scalar::from(true).as_str(), "true");
        assert_eq!(Scalar::from(2.5f64).to_string(), "2.5");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Scalar::from(" 8080 ").to_int().unwrap(), 8080);
        assert_eq!(Scalar::from("-3").to_int().unwrap(), -3);
        assert_eq!(Scalar::from("0.25").to_float().unwrap(), 0.25);
        assert_eq!(Scalar::from("7").to_float().unwrap(), 7.0);
    }

    #[test]
    fn test_numeric_coercion_failures() {
        let err = Scalar::from("3.7").to_int().unwrap_err();
        assert!(matches!(err, CfgTreeError::TypeConversion { .. }));

        let err = Scalar::from("fast").to_float().unwrap_err();
        assert!(matches!(err, CfgTreeError::TypeConversion { .. }));
    }

    #[test]
    fn test_bool_coercion() {
        assert!(Scalar::from("2").to_bool());
        assert!(Scalar::from("1").to_bool());
        assert!(Scalar::from("1.5").to_bool());
        assert!(!Scalar::from("0").to_bool());
        assert!(!Scalar::from("0.9").to_bool());
        assert!(!Scalar::from("-4").to_bool());
        assert!(Scalar::from("TRUE").to_bool());
        assert!(Scalar::from("True").to_bool());
        assert!(!Scalar::from("false").to_bool());
        assert!(!Scalar::from("yes").to_bool());
        assert!(!Scalar::from("").to_bool());
        // not finite numbers
        assert!(!Scalar::from("inf").to_bool());
        assert!(!Scalar::from("infinity").to_bool());
        assert!(!Scalar::from("NaN").to_bool());
    }

    #[test]
    fn test_value_type_to_json() {
        assert_eq!(ValueType::Int.to_json(&Scalar::from("42")).unwrap(), json!(42));
        assert_eq!(ValueType::Float.to_json(&Scalar::from("2.5")).unwrap(), json!(2.5));
        assert_eq!(ValueType::Bool.to_json(&Scalar::from("3")).unwrap(), json!(true));
        assert_eq!(ValueType::String.to_json(&Scalar::from("07")).unwrap(), json!("07"));
        assert!(ValueType::Int.to_json(&Scalar::from("x")).is_err());
        assert!(matches!(
            ValueType::Float.to_json(&Scalar::from("NaN")).unwrap_err(),
            CfgTreeError::TypeConversion { .. }
        ));
    }
}
