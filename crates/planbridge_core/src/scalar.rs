use std::fmt;

use crate::datatype::{DataType, StringTypeMeta};
use crate::errors::{PlanError, Result};

/// A single constant value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
}

impl ScalarValue {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Boolean(_) => DataType::Boolean,
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::Utf8(_) => DataType::Utf8(StringTypeMeta::UNBOUNDED),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn try_as_bool(&self) -> Result<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Utf8(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Self::Utf8(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(PlanError::Config(format!("Not a bool: {other}"))),
        }
    }

    pub fn try_into_string(self) -> Result<String> {
        match self {
            Self::Utf8(s) => Ok(s),
            other => Err(PlanError::Config(format!("Not a string: {other}"))),
        }
    }

    /// Parse an unsigned or signed number literal.
    ///
    /// Integers that fit in an i64 stay integers, everything else is a float.
    pub fn parse_number(s: &str) -> Option<Self> {
        if let Ok(v) = s.parse::<i64>() {
            return Some(Self::Int64(v));
        }
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Self::Float64)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => {
                // Always keep a decimal point so the value reads back as a
                // float.
                let s = v.to_string();
                if s.contains('.') {
                    write!(f, "{s}")
                } else {
                    write!(f, "{s}.0")
                }
            }
            Self::Utf8(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numbers() {
        assert_eq!(Some(ScalarValue::Int64(-12)), ScalarValue::parse_number("-12"));
        assert_eq!(Some(ScalarValue::Float64(1.5)), ScalarValue::parse_number("1.5"));
        assert_eq!(
            Some(ScalarValue::Float64(1e20)),
            ScalarValue::parse_number("100000000000000000000")
        );
        assert_eq!(None, ScalarValue::parse_number("abc"));
    }

    #[test]
    fn float_display_keeps_point() {
        assert_eq!("2.0", ScalarValue::Float64(2.0).to_string());
        assert_eq!("2.25", ScalarValue::Float64(2.25).to_string());
    }

    #[test]
    fn bool_conversion() {
        assert!(ScalarValue::from("TRUE").try_as_bool().unwrap());
        assert!(ScalarValue::Int64(1).try_as_bool().is_err());
    }
}
