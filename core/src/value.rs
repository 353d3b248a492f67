//! Coerced argument values and scalar token coercion.
//!
//! [`ArgValue`] is the runtime value type every token coerces into; its
//! [`Display`](std::fmt::Display) form doubles as the matching key for
//! enumeration members. [`ScalarType`] carries the per-primitive coercion
//! rules, including the truthy/falsy token sets for booleans.
//!
//! # Examples
//!
//! ```
//! use record_args_core::{ArgValue, ScalarType};
//!
//! assert_eq!(ScalarType::Int.coerce("42"), Ok(ArgValue::Int(42)));
//! assert_eq!(ScalarType::Bool.coerce("YES"), Ok(ArgValue::Bool(true)));
//! assert!(ScalarType::Float.coerce("not-a-number").is_err());
//!
//! // The string form is the enumeration matching key.
//! assert_eq!(ArgValue::Int(42).to_string(), "42");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coerced argument value.
///
/// Values deserialize/serialize untagged, so a parsed result renders as
/// natural JSON (`5`, `0.1`, `true`, `"dark"`, `[1, 2]`).
///
/// # Examples
///
/// ```
/// use record_args_core::ArgValue;
///
/// let v = ArgValue::from(0.1);
/// assert_eq!(v.as_f64(), Some(0.1));
/// assert_eq!(serde_json::to_string(&v).unwrap(), "0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// String value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// List of values (list-shaped fields only).
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Returns the string if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as `f64` (accepts both `Float` and `Int`).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(x) => Some(*x),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items if this is a `List` value.
    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            ArgValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(x) => write!(f, "{x}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<f64> for ArgValue {
    fn from(x: f64) -> Self {
        ArgValue::Float(x)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(items: Vec<T>) -> Self {
        ArgValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A primitive scalar type a token can coerce into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// UTF-8 string (always succeeds).
    Str,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Boolean via truthy/falsy token sets.
    Bool,
}

/// Tokens accepted as `true` for boolean coercion (case-insensitive).
pub const TRUTHY_TOKENS: &[&str] = &["yes", "true", "t", "y", "1"];

/// Tokens accepted as `false` for boolean coercion (case-insensitive).
pub const FALSY_TOKENS: &[&str] = &["no", "false", "f", "n", "0"];

impl ScalarType {
    /// Coerces a raw token into a value of this type.
    ///
    /// On failure returns a human-readable description of the expected
    /// form; the parser wraps it into a usage error naming the field.
    ///
    /// # Examples
    ///
    /// ```
    /// use record_args_core::{ArgValue, ScalarType};
    ///
    /// assert_eq!(ScalarType::Str.coerce("abc"), Ok(ArgValue::Str("abc".into())));
    /// assert_eq!(ScalarType::Bool.coerce("0"), Ok(ArgValue::Bool(false)));
    /// assert!(ScalarType::Int.coerce("1.5").is_err());
    /// ```
    pub fn coerce(&self, token: &str) -> Result<ArgValue, String> {
        match self {
            ScalarType::Str => Ok(ArgValue::Str(token.to_string())),
            ScalarType::Int => token
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|_| "an integer".to_string()),
            ScalarType::Float => token
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|_| "a floating-point number".to_string()),
            ScalarType::Bool => {
                let lower = token.to_ascii_lowercase();
                if TRUTHY_TOKENS.contains(&lower.as_str()) {
                    Ok(ArgValue::Bool(true))
                } else if FALSY_TOKENS.contains(&lower.as_str()) {
                    Ok(ArgValue::Bool(false))
                } else {
                    Err("one of yes/no, true/false, t/f, y/n, 1/0 (case insensitive)".to_string())
                }
            }
        }
    }

    /// The type tag shown in help output.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ScalarType::Str => "STR",
            ScalarType::Int => "INT",
            ScalarType::Float => "FLOAT",
            ScalarType::Bool => "BOOL",
        }
    }
}
