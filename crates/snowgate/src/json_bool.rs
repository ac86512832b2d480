use crate::{Error, Result};
use core::{fmt, str::FromStr};

const TRUE: &str = "true";
const FALSE: &str = "false";

/// A boolean whose textual form is the lowercase JSON literal.
///
/// Discord query parameters such as `with_counts` expect `true` / `false`
/// spelled exactly like that.
///
/// ```
/// use snowgate::JsonBool;
///
/// assert_eq!(JsonBool::from(true).to_string(), "true");
/// assert_eq!("FALSE".parse::<JsonBool>().unwrap(), JsonBool::from(false));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonBool(bool);

impl JsonBool {
    /// Wraps a native boolean.
    pub const fn new(value: bool) -> Self {
        Self(value)
    }

    /// The wrapped boolean.
    pub const fn get(self) -> bool {
        self.0
    }

    /// The canonical literal for this value.
    pub const fn as_str(self) -> &'static str {
        if self.0 { TRUE } else { FALSE }
    }
}

impl From<bool> for JsonBool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<JsonBool> for bool {
    fn from(value: JsonBool) -> Self {
        value.0
    }
}

impl FromStr for JsonBool {
    type Err = Error;

    /// Accepts `"true"` or `"false"` in any letter case.
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case(TRUE) {
            Ok(Self(true))
        } else if s.eq_ignore_ascii_case(FALSE) {
            Ok(Self(false))
        } else {
            Err(Error::InvalidBooleanLiteral {
                value: s.to_owned(),
            })
        }
    }
}

impl fmt::Display for JsonBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input accepted by [`format_bool`]: a native boolean or text that should
/// already spell one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoolInput<'a> {
    /// A native boolean, formatted as-is.
    Literal(bool),
    /// Text parsed case-insensitively as `"true"` / `"false"`.
    Text(&'a str),
}

impl From<bool> for BoolInput<'_> {
    fn from(value: bool) -> Self {
        Self::Literal(value)
    }
}

impl<'a> From<&'a str> for BoolInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for BoolInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<T> From<Option<T>> for BoolInput<'_> {
    /// `Some(_)` is true, `None` is false.
    fn from(value: Option<T>) -> Self {
        Self::Literal(value.is_some())
    }
}

/// Normalizes a boolean-like value to `"true"` or `"false"`.
///
/// # Errors
///
/// Returns [`Error::InvalidBooleanLiteral`] for text that is not a
/// case-insensitive `"true"` / `"false"`.
///
/// ```
/// use snowgate::format_bool;
///
/// assert_eq!(format_bool(true).unwrap(), "true");
/// assert_eq!(format_bool("TRUE").unwrap(), "true");
/// assert!(format_bool("yes").is_err());
/// ```
pub fn format_bool<'a>(value: impl Into<BoolInput<'a>>) -> Result<&'static str> {
    let value = match value.into() {
        BoolInput::Literal(b) => JsonBool(b),
        BoolInput::Text(s) => s.parse()?,
    };
    Ok(value.as_str())
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::JsonBool;
    use core::fmt;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    impl Serialize for JsonBool {
        fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            s.serialize_str(self.as_str())
        }
    }

    impl<'de> Deserialize<'de> for JsonBool {
        fn deserialize<D>(d: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct JsonBoolVisitor;

            impl de::Visitor<'_> for JsonBoolVisitor {
                type Value = JsonBool;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    formatter.write_str("a boolean or the string \"true\" / \"false\"")
                }

                fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(JsonBool(v))
                }

                fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    v.parse().map_err(E::custom)
                }
            }

            d.deserialize_any(JsonBoolVisitor)
        }
    }
}
