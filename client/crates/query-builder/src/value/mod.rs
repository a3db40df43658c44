mod ser;

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write,
};

use indexmap::IndexMap;

pub use ser::to_argument_value;

use crate::error::BuildError;

/// An argument value as it appears in the rendered query text.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Rendered between double quotes, without any escaping.
    String(String),
    Int(i64),
    Float(f64),
    /// A bareword token, rendered verbatim. GraphQL enum values must not be quoted.
    Enum(String),
    Boolean(bool),
    Null,
    List(Vec<ArgumentValue>),
    Object(IndexMap<String, ArgumentValue>),
}

/// Helper to pass a string that must be rendered as an unquoted GraphQL enum value.
///
/// ```
/// use graphql_query_builder::{ArgumentValue, Enum};
///
/// let value = ArgumentValue::from(Enum::new("ENABLED"));
/// assert_eq!(value.render().unwrap(), "ENABLED");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Enum(String);

impl Enum {
    pub fn new(value: impl Into<String>) -> Self {
        Enum(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ArgumentValue {
    pub fn enumeration(value: impl Into<String>) -> Self {
        ArgumentValue::Enum(value.into())
    }

    /// Renders the value to its textual form.
    pub fn render(&self) -> Result<String, BuildError> {
        let mut out = String::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub(crate) fn write_to(&self, out: &mut String) -> Result<(), BuildError> {
        match self {
            ArgumentValue::String(value) => {
                out.push('"');
                out.push_str(value);
                out.push('"');
            }
            ArgumentValue::Int(value) => {
                let _ = write!(out, "{value}");
            }
            ArgumentValue::Float(value) => {
                if !value.is_finite() {
                    return Err(BuildError::UnsupportedValueType(format!("f64 ({value})")));
                }
                // f64's Display never switches to exponent notation.
                let _ = write!(out, "{value}");
            }
            ArgumentValue::Enum(value) => out.push_str(value),
            ArgumentValue::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
            ArgumentValue::Null => out.push_str("null"),
            ArgumentValue::List(values) => {
                out.push('[');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    value.write_to(out)?;
                }
                out.push(']');
            }
            ArgumentValue::Object(fields) => {
                out.push('{');
                write_key_values(out, fields)?;
                out.push('}');
            }
        }
        Ok(())
    }
}

/// Writes `key:value` pairs separated by `, `.
pub(crate) fn write_key_values(out: &mut String, fields: &IndexMap<String, ArgumentValue>) -> Result<(), BuildError> {
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push(':');
        value.write_to(out)?;
    }
    Ok(())
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        ArgumentValue::String(value)
    }
}

impl From<&String> for ArgumentValue {
    fn from(value: &String) -> Self {
        ArgumentValue::String(value.clone())
    }
}

impl From<Enum> for ArgumentValue {
    fn from(value: Enum) -> Self {
        ArgumentValue::Enum(value.0)
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        ArgumentValue::Boolean(value)
    }
}

macro_rules! impl_from_int {
    ($($ty: ty),*) => {
        $(
            impl From<$ty> for ArgumentValue {
                fn from(value: $ty) -> Self {
                    ArgumentValue::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for ArgumentValue {
    fn from(value: f32) -> Self {
        // Going through the shortest decimal form keeps 555.45f32 from turning into 555.4500122070312.
        ArgumentValue::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

impl From<f64> for ArgumentValue {
    fn from(value: f64) -> Self {
        ArgumentValue::Float(value)
    }
}

impl<T: Into<ArgumentValue>> From<Option<T>> for ArgumentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgumentValue::Null, Into::into)
    }
}

impl<T: Into<ArgumentValue>> From<Vec<T>> for ArgumentValue {
    fn from(values: Vec<T>) -> Self {
        ArgumentValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<ArgumentValue>> FromIterator<(K, V)> for ArgumentValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ArgumentValue::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<ArgumentValue>> From<IndexMap<K, V>> for ArgumentValue {
    fn from(fields: IndexMap<K, V>) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<ArgumentValue>> From<BTreeMap<K, V>> for ArgumentValue {
    fn from(fields: BTreeMap<K, V>) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<ArgumentValue>> From<HashMap<K, V>> for ArgumentValue {
    fn from(fields: HashMap<K, V>) -> Self {
        fields.into_iter().collect()
    }
}
