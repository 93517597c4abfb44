use std::collections::HashMap;

pub type Array = Vec<Value>;
pub type Object = HashMap<String, Value>;

/// A decoded JSON value
///
/// Equality is structural and type-sensitive: `Integer(1)` never equals `Float(1.0)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Array(Array),
    String(String),
    Integer(i64),
    Float(f64),
    Object(Object),
    Bool(bool),
    #[default]
    Null,
}

impl Value {
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Integer(integer) => Some(integer),
            _ => None,
        }
    }

    /// Floats as they are; integers widened.
    #[expect(clippy::cast_precision_loss, reason = "i64 ids above 2^53 lose precision as f64, as any JSON number would")]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(float) => Some(float),
            Self::Integer(integer) => Some(integer as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(boolean) => Some(boolean),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Looks up `key` when this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Object(_) => "object",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Self::String(string)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Self::String(string.to_owned())
    }
}

impl From<i64> for Value {
    fn from(integer: i64) -> Self {
        Self::Integer(integer)
    }
}

impl From<f64> for Value {
    fn from(float: f64) -> Self {
        Self::Float(float)
    }
}

impl From<bool> for Value {
    fn from(boolean: bool) -> Self {
        Self::Bool(boolean)
    }
}

impl<V: Into<Value>> FromIterator<(String, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        Self::Object(iter.into_iter().map(|(key, value)| (key, value.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_type_sensitive() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::Integer(1));
        assert_eq!(Value::from(vec![Value::Null]), Value::Array(vec![Value::Null]));
    }

    #[test]
    fn accessors() {
        let value: Value = [("id".to_string(), Value::from(7_i64)), ("name".to_string(), Value::from("zava"))].into_iter().collect();

        assert_eq!(value.get("id").and_then(Value::as_i64), Some(7));
        assert_eq!(value.get("id").and_then(Value::as_f64), Some(7.0));
        assert_eq!(value.get("name").and_then(Value::as_str), Some("zava"));
        assert!(value.get("missing").is_none());
        assert!(Value::from(7_i64).get("id").is_none());
        assert_eq!(value.type_name(), "object");
        assert!(Value::default().is_null());
    }
}
