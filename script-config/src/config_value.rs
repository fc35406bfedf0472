use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::{ConfigError, ConfigResult};

/// Ordered settings map. Insertion order is kept on write.
pub type ConfigValues = IndexMap<String, ConfigValue>;

/// Any JSON-representable setting.
///
/// Serialized as plain JSON, without tags, so config files stay readable
/// and editable by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    /// Whole numbers up to `i64::MAX`. Larger ones are read as
    /// [ConfigValue::Float] and lose precision.
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(ConfigValues),
}
impl ConfigValue {
    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::List(value) => Some(value.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigValues> {
        match self {
            Self::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Read the value as any deserializable type.
    ///
    /// `key` is used only for the error message.
    pub fn to_typed<T: DeserializeOwned>(
        &self,
        key: impl Into<String>,
    ) -> ConfigResult<T> {
        serde_json::from_value(Value::from(self.clone())).map_err(|_| {
            ConfigError::Type {
                key: key.into(),
                found: self.type_name(),
                expected: std::any::type_name::<T>().to_string(),
            }
        })
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}
impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}
impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Integer(value as i64)
    }
}
impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}
impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}
impl From<ConfigValues> for ConfigValue {
    fn from(value: ConfigValues) -> Self {
        Self::Map(value)
    }
}
impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            // Above i64::MAX only f64 is left.
            Value::Number(number) => match number.as_i64() {
                Some(value) => Self::Integer(value),
                None => Self::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(value) => Self::String(value),
            Value::Array(values) => {
                Self::List(values.into_iter().map(Self::from).collect())
            }
            Value::Object(map) => Self::Map(values_from_object(map)),
        }
    }
}
impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(value) => Value::Bool(value),
            ConfigValue::Integer(value) => Value::Number(value.into()),
            // JSON has no NaN or infinity.
            ConfigValue::Float(value) => {
                Number::from_f64(value).map_or(Value::Null, Value::Number)
            }
            ConfigValue::String(value) => Value::String(value),
            ConfigValue::List(values) => {
                Value::Array(values.into_iter().map(Value::from).collect())
            }
            ConfigValue::Map(values) => Value::Object(
                values.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

/// Convert JSON object into ordered settings map.
pub fn values_from_object(map: Map<String, Value>) -> ConfigValues {
    map.into_iter().map(|(k, v)| (k, v.into())).collect()
}

/// Build [ConfigValues] from key-value pairs.
///
/// ```
/// use script_config::{config_values, ConfigValue};
/// let defaults = config_values! {
///     "camera_path" => "/opt/Autodesk",
///     "scene_scale" => 100,
/// };
/// assert_eq!(defaults["scene_scale"], ConfigValue::Integer(100));
/// ```
#[macro_export]
macro_rules! config_values {
    () => {
        $crate::ConfigValues::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut values = $crate::ConfigValues::new();
        $(
            values.insert(
                ::std::string::String::from($key),
                $crate::ConfigValue::from($value),
            );
        )+
        values
    }};
}
