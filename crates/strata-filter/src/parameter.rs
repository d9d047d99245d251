use serde::{Deserialize, Serialize};
use serde_json::Value;
use strata_payload::DataType;
use strata_structure::DataPath;

/// The shape a parameter's argument must have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// A `/`-separated data path.
    Path,
    String,
    Number,
    /// A non-negative integer.
    Integer,
    IntegerList,
    Bool,
    /// A data type name such as `"int32"`.
    DataType,
}

impl ParameterKind {
    /// Check a raw argument value against this kind.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Path => {
                let text = value.as_str().ok_or("expected a path string")?;
                let path = DataPath::parse(text).map_err(|e| e.to_string())?;
                if path.is_empty() {
                    return Err("path must not be empty".into());
                }
                Ok(())
            }
            Self::String => value.as_str().map(|_| ()).ok_or_else(|| "expected a string".into()),
            Self::Number => value.as_f64().map(|_| ()).ok_or_else(|| "expected a number".into()),
            Self::Integer => value
                .as_u64()
                .map(|_| ())
                .ok_or_else(|| "expected a non-negative integer".into()),
            Self::IntegerList => {
                let items = value.as_array().ok_or("expected a list of integers")?;
                if items.iter().all(|v| v.as_u64().is_some()) {
                    Ok(())
                } else {
                    Err("expected a list of integers".into())
                }
            }
            Self::Bool => value.as_bool().map(|_| ()).ok_or_else(|| "expected true or false".into()),
            Self::DataType => {
                let text = value.as_str().ok_or("expected a data type name")?;
                text.parse::<DataType>().map(|_| ()).map_err(|e| e.to_string())
            }
        }
    }
}

/// One declared input of a filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub kind: ParameterKind,
    pub required: bool,
    /// Substituted when the argument is absent.
    pub default: Option<Value>,
}

impl Parameter {
    /// A parameter that must be supplied.
    pub fn required(name: impl Into<String>, kind: ParameterKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            default: None,
        }
    }

    /// A parameter that falls back to `default` when absent.
    pub fn optional(
        name: impl Into<String>,
        kind: ParameterKind,
        default: impl Into<Value>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: Some(default.into()),
        }
    }
}
