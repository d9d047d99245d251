//! Named filter arguments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strata_payload::DataType;
use strata_structure::DataPath;

use crate::error::{FilterError, FilterResult};

/// Argument values keyed by parameter name.
///
/// Values are held as JSON so that scripts, tests, and tooling can all build
/// them without knowing the filter's concrete types. Typed getters convert
/// on access and report the offending argument by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments {
    values: BTreeMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, name: &str) -> FilterResult<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| FilterError::MissingArgument {
                name: name.to_string(),
            })
    }

    pub fn string(&self, name: &str) -> FilterResult<&str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| FilterError::invalid(name, "expected a string"))
    }

    /// A `/`-separated, non-empty data path.
    pub fn path(&self, name: &str) -> FilterResult<DataPath> {
        let path = DataPath::parse(self.string(name)?)
            .map_err(|e| FilterError::invalid(name, e.to_string()))?;
        if path.is_empty() {
            return Err(FilterError::invalid(name, "path must not be empty"));
        }
        Ok(path)
    }

    pub fn f64(&self, name: &str) -> FilterResult<f64> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| FilterError::invalid(name, "expected a number"))
    }

    pub fn usize(&self, name: &str) -> FilterResult<usize> {
        let value = self.require(name)?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| FilterError::invalid(name, "expected a non-negative integer"))
    }

    pub fn usize_list(&self, name: &str) -> FilterResult<Vec<usize>> {
        let items = self
            .require(name)?
            .as_array()
            .ok_or_else(|| FilterError::invalid(name, "expected a list of integers"))?;
        items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| FilterError::invalid(name, "expected a list of integers"))
            })
            .collect()
    }

    pub fn bool(&self, name: &str) -> FilterResult<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| FilterError::invalid(name, "expected true or false"))
    }

    pub fn data_type(&self, name: &str) -> FilterResult<DataType> {
        self.string(name)?
            .parse()
            .map_err(|e: strata_payload::PayloadError| FilterError::invalid(name, e.to_string()))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_getters() {
        let args = Arguments::new()
            .with("path", "Foo/Bar")
            .with("count", 3)
            .with("value", 2.5)
            .with("shape", json!([3, 2]))
            .with("deep", true)
            .with("type", "uint16");

        assert_eq!(args.path("path").unwrap(), DataPath::new(["Foo", "Bar"]));
        assert_eq!(args.usize("count").unwrap(), 3);
        assert_eq!(args.f64("value").unwrap(), 2.5);
        assert_eq!(args.f64("count").unwrap(), 3.0);
        assert_eq!(args.usize_list("shape").unwrap(), vec![3, 2]);
        assert!(args.bool("deep").unwrap());
        assert_eq!(args.data_type("type").unwrap(), DataType::UInt16);
    }

    #[test]
    fn getter_errors_name_the_argument() {
        let args = Arguments::new().with("count", -1).with("path", "");
        assert!(matches!(
            args.usize("count"),
            Err(FilterError::InvalidArgument { name, .. }) if name == "count"
        ));
        assert!(matches!(args.path("path"), Err(FilterError::InvalidArgument { .. })));
        assert!(matches!(
            args.string("missing"),
            Err(FilterError::MissingArgument { name }) if name == "missing"
        ));
        assert!(args.data_type("count").is_err());
    }

    #[test]
    fn collect_from_pairs() {
        let args: Arguments = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(args.len(), 2);
        assert!(args.contains("a"));
        assert_eq!(args.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["a", "b"]);
    }
}
