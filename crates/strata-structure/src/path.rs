//! Name-based routes through the graph.
//!
//! A [`DataPath`] is a plain sequence of names starting at a root object. It
//! carries no identifiers and is re-resolved against the live graph on every
//! use, so renaming any object along the route changes what (if anything)
//! the path resolves to. For a rename-resistant reference, resolve the path
//! once into a [`LinkedPath`](crate::LinkedPath).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_types::{TypeError, PATH_SEPARATOR};

/// An ordered sequence of object names, root first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPath {
    names: Vec<String>,
}

impl DataPath {
    /// Build a path from a sequence of names.
    ///
    /// ```
    /// use strata_structure::DataPath;
    ///
    /// let path = DataPath::new(["Foo", "Bar1", "Bazz"]);
    /// assert_eq!(path.to_string(), "Foo/Bar1/Bazz");
    /// ```
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a `/`-separated path. A single leading or trailing separator is
    /// tolerated; empty components are not.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let trimmed = input.strip_prefix(PATH_SEPARATOR).unwrap_or(input);
        let trimmed = trimmed.strip_suffix(PATH_SEPARATOR).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let mut names = Vec::new();
        for component in trimmed.split(PATH_SEPARATOR) {
            if component.is_empty() {
                return Err(TypeError::InvalidName {
                    name: input.to_string(),
                    reason: "path components must not be empty".into(),
                });
            }
            names.push(component.to_string());
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Name of the final hop.
    pub fn target_name(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// The path with its last hop removed; `None` for the empty path.
    pub fn parent(&self) -> Option<DataPath> {
        let (_, init) = self.names.split_last()?;
        Some(Self {
            names: init.to_vec(),
        })
    }

    /// A new path one hop deeper.
    pub fn child(&self, name: impl Into<String>) -> DataPath {
        let mut names = self.names.clone();
        names.push(name.into());
        Self { names }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

impl FromStr for DataPath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<S: Into<String>> FromIterator<S> for DataPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let path: DataPath = "Foo/Bar1/Bazz".parse().unwrap();
        assert_eq!(path, DataPath::new(["Foo", "Bar1", "Bazz"]));
        assert_eq!(path.to_string(), "Foo/Bar1/Bazz");
    }

    #[test]
    fn parse_tolerates_outer_separators() {
        assert_eq!(DataPath::parse("/Foo/Bar/").unwrap(), DataPath::new(["Foo", "Bar"]));
        assert!(DataPath::parse("/").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_empty_components() {
        assert!(DataPath::parse("Foo//Bar").is_err());
    }

    #[test]
    fn parent_and_child() {
        let path = DataPath::new(["Foo", "Bar"]);
        assert_eq!(path.parent(), Some(DataPath::new(["Foo"])));
        assert_eq!(path.child("Bazz"), DataPath::new(["Foo", "Bar", "Bazz"]));
        assert_eq!(path.target_name(), Some("Bar"));
        assert_eq!(DataPath::default().parent(), None);
        assert_eq!(DataPath::new(["Foo"]).parent(), Some(DataPath::default()));
    }

    #[test]
    fn collect_from_names() {
        let path: DataPath = ["a", "b"].into_iter().collect();
        assert_eq!(path.len(), 2);
        assert_eq!(path.iter().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn serde_is_a_list_of_names() {
        let path = DataPath::new(["Foo", "Bar"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["Foo","Bar"]"#);
    }
}
