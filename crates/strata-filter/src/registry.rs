use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{FilterError, FilterResult};
use crate::filter::Filter;
use crate::filters;

type FilterFactory = Box<dyn Fn() -> Box<dyn Filter> + Send + Sync>;

/// Summary of a registered filter, as returned by listing and search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterInfo {
    pub name: String,
    pub human_name: String,
}

/// Filters available by name.
///
/// Each entry is a factory, so every lookup hands out a fresh filter.
#[derive(Default)]
pub struct FilterRegistry {
    factories: BTreeMap<String, FilterFactory>,
    infos: BTreeMap<String, FilterInfo>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in structural filter.
    pub fn with_builtin_filters() -> Self {
        let mut registry = Self::new();
        filters::register_builtins(&mut registry);
        registry
    }

    /// Register a factory. Returns `false` and keeps the existing entry if the
    /// name is taken.
    pub fn register<F>(&mut self, factory: F) -> bool
    where
        F: Fn() -> Box<dyn Filter> + Send + Sync + 'static,
    {
        let sample = factory();
        let name = sample.name().to_string();
        if self.factories.contains_key(&name) {
            return false;
        }
        self.infos.insert(
            name.clone(),
            FilterInfo {
                name: name.clone(),
                human_name: sample.human_name().to_string(),
            },
        );
        self.factories.insert(name, Box::new(factory));
        true
    }

    pub fn create(&self, name: &str) -> FilterResult<Box<dyn Filter>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Every registered filter in name order.
    pub fn list(&self) -> Vec<FilterInfo> {
        self.infos.values().cloned().collect()
    }

    /// Filters whose name or human name contains `text`, ignoring case.
    pub fn search(&self, text: &str) -> Vec<FilterInfo> {
        let needle = text.to_lowercase();
        self.infos
            .values()
            .filter(|info| {
                info.name.to_lowercase().contains(&needle)
                    || info.human_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
