//! Identity-based routes through the graph.
//!
//! A [`LinkedPath`] is captured once from a [`DataPath`] and then holds the
//! identifier of every hop instead of its name. Every access re-walks the
//! identifier sequence against the live graph: each hop must still be
//! registered and must still be a child of the previous hop. Renames along
//! the route do not affect it. Removing any hop, or the edge between two
//! hops, makes it permanently invalid; it never re-resolves by name.

use strata_types::DataId;

use crate::error::{StructureError, StructureResult};
use crate::object::DataObject;
use crate::path::DataPath;
use crate::structure::{DataStructure, StoreId};

/// A resolved, rename-resistant route: one identifier per hop.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkedPath {
    store: StoreId,
    ids: Vec<DataId>,
}

impl LinkedPath {
    pub(crate) fn new(store: StoreId, ids: Vec<DataId>) -> Self {
        Self { store, ids }
    }

    /// The store this path was resolved against.
    pub fn store_id(&self) -> StoreId {
        self.store
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[DataId] {
        &self.ids
    }

    /// Identifier captured at hop `index`.
    pub fn id_at(&self, index: usize) -> Option<DataId> {
        self.ids.get(index).copied()
    }

    /// Identifier of the final hop.
    pub fn target_id(&self) -> Option<DataId> {
        self.ids.last().copied()
    }

    /// Re-walk the route and return the target, or the first broken hop.
    pub fn resolve<'a>(&self, data: &'a DataStructure) -> StructureResult<&'a DataObject> {
        self.validate(data)?;
        let target = self.target_id().ok_or_else(|| invalid(0, "path is empty"))?;
        data.get_data(target)
            .ok_or_else(|| invalid(self.ids.len() - 1, "target is no longer registered"))
    }

    /// The target object, if every hop is still registered and linked.
    pub fn get_data<'a>(&self, data: &'a DataStructure) -> Option<&'a DataObject> {
        self.resolve(data).ok()
    }

    /// Returns `true` if [`get_data`](Self::get_data) would succeed.
    pub fn is_valid(&self, data: &DataStructure) -> bool {
        self.validate(data).is_ok()
    }

    /// The current name path along the captured route. Reflects renames
    /// made since the path was captured; `None` once the route is broken.
    pub fn to_data_path(&self, data: &DataStructure) -> Option<DataPath> {
        self.validate(data).ok()?;
        self.ids
            .iter()
            .map(|id| data.get_data(*id).map(|obj| obj.name().to_string()))
            .collect::<Option<Vec<_>>>()
            .map(DataPath::new)
    }

    fn validate(&self, data: &DataStructure) -> StructureResult<()> {
        if self.store != data.store_id() {
            return Err(invalid(0, "resolved against a different store"));
        }
        let Some((&first, rest)) = self.ids.split_first() else {
            return Err(invalid(0, "path is empty"));
        };
        if !data.is_root(first) {
            return Err(invalid(0, format!("{first} is no longer a registered root")));
        }
        let mut previous = first;
        for (offset, &id) in rest.iter().enumerate() {
            let hop = offset + 1;
            if !data.contains(id) {
                return Err(invalid(hop, format!("{id} is no longer registered")));
            }
            if !data.is_child_of(id, previous) {
                return Err(invalid(hop, format!("{id} is no longer a child of {previous}")));
            }
            previous = id;
        }
        Ok(())
    }
}

fn invalid(hop: usize, reason: impl Into<String>) -> StructureError {
    StructureError::InvalidReference {
        hop,
        reason: reason.into(),
    }
}
