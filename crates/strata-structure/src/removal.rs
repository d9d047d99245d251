//! Cascade removal under shared ownership.
//!
//! An object is erased once it has no parent left and is not a root. Erasing
//! a group severs its edge to every child; any child whose parent set becomes
//! empty (and is not a root) is erased in turn. The traversal is
//! breadth-first from the erased object, visiting children in name order, so
//! the set of erased objects and the order of `Removed` events are
//! deterministic.
//!
//! Every precondition is checked before the first edit, so a removal that
//! starts always completes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strata_types::DataId;
use tracing::debug;

use crate::error::{StructureError, StructureResult};
use crate::event::DataEvent;
use crate::object::ObjectKind;
use crate::path::DataPath;
use crate::structure::DataStructure;

/// An object erased by a removal, with the name it had at the time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedObject {
    pub id: DataId,
    pub name: String,
}

/// Outcome of a removal call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    /// Erased objects in erase order.
    pub removed: Vec<RemovedObject>,
    /// Edges `(child, parent)` removed from objects that survived.
    pub detached: Vec<(DataId, DataId)>,
}

impl RemovalReport {
    /// Number of erased objects.
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.detached.is_empty()
    }

    pub fn was_removed(&self, id: DataId) -> bool {
        self.removed.iter().any(|r| r.id == id)
    }

    pub fn removed_ids(&self) -> Vec<DataId> {
        self.removed.iter().map(|r| r.id).collect()
    }
}

impl DataStructure {
    /// Remove an object everywhere: detach it from every parent and from the
    /// root table, then erase it and cascade into its children.
    ///
    /// Removing an absent identifier fails with `NotFound` and changes
    /// nothing.
    pub fn remove_data(&mut self, id: DataId) -> StructureResult<RemovalReport> {
        let name = self
            .objects
            .get(&id)
            .ok_or(StructureError::NotFound(id))?
            .name()
            .to_string();

        for parent in self.parents_of(id) {
            if let Some(group) = self.objects.get_mut(&parent).and_then(|o| o.as_group_mut()) {
                group.remove(&name);
            }
        }
        if let Some(set) = self.parents.get_mut(&id) {
            set.clear();
        }
        if self.roots.get(&name) == Some(&id) {
            self.roots.remove(&name);
        }

        let report = RemovalReport {
            removed: self.cascade_from(id),
            detached: Vec::new(),
        };
        debug!(id = %id, name = %name, erased = report.removed_count(), "removed data object");
        self.commit(removal_events(&report));
        Ok(report)
    }

    /// Resolve a name path, then remove the target everywhere.
    pub fn remove_data_at(&mut self, path: &DataPath) -> StructureResult<RemovalReport> {
        let id = self
            .get_id(path)
            .ok_or_else(|| StructureError::PathNotFound(path.clone()))?;
        self.remove_data(id)
    }

    /// Remove the single edge from `parent` to its child named `name`.
    ///
    /// The child survives if it still has another parent or is a root;
    /// otherwise it is erased and the cascade continues from it.
    pub fn remove_child(&mut self, parent: DataId, name: &str) -> StructureResult<RemovalReport> {
        let child = self
            .group(parent)?
            .get(name)
            .ok_or_else(|| StructureError::ChildNotFound {
                parent,
                name: name.to_string(),
            })?;

        self.group_mut(parent)?.remove(name);
        let orphaned = match self.parents.get_mut(&child) {
            Some(set) => {
                set.remove(&parent);
                set.is_empty()
            }
            None => true,
        };

        let report = if orphaned && !self.is_root(child) {
            RemovalReport {
                removed: self.cascade_from(child),
                detached: Vec::new(),
            }
        } else {
            RemovalReport {
                removed: Vec::new(),
                detached: vec![(child, parent)],
            }
        };
        debug!(
            parent = %parent,
            child = %child,
            name = %name,
            erased = report.removed_count(),
            "removed child edge"
        );
        self.commit(removal_events(&report));
        Ok(report)
    }

    /// Erase `start` and every descendant left without a parent. The caller
    /// has already severed every edge into `start`.
    fn cascade_from(&mut self, start: DataId) -> Vec<RemovedObject> {
        let mut removed = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let Some(object) = self.objects.remove(&current) else {
                continue;
            };
            self.parents.remove(&current);
            self.registry.release(current);

            if let ObjectKind::Group(group) = object.kind() {
                for (_, child) in group.iter() {
                    let orphaned = match self.parents.get_mut(&child) {
                        Some(set) => {
                            set.remove(&current);
                            set.is_empty()
                        }
                        None => false,
                    };
                    if orphaned && !self.is_root(child) {
                        queue.push_back(child);
                    }
                }
            }
            removed.push(RemovedObject {
                id: current,
                name: object.name().to_string(),
            });
        }
        removed
    }
}

fn removal_events(report: &RemovalReport) -> Vec<DataEvent> {
    let detached = report
        .detached
        .iter()
        .map(|&(id, parent)| DataEvent::Detached { id, parent });
    let removed = report.removed.iter().map(|r| DataEvent::Removed {
        id: r.id,
        name: r.name.clone(),
    });
    detached.chain(removed).collect()
}
