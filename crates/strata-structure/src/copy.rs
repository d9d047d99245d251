//! Object and whole-store duplication.

use std::collections::{BTreeSet, HashMap, VecDeque};

use strata_types::DataId;
use tracing::debug;

use crate::error::{StructureError, StructureResult};
use crate::event::Observers;
use crate::object::ObjectKind;
use crate::structure::{DataStructure, StoreId};

/// One source object captured before a deep copy starts editing the graph.
struct Snapshot {
    kind: ObjectKind,
    children: Vec<(String, DataId)>,
}

impl DataStructure {
    /// Duplicate an object's configuration without its population: a group
    /// comes back empty, a leaf keeps a copy of its payload.
    pub fn shallow_copy(
        &mut self,
        id: DataId,
        new_name: impl Into<String>,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        let kind = self
            .objects
            .get(&id)
            .ok_or(StructureError::NotFound(id))?
            .kind()
            .shallow_clone();
        self.create_object(new_name, kind, parent)
    }

    /// Duplicate an object and its entire subtree with fresh identifiers.
    ///
    /// A descendant reachable through several parents inside the subtree is
    /// copied once and linked under every copied parent, so the copy has the
    /// same sharing shape as the source. The subtree is captured before the
    /// first edit, which makes copying a group into its own descendant safe.
    pub fn deep_copy(
        &mut self,
        id: DataId,
        new_name: impl Into<String>,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        let (order, snapshots) = self.snapshot_subtree(id)?;

        let top_kind = snapshots
            .get(&id)
            .map(|s| s.kind.shallow_clone())
            .ok_or(StructureError::NotFound(id))?;
        let top = self.create_object(new_name, top_kind, parent)?;

        let mut copies: HashMap<DataId, DataId> = HashMap::from([(id, top)]);
        for source in order {
            let Some(snapshot) = snapshots.get(&source) else {
                continue;
            };
            let Some(&copied_parent) = copies.get(&source) else {
                continue;
            };
            for (name, child) in &snapshot.children {
                match copies.get(child) {
                    Some(&existing) => self.add_additional_parent(existing, copied_parent)?,
                    None => {
                        let kind = snapshots
                            .get(child)
                            .map(|s| s.kind.shallow_clone())
                            .ok_or(StructureError::NotFound(*child))?;
                        let copy = self.create_object(name.clone(), kind, Some(copied_parent))?;
                        copies.insert(*child, copy);
                    }
                }
            }
        }
        debug!(source = %id, copy = %top, objects = copies.len(), "deep copied subtree");
        Ok(top)
    }

    /// Breadth-first capture of the subtree rooted at `id`.
    fn snapshot_subtree(
        &self,
        id: DataId,
    ) -> StructureResult<(Vec<DataId>, HashMap<DataId, Snapshot>)> {
        if !self.contains(id) {
            return Err(StructureError::NotFound(id));
        }
        let mut order = Vec::new();
        let mut snapshots = HashMap::new();
        let mut seen = BTreeSet::from([id]);
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            let Some(object) = self.objects.get(&current) else {
                continue;
            };
            let children: Vec<(String, DataId)> = object
                .as_group()
                .map(|g| g.iter().map(|(n, c)| (n.to_string(), c)).collect())
                .unwrap_or_default();
            for (_, child) in &children {
                if seen.insert(*child) {
                    queue.push_back(*child);
                }
            }
            order.push(current);
            snapshots.insert(
                current,
                Snapshot {
                    kind: object.kind().shallow_clone(),
                    children,
                },
            );
        }
        Ok((order, snapshots))
    }
}

/// Copies every object, identifier, parent edge and root, and the
/// configuration. The copy gets a fresh store identity and no observers.
/// Both stores keep drawing identifiers from one shared sequence, so an id
/// created in either is never valid in the other.
impl Clone for DataStructure {
    fn clone(&self) -> Self {
        debug!(store = %self.store_id, objects = self.objects.len(), "cloning data structure");
        Self {
            store_id: StoreId::fresh(),
            config: self.config.clone(),
            registry: self.registry.clone(),
            objects: self.objects.clone(),
            parents: self.parents.clone(),
            roots: self.roots.clone(),
            observers: Observers::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StructureConfig;
    use crate::event::{EventKind, EventLog};
    use crate::path::DataPath;
    use strata_payload::DataStore;

    fn verifying() -> DataStructure {
        DataStructure::with_config(StructureConfig::verifying())
    }

    #[test]
    fn shallow_copy_of_group_is_empty() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        ds.create_group("child", Some(foo)).unwrap();
        let copy = ds.shallow_copy(foo, "FooCopy", None).unwrap();
        assert_ne!(copy, foo);
        assert!(ds.get_data(copy).unwrap().as_group().unwrap().is_empty());
    }

    #[test]
    fn shallow_copy_of_leaf_duplicates_payload() {
        let mut ds = verifying();
        let arr = ds
            .create_array("arr", DataStore::from_vec(1, vec![1i32, 2, 3]).unwrap(), None)
            .unwrap();
        let copy = ds.shallow_copy(arr, "arr2", None).unwrap();
        ds.array_mut::<i32>(arr).unwrap().fill(0);
        assert_eq!(ds.array::<i32>(copy).unwrap().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn deep_copy_preserves_sharing_shape() {
        let mut ds = verifying();
        let g = ds.create_group("G", None).unwrap();
        let a = ds.create_group("A", Some(g)).unwrap();
        let b = ds.create_group("B", Some(g)).unwrap();
        let x = ds.create_scalar("X", 7u32, Some(a)).unwrap();
        ds.add_additional_parent(x, b).unwrap();

        let log = EventLog::new();
        ds.add_observer(log.clone());
        let copy = ds.deep_copy(g, "G2", None).unwrap();

        let via_a = ds.get_id(&DataPath::new(["G2", "A", "X"])).unwrap();
        let via_b = ds.get_id(&DataPath::new(["G2", "B", "X"])).unwrap();
        assert_eq!(via_a, via_b);
        assert_ne!(via_a, x);
        assert_eq!(ds.parents_of(via_a).len(), 2);
        assert_eq!(ds.descendants(copy).len(), 3);
        assert_eq!(log.count(EventKind::Added), 4);
        assert_eq!(log.count(EventKind::Reparented), 1);
    }

    #[test]
    fn deep_copy_into_own_subtree() {
        let mut ds = verifying();
        let g = ds.create_group("G", None).unwrap();
        let a = ds.create_group("A", Some(g)).unwrap();
        ds.create_group("inner", Some(a)).unwrap();

        ds.deep_copy(g, "G", Some(a)).unwrap();
        assert!(ds.get_id(&DataPath::new(["G", "A", "G", "A", "inner"])).is_some());
        assert!(ds.get_id(&DataPath::new(["G", "A", "G", "A", "G"])).is_none());
        assert!(ds.audit().is_valid());
    }

    #[test]
    fn deep_copy_collision_leaves_store_unchanged() {
        let mut ds = verifying();
        let g = ds.create_group("G", None).unwrap();
        ds.create_group("A", Some(g)).unwrap();
        let before = ds.len();
        assert!(matches!(
            ds.deep_copy(g, "G", None),
            Err(StructureError::NameCollision { .. })
        ));
        assert_eq!(ds.len(), before);
    }

    #[test]
    fn clone_is_independent() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let bar = ds.create_group("Bar", Some(foo)).unwrap();
        let log = EventLog::new();
        ds.add_observer(log.clone());

        let mut copy = ds.clone();
        assert_ne!(copy.store_id(), ds.store_id());
        assert_eq!(copy.observer_count(), 0);
        assert_eq!(copy.get_data(bar), ds.get_data(bar));

        let only_in_copy = copy.create_group("New", Some(foo)).unwrap();
        assert!(!ds.contains(only_in_copy));
        copy.remove_data(bar).unwrap();
        assert!(ds.contains(bar));
        assert!(log.is_empty());

        let only_in_original = ds.create_group("Other", None).unwrap();
        assert_ne!(only_in_original, only_in_copy);
        assert!(!copy.contains(only_in_original));
        assert!(ds.audit().is_valid());
        assert!(copy.audit().is_valid());
    }

    #[test]
    fn clone_copies_payloads_by_value() {
        let mut ds = verifying();
        let arr = ds
            .create_array("arr", DataStore::<f64>::new(1, 2).unwrap(), None)
            .unwrap();
        let copy = ds.clone();
        ds.array_mut::<f64>(arr).unwrap().fill(1.5);
        assert_eq!(copy.array::<f64>(arr).unwrap().as_slice(), &[0.0, 0.0]);
    }
}
