//! The owning registry of data objects.
//!
//! [`DataStructure`] owns every [`DataObject`] by identifier and keeps the
//! parent-set relation (child -> set of parent groups) as the single source
//! of truth for containment. Each group's local name map is only ever edited
//! together with the matching parent-set entry.
//!
//! # Invariants
//!
//! - Every identifier in a group's child map is registered.
//! - `child` is in `group`'s map iff `group` is in `parents[child]`.
//! - Every registered object has a parent or is a root.
//! - Containment is acyclic.
//! - Sibling names are unique under every group and among the roots.
//!
//! [`DataStructure::audit`] checks all of these.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use strata_payload::{ArrayData, DataStore, Element, Payload, ScalarValue};
use strata_types::{validate_object_name, DataId, IdRegistry};
use tracing::{debug, error, trace};

use crate::config::StructureConfig;
use crate::error::{StructureError, StructureResult};
use crate::event::{DataEvent, DataObserver, EventFilter, ObserverId, Observers};
use crate::linked_path::LinkedPath;
use crate::object::{DataObject, Group, ObjectKind};
use crate::path::DataPath;

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one store instance. Copies get a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store:{}", self.0)
    }
}

/// An in-memory graph of named data objects with multi-parent containment.
///
/// Mutation takes `&mut self`, so callers serialize writers; shared
/// `&DataStructure` references may resolve paths concurrently.
pub struct DataStructure {
    pub(crate) store_id: StoreId,
    pub(crate) config: StructureConfig,
    pub(crate) registry: IdRegistry,
    /// All live objects, keyed by identifier.
    pub(crate) objects: HashMap<DataId, DataObject>,
    /// Parent-set relation: child -> groups currently containing it.
    pub(crate) parents: HashMap<DataId, BTreeSet<DataId>>,
    /// Top-level objects by name.
    pub(crate) roots: BTreeMap<String, DataId>,
    pub(crate) observers: Observers,
}

impl DataStructure {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StructureConfig::default())
    }

    pub fn with_config(config: StructureConfig) -> Self {
        Self {
            store_id: StoreId::fresh(),
            config,
            registry: IdRegistry::new(),
            objects: HashMap::new(),
            parents: HashMap::new(),
            roots: BTreeMap::new(),
            observers: Observers::default(),
        }
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    pub fn contains(&self, id: DataId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get_data(&self, id: DataId) -> Option<&DataObject> {
        self.objects.get(&id)
    }

    /// All registered identifiers in ascending order.
    pub fn ids(&self) -> Vec<DataId> {
        let mut ids: Vec<DataId> = self.objects.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Mutable access to a leaf's payload. Structural fields are never
    /// reachable mutably from outside the store.
    pub fn payload_mut(&mut self, id: DataId) -> Option<&mut Payload> {
        self.objects.get_mut(&id)?.payload_mut()
    }

    /// Typed view of a leaf array.
    pub fn array<T: Element>(&self, id: DataId) -> StructureResult<&DataStore<T>> {
        let object = self.objects.get(&id).ok_or(StructureError::NotFound(id))?;
        let array = object
            .payload()
            .and_then(Payload::as_array)
            .ok_or(StructureError::NotALeaf(id))?;
        Ok(array.as_store::<T>()?)
    }

    pub fn array_mut<T: Element>(&mut self, id: DataId) -> StructureResult<&mut DataStore<T>> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or(StructureError::NotFound(id))?;
        let array = object
            .payload_mut()
            .and_then(Payload::as_array_mut)
            .ok_or(StructureError::NotALeaf(id))?;
        Ok(array.as_store_mut::<T>()?)
    }

    /// A leaf's scalar value.
    pub fn scalar(&self, id: DataId) -> StructureResult<&ScalarValue> {
        let object = self.objects.get(&id).ok_or(StructureError::NotFound(id))?;
        object
            .payload()
            .and_then(Payload::as_scalar)
            .ok_or(StructureError::NotALeaf(id))
    }

    /// Top-level objects in name order.
    pub fn roots(&self) -> Vec<DataId> {
        self.roots.values().copied().collect()
    }

    /// Returns `true` if `id` is registered as a top-level object.
    pub fn is_root(&self, id: DataId) -> bool {
        self.objects
            .get(&id)
            .is_some_and(|obj| self.roots.get(obj.name()) == Some(&id))
    }

    /// Groups currently containing `id`, in identifier order.
    pub fn parents_of(&self, id: DataId) -> Vec<DataId> {
        self.parents
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Direct children of a group in name order; empty for leaves.
    pub fn children_of(&self, id: DataId) -> Vec<DataId> {
        self.objects
            .get(&id)
            .and_then(DataObject::as_group)
            .map(Group::child_ids)
            .unwrap_or_default()
    }

    /// Returns `true` if the edge `parent -> child` exists.
    pub fn is_child_of(&self, child: DataId, parent: DataId) -> bool {
        self.parents
            .get(&child)
            .is_some_and(|set| set.contains(&parent))
    }

    /// Every transitive parent of `id`. The object itself is not included.
    pub fn ancestors(&self, id: DataId) -> BTreeSet<DataId> {
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<DataId> = self.parents_of(id).into();
        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                queue.extend(self.parents_of(current));
            }
        }
        visited
    }

    /// Every transitive child of `id` in breadth-first, name order. The
    /// object itself is not included.
    pub fn descendants(&self, id: DataId) -> Vec<DataId> {
        let mut visited = BTreeSet::new();
        visited.insert(id);
        let mut result = Vec::new();
        let mut queue: VecDeque<DataId> = self.children_of(id).into();
        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                result.push(current);
                queue.extend(self.children_of(current));
            }
        }
        result
    }

    /// Every name path that currently reaches `id`, sorted.
    ///
    /// The result grows with the product of fan-ins along the way up, so on
    /// heavily shared graphs prefer [`path_count`](Self::path_count) or
    /// [`primary_path`](Self::primary_path).
    pub fn paths_to(&self, id: DataId) -> Vec<DataPath> {
        let Some(object) = self.objects.get(&id) else {
            return Vec::new();
        };
        let mut paths = Vec::new();
        if self.is_root(id) {
            paths.push(DataPath::new([object.name()]));
        }
        for parent in self.parents_of(id) {
            for prefix in self.paths_to(parent) {
                paths.push(prefix.child(object.name()));
            }
        }
        paths.sort();
        paths
    }

    /// Number of distinct name paths reaching `id`, saturating at
    /// `u64::MAX`. Linear in the number of ancestors.
    pub fn path_count(&self, id: DataId) -> u64 {
        fn count(ds: &DataStructure, id: DataId, memo: &mut HashMap<DataId, u64>) -> u64 {
            if let Some(n) = memo.get(&id) {
                return *n;
            }
            let mut n = u64::from(ds.is_root(id));
            for parent in ds.parents_of(id) {
                n = n.saturating_add(count(ds, parent, memo));
            }
            memo.insert(id, n);
            n
        }

        if !self.contains(id) {
            return 0;
        }
        count(self, id, &mut HashMap::new())
    }

    /// One name path reaching `id`, following the lowest-numbered parent at
    /// each step.
    pub fn primary_path(&self, id: DataId) -> Option<DataPath> {
        let mut names = Vec::new();
        let mut current = id;
        loop {
            names.push(self.objects.get(&current)?.name().to_string());
            if self.is_root(current) {
                break;
            }
            current = *self.parents.get(&current)?.iter().next()?;
        }
        names.reverse();
        Some(DataPath::new(names))
    }

    // ---------------------------------------------------------------
    // Path resolution
    // ---------------------------------------------------------------

    /// Resolve a name path to an identifier, walking from the roots.
    ///
    /// Resolution is always fresh: a rename anywhere along the route is
    /// observed by the next call.
    pub fn get_id(&self, path: &DataPath) -> Option<DataId> {
        let mut names = path.iter();
        let first = names.next()?;
        let mut current = *self.roots.get(first)?;
        for name in names {
            current = self.objects.get(&current)?.as_group()?.get(name)?;
        }
        trace!(%path, id = %current, "resolved path");
        Some(current)
    }

    pub fn get_data_by_path(&self, path: &DataPath) -> Option<&DataObject> {
        self.get_id(path).and_then(|id| self.objects.get(&id))
    }

    /// Resolve a path once and capture the identifier of every hop.
    pub fn get_linked_path(&self, path: &DataPath) -> StructureResult<LinkedPath> {
        let not_found = || StructureError::PathNotFound(path.clone());
        let mut names = path.iter();
        let first = names.next().ok_or_else(not_found)?;
        let mut current = *self.roots.get(first).ok_or_else(not_found)?;
        let mut ids = vec![current];
        for name in names {
            current = self
                .objects
                .get(&current)
                .and_then(DataObject::as_group)
                .and_then(|group| group.get(name))
                .ok_or_else(not_found)?;
            ids.push(current);
        }
        Ok(LinkedPath::new(self.store_id, ids))
    }

    // ---------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------

    /// Register a new object, at the top level or under a parent group.
    pub fn create_object(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        let name = name.into();
        validate_object_name(&name, self.config.max_name_len)?;
        match parent {
            Some(parent_id) => {
                if self.group(parent_id)?.contains_name(&name) {
                    return Err(StructureError::NameCollision { parent, name });
                }
            }
            None => {
                if self.roots.contains_key(&name) {
                    return Err(StructureError::NameCollision { parent, name });
                }
            }
        }

        // Children are only ever attached through the store.
        let kind = match kind {
            ObjectKind::Group(_) => ObjectKind::group(),
            leaf => leaf,
        };
        let id = self.registry.allocate();
        let mut parent_set = BTreeSet::new();
        match parent {
            Some(parent_id) => {
                self.group_mut(parent_id)?.insert(name.clone(), id);
                parent_set.insert(parent_id);
            }
            None => {
                self.roots.insert(name.clone(), id);
            }
        }
        self.parents.insert(id, parent_set);
        self.objects
            .insert(id, DataObject::new(id, name.clone(), kind));

        debug!(id = %id, name = %name, parent = ?parent, "created data object");
        self.commit(vec![DataEvent::Added { id, name, parent }]);
        Ok(id)
    }

    pub fn create_group(
        &mut self,
        name: impl Into<String>,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        self.create_object(name, ObjectKind::group(), parent)
    }

    pub fn create_leaf(
        &mut self,
        name: impl Into<String>,
        payload: impl Into<Payload>,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        self.create_object(name, ObjectKind::Leaf(payload.into()), parent)
    }

    pub fn create_array<T: Element>(
        &mut self,
        name: impl Into<String>,
        store: DataStore<T>,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        self.create_leaf(name, ArrayData::from(store), parent)
    }

    pub fn create_scalar<T: Element>(
        &mut self,
        name: impl Into<String>,
        value: T,
        parent: Option<DataId>,
    ) -> StructureResult<DataId> {
        self.create_leaf(name, ScalarValue::new(value), parent)
    }

    // ---------------------------------------------------------------
    // Structural edits
    // ---------------------------------------------------------------

    /// Rename an object under all of its parents at once.
    ///
    /// Fails without change if any parent (or the root table, for a root)
    /// already holds a different object under `new_name`. Linked paths are
    /// unaffected; name paths through the object change meaning.
    pub fn rename(&mut self, id: DataId, new_name: impl Into<String>) -> StructureResult<()> {
        let new_name = new_name.into();
        self.check_rename(id, &new_name)?;
        let old_name = self
            .objects
            .get(&id)
            .ok_or(StructureError::NotFound(id))?
            .name()
            .to_string();
        if old_name == new_name {
            return Ok(());
        }

        let parent_ids = self.parents_of(id);
        let is_root = self.is_root(id);
        for parent_id in &parent_ids {
            self.group_mut(*parent_id)?
                .rename_child(&old_name, new_name.clone());
        }
        if is_root {
            self.roots.remove(&old_name);
            self.roots.insert(new_name.clone(), id);
        }
        if let Some(object) = self.objects.get_mut(&id) {
            object.set_name(new_name.clone());
        }

        debug!(id = %id, old = %old_name, new = %new_name, "renamed data object");
        self.commit(vec![DataEvent::Renamed {
            id,
            old_name,
            new_name,
        }]);
        Ok(())
    }

    /// Check that `id` could be renamed to `new_name` without changing the
    /// store.
    pub fn check_rename(&self, id: DataId, new_name: &str) -> StructureResult<()> {
        validate_object_name(new_name, self.config.max_name_len)?;
        let object = self.objects.get(&id).ok_or(StructureError::NotFound(id))?;
        if object.name() == new_name {
            return Ok(());
        }
        for parent_id in self.parents_of(id) {
            if self.group(parent_id)?.contains_name(new_name) {
                return Err(StructureError::NameCollision {
                    parent: Some(parent_id),
                    name: new_name.to_string(),
                });
            }
        }
        if self.is_root(id) && self.roots.contains_key(new_name) {
            return Err(StructureError::NameCollision {
                parent: None,
                name: new_name.to_string(),
            });
        }
        Ok(())
    }

    /// Returns `true` if `candidate` could be inserted as a child of
    /// `parent`: the parent is a group, no sibling has the candidate's name,
    /// and the candidate is neither the parent nor one of its ancestors.
    pub fn can_insert(&self, parent: DataId, candidate: DataId) -> bool {
        self.check_insert(parent, candidate).is_ok()
    }

    /// Add a parallel ownership edge: `child` becomes reachable from
    /// `new_parent` as well as from its existing parents.
    pub fn add_additional_parent(&mut self, child: DataId, new_parent: DataId) -> StructureResult<()> {
        self.check_insert(new_parent, child)?;
        let name = self
            .objects
            .get(&child)
            .ok_or(StructureError::NotFound(child))?
            .name()
            .to_string();

        self.group_mut(new_parent)?.insert(name.clone(), child);
        self.parents.entry(child).or_default().insert(new_parent);

        debug!(id = %child, name = %name, parent = %new_parent, "added parent edge");
        self.commit(vec![DataEvent::Reparented {
            id: child,
            parent: new_parent,
        }]);
        Ok(())
    }

    /// The reason `candidate` cannot be inserted under `parent`, if any.
    pub fn check_insert(&self, parent: DataId, candidate: DataId) -> StructureResult<()> {
        let object = self
            .objects
            .get(&candidate)
            .ok_or(StructureError::NotFound(candidate))?;
        let group = self.group(parent)?;
        if self.is_child_of(candidate, parent) {
            return Err(StructureError::AlreadyParented {
                child: candidate,
                parent,
            });
        }
        if group.contains_name(object.name()) {
            return Err(StructureError::NameCollision {
                parent: Some(parent),
                name: object.name().to_string(),
            });
        }
        if candidate == parent || self.ancestors(parent).contains(&candidate) {
            return Err(StructureError::CycleRejected {
                child: candidate,
                parent,
            });
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Observation
    // ---------------------------------------------------------------

    /// Register an observer for every event. It stays registered until
    /// removed or until the store is dropped; store copies do not inherit it.
    pub fn add_observer(&mut self, observer: impl DataObserver + 'static) -> ObserverId {
        self.observers
            .add(EventFilter::default(), Box::new(observer))
    }

    /// Register an observer for the events matching `filter`.
    pub fn add_filtered_observer(
        &mut self,
        filter: EventFilter,
        observer: impl DataObserver + 'static,
    ) -> ObserverId {
        self.observers.add(filter, Box::new(observer))
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    pub(crate) fn group(&self, id: DataId) -> StructureResult<&Group> {
        self.objects
            .get(&id)
            .ok_or(StructureError::NotFound(id))?
            .as_group()
            .ok_or(StructureError::NotAGroup(id))
    }

    pub(crate) fn group_mut(&mut self, id: DataId) -> StructureResult<&mut Group> {
        self.objects
            .get_mut(&id)
            .ok_or(StructureError::NotFound(id))?
            .as_group_mut()
            .ok_or(StructureError::NotAGroup(id))
    }

    /// Finish a mutation: optionally audit, then notify observers in order.
    pub(crate) fn commit(&mut self, events: Vec<DataEvent>) {
        if self.config.verify_invariants {
            let report = self.audit();
            if !report.is_valid() {
                for violation in &report.violations {
                    error!(id = %violation.id, kind = ?violation.kind, "{}", violation.description);
                }
                debug_assert!(report.is_valid(), "data structure invariants violated");
            }
        }
        for event in &events {
            self.observers.notify(event);
        }
    }
}

impl Default for DataStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStructure")
            .field("store_id", &self.store_id)
            .field("object_count", &self.objects.len())
            .field("root_count", &self.roots.len())
            .field("observer_count", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventLog};

    fn verifying() -> DataStructure {
        DataStructure::with_config(StructureConfig::verifying())
    }

    #[test]
    fn create_and_find_by_id() {
        let mut ds = verifying();
        let group = ds.create_group("Foo", None).unwrap();
        let child = ds.create_group("bar", Some(group)).unwrap();
        let grandchild = ds.create_group("bazz", Some(child)).unwrap();

        assert_eq!(ds.len(), 3);
        assert!(ds.get_data(group).is_some());
        assert!(ds.get_data(child).is_some());
        assert!(ds.get_data(grandchild).is_some());
        assert_eq!(ds.roots(), vec![group]);
        assert_eq!(ds.parents_of(grandchild), vec![child]);
    }

    #[test]
    fn path_round_trip_after_creation() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let arr = ds
            .create_array("array", DataStore::<i32>::new(2, 2).unwrap(), Some(foo))
            .unwrap();
        let path = DataPath::new(["Foo", "array"]);
        assert_eq!(ds.get_id(&path), Some(arr));
        assert_eq!(ds.get_data_by_path(&path).unwrap().id(), arr);
    }

    #[test]
    fn path_fails_through_leaf_or_missing_hop() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        ds.create_scalar("s", 6i32, Some(foo)).unwrap();
        assert!(ds.get_id(&DataPath::new(["Foo", "s", "x"])).is_none());
        assert!(ds.get_id(&DataPath::new(["Foo", "nope"])).is_none());
        assert!(ds.get_id(&DataPath::new(["Nope"])).is_none());
        assert!(ds.get_id(&DataPath::default()).is_none());
        assert!(matches!(
            ds.get_linked_path(&DataPath::new(["Foo", "nope"])),
            Err(StructureError::PathNotFound(_))
        ));
    }

    #[test]
    fn sibling_names_are_unique() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        ds.create_group("a", Some(foo)).unwrap();
        assert_eq!(
            ds.create_group("a", Some(foo)),
            Err(StructureError::NameCollision {
                parent: Some(foo),
                name: "a".into()
            })
        );
        assert!(matches!(
            ds.create_group("Foo", None),
            Err(StructureError::NameCollision { parent: None, .. })
        ));
    }

    #[test]
    fn create_under_leaf_or_missing_parent_fails() {
        let mut ds = verifying();
        let leaf = ds.create_scalar("s", 1.0f64, None).unwrap();
        assert_eq!(
            ds.create_group("g", Some(leaf)),
            Err(StructureError::NotAGroup(leaf))
        );
        let missing = DataId::from_raw(999);
        assert_eq!(
            ds.create_group("g", Some(missing)),
            Err(StructureError::NotFound(missing))
        );
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut ds = verifying();
        assert!(matches!(
            ds.create_group("a/b", None),
            Err(StructureError::InvalidName(_))
        ));
        let foo = ds.create_group("Foo", None).unwrap();
        assert!(matches!(ds.rename(foo, ""), Err(StructureError::InvalidName(_))));
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn name_length_follows_config() {
        let mut ds = DataStructure::with_config(StructureConfig {
            max_name_len: 4,
            ..StructureConfig::default()
        });
        assert!(ds.create_group("abcd", None).is_ok());
        assert!(ds.create_group("abcde", None).is_err());
    }

    #[test]
    fn rename_updates_every_parent() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let a = ds.create_group("A", Some(foo)).unwrap();
        let b = ds.create_group("B", Some(foo)).unwrap();
        let x = ds.create_group("X", Some(a)).unwrap();
        ds.add_additional_parent(x, b).unwrap();

        ds.rename(x, "Y").unwrap();
        assert_eq!(ds.get_id(&DataPath::new(["Foo", "A", "Y"])), Some(x));
        assert_eq!(ds.get_id(&DataPath::new(["Foo", "B", "Y"])), Some(x));
        assert_eq!(ds.get_id(&DataPath::new(["Foo", "A", "X"])), None);
    }

    #[test]
    fn rename_collision_under_any_parent_fails_atomically() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let a = ds.create_group("A", Some(foo)).unwrap();
        let b = ds.create_group("B", Some(foo)).unwrap();
        let x = ds.create_group("X", Some(a)).unwrap();
        ds.add_additional_parent(x, b).unwrap();
        ds.create_group("Taken", Some(b)).unwrap();

        assert_eq!(
            ds.rename(x, "Taken"),
            Err(StructureError::NameCollision {
                parent: Some(b),
                name: "Taken".into()
            })
        );
        assert_eq!(ds.get_data(x).unwrap().name(), "X");
        assert_eq!(ds.get_id(&DataPath::new(["Foo", "A", "X"])), Some(x));
    }

    #[test]
    fn rename_root() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        ds.create_group("Other", None).unwrap();
        assert!(ds.rename(foo, "Other").is_err());
        ds.rename(foo, "Renamed").unwrap();
        assert!(ds.is_root(foo));
        assert_eq!(ds.get_id(&DataPath::new(["Renamed"])), Some(foo));
        assert_eq!(ds.get_id(&DataPath::new(["Foo"])), None);
    }

    #[test]
    fn rename_to_same_name_is_a_quiet_no_op() {
        let mut ds = verifying();
        let log = EventLog::new();
        ds.add_observer(log.clone());
        let foo = ds.create_group("Foo", None).unwrap();
        ds.rename(foo, "Foo").unwrap();
        assert_eq!(log.count(EventKind::Renamed), 0);
    }

    #[test]
    fn additional_parent_rules() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let a = ds.create_group("A", Some(foo)).unwrap();
        let b = ds.create_group("B", Some(foo)).unwrap();
        let x = ds.create_group("X", Some(a)).unwrap();
        let leaf = ds.create_scalar("leaf", 1u8, Some(foo)).unwrap();

        assert_eq!(
            ds.add_additional_parent(x, a),
            Err(StructureError::AlreadyParented { child: x, parent: a })
        );
        assert_eq!(
            ds.add_additional_parent(x, leaf),
            Err(StructureError::NotAGroup(leaf))
        );
        assert_eq!(
            ds.add_additional_parent(foo, x),
            Err(StructureError::CycleRejected { child: foo, parent: x })
        );
        assert_eq!(
            ds.add_additional_parent(a, a),
            Err(StructureError::CycleRejected { child: a, parent: a })
        );
        ds.create_group("X", Some(b)).unwrap();
        assert!(matches!(
            ds.add_additional_parent(x, b),
            Err(StructureError::NameCollision { .. })
        ));
    }

    #[test]
    fn can_insert_matches_add_additional_parent() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let a = ds.create_group("A", Some(foo)).unwrap();
        let b = ds.create_group("B", Some(foo)).unwrap();
        let x = ds.create_group("X", Some(a)).unwrap();

        assert!(ds.can_insert(b, x));
        assert!(!ds.can_insert(x, foo));
        assert!(!ds.can_insert(a, x));
        assert!(ds.add_additional_parent(x, b).is_ok());
        assert!(!ds.can_insert(b, x));
    }

    #[test]
    fn root_with_an_additional_parent_stays_a_root() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let shared = ds.create_group("Shared", None).unwrap();
        ds.add_additional_parent(shared, foo).unwrap();

        assert!(ds.is_root(shared));
        assert_eq!(
            ds.paths_to(shared),
            vec![DataPath::new(["Foo", "Shared"]), DataPath::new(["Shared"])]
        );
        assert_eq!(ds.path_count(shared), 2);
        assert_eq!(ds.primary_path(shared), Some(DataPath::new(["Shared"])));
    }

    /// `levels` rungs of two groups, each contained by both groups of the
    /// rung above, ending in a single `Tip`. `Tip` has `2^levels` paths.
    fn diamond_ladder(levels: usize) -> (DataStructure, DataId) {
        let mut ds = DataStructure::new();
        let root = ds.create_group("Root", None).unwrap();
        let mut rung = vec![root];
        for level in 0..levels {
            let mut next = Vec::new();
            for side in ["A", "B"] {
                let id = ds.create_group(format!("{side}{level}"), Some(rung[0])).unwrap();
                for parent in &rung[1..] {
                    ds.add_additional_parent(id, *parent).unwrap();
                }
                next.push(id);
            }
            rung = next;
        }
        let tip = ds.create_group("Tip", Some(rung[0])).unwrap();
        ds.add_additional_parent(tip, rung[1]).unwrap();
        (ds, tip)
    }

    #[test]
    fn path_count_agrees_with_paths_to() {
        let (ds, tip) = diamond_ladder(6);
        assert_eq!(ds.path_count(tip), 64);
        assert_eq!(ds.paths_to(tip).len(), 64);
        assert_eq!(ds.path_count(DataId::from_raw(9999)), 0);
    }

    #[test]
    fn path_count_stays_linear_on_deep_ladders() {
        let (ds, tip) = diamond_ladder(40);
        assert_eq!(ds.path_count(tip), 1 << 40);

        let (ds, tip) = diamond_ladder(80);
        assert_eq!(ds.path_count(tip), u64::MAX);
    }

    #[test]
    fn primary_path_resolves_back_to_the_object() {
        let (ds, tip) = diamond_ladder(50);
        let path = ds.primary_path(tip).unwrap();
        assert_eq!(path.len(), 52);
        assert_eq!(ds.get_id(&path), Some(tip));
        assert_eq!(ds.primary_path(DataId::from_raw(9999)), None);
    }

    #[test]
    fn ancestors_and_descendants() {
        let mut ds = verifying();
        let foo = ds.create_group("Foo", None).unwrap();
        let a = ds.create_group("A", Some(foo)).unwrap();
        let b = ds.create_group("B", Some(foo)).unwrap();
        let x = ds.create_group("X", Some(a)).unwrap();
        ds.add_additional_parent(x, b).unwrap();

        assert_eq!(ds.ancestors(x), BTreeSet::from([foo, a, b]));
        assert_eq!(ds.descendants(foo), vec![a, b, x]);
        assert!(ds.descendants(x).is_empty());
    }

    #[test]
    fn typed_payload_access() {
        let mut ds = verifying();
        let arr = ds
            .create_array("array", DataStore::<i32>::new(2, 2).unwrap(), None)
            .unwrap();
        let scalar = ds.create_scalar("scalar", 6i32, None).unwrap();
        let group = ds.create_group("group", None).unwrap();

        ds.array_mut::<i32>(arr).unwrap().fill(4);
        assert_eq!(ds.array::<i32>(arr).unwrap().get(3), Some(4));
        assert!(matches!(
            ds.array::<f32>(arr),
            Err(StructureError::Payload(_))
        ));
        assert_eq!(ds.scalar(scalar).unwrap().get::<i32>().unwrap(), 6);
        assert_eq!(ds.array::<i32>(group), Err(StructureError::NotALeaf(group)));
        assert!(ds.payload_mut(group).is_none());

        if let Some(Payload::Scalar(value)) = ds.payload_mut(scalar) {
            value.set(11i32).unwrap();
        }
        assert_eq!(ds.scalar(scalar).unwrap().get::<i32>().unwrap(), 11);
    }

    #[test]
    fn observers_can_be_filtered_and_removed() {
        let mut ds = verifying();
        let all = EventLog::new();
        let only_removed = EventLog::new();
        let all_id = ds.add_observer(all.clone());
        ds.add_filtered_observer(EventFilter::kinds([EventKind::Removed]), only_removed.clone());
        assert_eq!(ds.observer_count(), 2);

        let foo = ds.create_group("Foo", None).unwrap();
        ds.remove_data(foo).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(only_removed.len(), 1);

        assert!(ds.remove_observer(all_id));
        ds.create_group("Bar", None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn debug_output_is_compact() {
        let mut ds = DataStructure::new();
        ds.create_group("Foo", None).unwrap();
        let debug = format!("{ds:?}");
        assert!(debug.contains("object_count: 1"));
    }
}
