//! Data objects: the unit of identity in the graph.
//!
//! Every object is either a [`Group`] (a named container of child
//! identifiers) or a leaf carrying a [`Payload`]. The set of kinds is closed,
//! so capability checks are plain matches on [`ObjectKind`].
//!
//! Objects never hold their parents. The owning
//! [`DataStructure`](crate::DataStructure) keeps the parent-set relation as
//! the single source of truth and keeps every group's child map consistent
//! with it.

use std::collections::BTreeMap;

use strata_payload::Payload;
use strata_types::DataId;

/// Name-indexed child map of a container object.
///
/// Iteration is in name order, which makes enumeration and cascade
/// traversal deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    children: BTreeMap<String, DataId>,
}

impl Group {
    /// Identifier of the child with the given name.
    pub fn get(&self, name: &str) -> Option<DataId> {
        self.children.get(name).copied()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Returns `true` if `id` is a direct child. Linear in the child count;
    /// the store's parent relation answers the same question in log time.
    pub fn contains_id(&self, id: DataId) -> bool {
        self.children.values().any(|child| *child == id)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// `(name, id)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DataId)> + '_ {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Child identifiers in name order.
    pub fn child_ids(&self) -> Vec<DataId> {
        self.children.values().copied().collect()
    }

    /// Insert a child under `name`. Returns `false` (and leaves the map
    /// untouched) if the name is taken.
    pub(crate) fn insert(&mut self, name: String, id: DataId) -> bool {
        if self.children.contains_key(&name) {
            return false;
        }
        self.children.insert(name, id);
        true
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<DataId> {
        self.children.remove(name)
    }

    /// Re-key a child entry after its object was renamed.
    pub(crate) fn rename_child(&mut self, old: &str, new: String) {
        if let Some(id) = self.children.remove(old) {
            self.children.insert(new, id);
        }
    }
}

/// What an object is: a container or a payload-carrying leaf.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Group(Group),
    Leaf(Payload),
}

impl ObjectKind {
    /// An empty group.
    pub fn group() -> Self {
        Self::Group(Group::default())
    }

    /// Same configuration, no population: groups come back empty, leaves keep
    /// a by-value copy of their payload.
    pub fn shallow_clone(&self) -> Self {
        match self {
            Self::Group(_) => Self::group(),
            Self::Leaf(payload) => Self::Leaf(payload.clone()),
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> String {
        match self {
            Self::Group(group) => format!("group ({} children)", group.len()),
            Self::Leaf(payload) => payload.summary(),
        }
    }
}

/// A named, identified object registered in a data structure.
#[derive(Clone, Debug, PartialEq)]
pub struct DataObject {
    id: DataId,
    name: String,
    kind: ObjectKind,
}

impl DataObject {
    pub(crate) fn new(id: DataId, name: String, kind: ObjectKind) -> Self {
        Self { id, name, kind }
    }

    pub fn id(&self) -> DataId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ObjectKind::Group(group) => Some(group),
            ObjectKind::Leaf(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match &self.kind {
            ObjectKind::Leaf(payload) => Some(payload),
            ObjectKind::Group(_) => None,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            ObjectKind::Group(group) => Some(group),
            ObjectKind::Leaf(_) => None,
        }
    }

    pub(crate) fn payload_mut(&mut self) -> Option<&mut Payload> {
        match &mut self.kind {
            ObjectKind::Leaf(payload) => Some(payload),
            ObjectKind::Group(_) => None,
        }
    }
}
