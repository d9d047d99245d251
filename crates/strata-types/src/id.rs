use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a data object.
///
/// A `DataId` is unique within the store that issued it and stays stable for
/// the lifetime of the object, across renames and reparenting. Values carry
/// no meaning beyond identity: they are not contiguous and their ordering is
/// only useful for deterministic iteration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataId(u64);

impl DataId {
    /// Create a `DataId` from a raw value. Identifiers for live objects are
    /// only ever issued by an [`IdRegistry`]; this is for tests and tooling.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw numeric value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataId({})", self.0)
    }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d:{}", self.0)
    }
}

impl From<DataId> for u64 {
    fn from(id: DataId) -> Self {
        id.0
    }
}

/// Issues identifiers and tracks the set of live ones.
///
/// Identifiers come from a monotonically increasing sequence, so an id is
/// never reissued, not even after its object has been released. Cloning a
/// registry shares the sequence with the clone: a store and its copies keep
/// drawing from the same counter and never hand out the same id to two new
/// objects. The live sets are independent after the clone.
#[derive(Clone, Debug)]
pub struct IdRegistry {
    sequence: Arc<AtomicU64>,
    live: BTreeSet<DataId>,
}

impl IdRegistry {
    /// Create a registry whose first issued id is `d:1`.
    pub fn new() -> Self {
        Self {
            sequence: Arc::new(AtomicU64::new(1)),
            live: BTreeSet::new(),
        }
    }

    /// Issue a fresh identifier and mark it live.
    pub fn allocate(&mut self) -> DataId {
        let id = DataId(self.sequence.fetch_add(1, Ordering::Relaxed));
        self.live.insert(id);
        id
    }

    /// Mark an identifier as no longer live. Returns `true` if it was live.
    pub fn release(&mut self, id: DataId) -> bool {
        self.live.remove(&id)
    }

    /// Returns `true` if `id` was issued by this registry and not released.
    pub fn is_live(&self, id: DataId) -> bool {
        self.live.contains(&id)
    }

    /// Number of live identifiers.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live identifiers in ascending order.
    pub fn live_ids(&self) -> impl Iterator<Item = DataId> + '_ {
        self.live.iter().copied()
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}
