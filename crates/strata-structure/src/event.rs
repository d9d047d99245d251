//! Change notification for structural mutations.
//!
//! Every successful structural mutation of a
//! [`DataStructure`](crate::DataStructure) produces one or more
//! [`DataEvent`]s, delivered synchronously to every registered observer
//! whose [`EventFilter`] matches, in mutation order, before the mutating call
//! returns. A cascade removal produces one `Removed` event per object it
//! erases.
//!
//! Observers receive only the event, never the store. The mutating call
//! holds the store exclusively while it notifies, so an observer cannot
//! mutate the store it is observing.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use strata_types::DataId;

/// A structural change to the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataEvent {
    /// A new object was registered, optionally under a parent group.
    Added {
        id: DataId,
        name: String,
        parent: Option<DataId>,
    },
    /// An object was erased. Carries the name it had at removal time.
    Removed { id: DataId, name: String },
    /// An additional parent edge was added.
    Reparented { id: DataId, parent: DataId },
    /// A parent edge was removed while the object itself stays registered.
    Detached { id: DataId, parent: DataId },
    /// An object was renamed under all of its parents at once.
    Renamed {
        id: DataId,
        old_name: String,
        new_name: String,
    },
}

impl DataEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Added { .. } => EventKind::Added,
            Self::Removed { .. } => EventKind::Removed,
            Self::Reparented { .. } => EventKind::Reparented,
            Self::Detached { .. } => EventKind::Detached,
            Self::Renamed { .. } => EventKind::Renamed,
        }
    }

    /// The object the event is about.
    pub fn id(&self) -> DataId {
        match self {
            Self::Added { id, .. }
            | Self::Removed { id, .. }
            | Self::Reparented { id, .. }
            | Self::Detached { id, .. }
            | Self::Renamed { id, .. } => *id,
        }
    }
}

/// Classification of data events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Added,
    Removed,
    Reparented,
    Detached,
    Renamed,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "Added",
            Self::Removed => "Removed",
            Self::Reparented => "Reparented",
            Self::Detached => "Detached",
            Self::Renamed => "Renamed",
        };
        write!(f, "{s}")
    }
}

/// Receives data events.
///
/// Implemented for every `FnMut(&DataEvent) + Send` closure.
pub trait DataObserver: Send {
    fn on_event(&mut self, event: &DataEvent);
}

impl<F> DataObserver for F
where
    F: FnMut(&DataEvent) + Send,
{
    fn on_event(&mut self, event: &DataEvent) {
        self(event)
    }
}

/// Handle returned when registering an observer, used to remove it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Filter for observing a subset of events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
    /// If set, only events about these objects are delivered.
    pub ids: Option<Vec<DataId>>,
}

impl EventFilter {
    /// A filter matching only the given kinds.
    pub fn kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
            ids: None,
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &DataEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }
        if let Some(ref ids) = self.ids {
            if !ids.contains(&event.id()) {
                return false;
            }
        }
        true
    }
}

struct Subscriber {
    id: ObserverId,
    filter: EventFilter,
    observer: Box<dyn DataObserver>,
}

/// The set of observers registered on one store.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl Observers {
    pub(crate) fn add(&mut self, filter: EventFilter, observer: Box<dyn DataObserver>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.subscribers.push(Subscriber {
            id,
            filter,
            observer,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|sub| sub.id != id);
        self.subscribers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver an event to every matching observer, in registration order.
    pub(crate) fn notify(&mut self, event: &DataEvent) {
        for sub in &mut self.subscribers {
            if sub.filter.matches(event) {
                sub.observer.on_event(event);
            }
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.subscribers.len())
            .finish()
    }
}

/// An observer that records every event it receives.
///
/// Clones share the same buffer, so one clone can be registered on a store
/// while another is kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<DataEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<DataEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Number of recorded events of the given kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .expect("event log poisoned")
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("event log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().expect("event log poisoned").clear();
    }
}

impl DataObserver for EventLog {
    fn on_event(&mut self, event: &DataEvent) {
        self.events
            .lock()
            .expect("event log poisoned")
            .push(event.clone());
    }
}
