//! Multi-parent object graph store for Strata.
//!
//! Objects live in one [`DataStructure`], addressed by [`DataId`]. A group
//! may be contained by several parent groups at once; an object is erased
//! only when the last edge into it goes away and it is not a root. Objects
//! are reached by name through a [`DataPath`], which is re-resolved on every
//! use, or by identity through a [`LinkedPath`], which survives renames and
//! reports when its route breaks. Every structural mutation is announced to
//! registered observers as a [`DataEvent`].

pub mod audit;
pub mod config;
pub mod copy;
pub mod error;
pub mod event;
pub mod linked_path;
pub mod object;
pub mod path;
pub mod removal;
pub mod structure;

pub use audit::{AuditReport, Violation, ViolationKind};
pub use config::StructureConfig;
pub use error::{StructureError, StructureResult};
pub use event::{DataEvent, DataObserver, EventFilter, EventKind, EventLog, ObserverId};
pub use linked_path::LinkedPath;
pub use object::{DataObject, Group, ObjectKind};
pub use path::DataPath;
pub use removal::{RemovalReport, RemovedObject};
pub use structure::{DataStructure, StoreId};
pub use strata_types::DataId;
