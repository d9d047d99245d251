//! Error types for data structure operations.

use strata_payload::PayloadError;
use strata_types::{DataId, TypeError};

use crate::path::DataPath;

/// Errors that can occur while creating, resolving, or editing objects.
///
/// Every variant describes a recoverable, caller-triggerable condition. The
/// store is left unchanged whenever one of these is returned.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StructureError {
    /// No live object has this identifier.
    #[error("data object not found: {0}")]
    NotFound(DataId),

    /// A name path did not resolve.
    #[error("path not found: {0}")]
    PathNotFound(DataPath),

    /// The group has no child with this name.
    #[error("group {parent} has no child named {name:?}")]
    ChildNotFound { parent: DataId, name: String },

    /// Insertion or rename would duplicate a sibling name.
    #[error(
        "name {name:?} already exists under {}",
        .parent.map_or_else(|| "the root".to_string(), |p| p.to_string())
    )]
    NameCollision { parent: Option<DataId>, name: String },

    /// Insertion would make an object its own descendant.
    #[error("inserting {child} under {parent} would create a cycle")]
    CycleRejected { child: DataId, parent: DataId },

    /// The parent edge already exists.
    #[error("{child} is already a child of {parent}")]
    AlreadyParented { child: DataId, parent: DataId },

    /// A linked path no longer resolves.
    #[error("linked path is invalid at hop {hop}: {reason}")]
    InvalidReference { hop: usize, reason: String },

    /// The object exists but is not a group.
    #[error("data object {0} is not a group")]
    NotAGroup(DataId),

    /// The object exists but carries no payload of the requested shape.
    #[error("data object {0} is not a leaf of the requested kind")]
    NotALeaf(DataId),

    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for data structure results.
pub type StructureResult<T> = Result<T, StructureError>;
