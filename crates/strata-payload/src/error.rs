use crate::data_type::DataType;

/// Errors from payload buffer operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    /// Flat index past the end of the buffer.
    #[error("index {index} out of range for buffer of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    /// A buffer shape that cannot hold data (e.g. zero-width tuples).
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// The number of values does not fit the requested tuple size.
    #[error("{len} values cannot be split into tuples of {tuple_size}")]
    ShapeMismatch { len: usize, tuple_size: usize },

    /// A typed access used the wrong element type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: DataType, found: DataType },

    /// A data type name that is not one of the supported element types.
    #[error("unknown data type: {0}")]
    UnknownDataType(String),
}

/// Result alias for payload operations.
pub type PayloadResult<T> = Result<T, PayloadError>;
