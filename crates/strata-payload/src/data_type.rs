use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::array::ArrayData;
use crate::error::PayloadError;
use crate::scalar::ScalarValue;
use crate::store::DataStore;

/// Element type of an array or scalar payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Bool,
}

impl DataType {
    /// Every supported element type.
    pub const ALL: [DataType; 11] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Bool,
    ];

    /// Lowercase name used in scripts and output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
        }
    }

    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::Bool => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Returns `true` for the floating-point types.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DataType {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == lower)
            .ok_or_else(|| PayloadError::UnknownDataType(s.to_string()))
    }
}

/// A Rust type that can be stored in a payload buffer.
///
/// The `f64` conversions give callers a type-erased numeric view of any
/// buffer. Integer conversions from `f64` saturate; `bool` maps to 0/1.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The [`DataType`] tag for this element type.
    const DATA_TYPE: DataType;

    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;

    /// Wrap a typed store into the matching [`ArrayData`] variant.
    fn into_array(store: DataStore<Self>) -> ArrayData;

    /// View an [`ArrayData`] as a typed store, if the types match.
    fn view(array: &ArrayData) -> Option<&DataStore<Self>>;

    fn view_mut(array: &mut ArrayData) -> Option<&mut DataStore<Self>>;

    /// Wrap a value into the matching [`ScalarValue`] variant.
    fn into_scalar(self) -> ScalarValue;

    fn from_scalar(scalar: &ScalarValue) -> Option<Self>;
}

macro_rules! numeric_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn into_array(store: DataStore<Self>) -> ArrayData {
                ArrayData::$variant(store)
            }

            fn view(array: &ArrayData) -> Option<&DataStore<Self>> {
                match array {
                    ArrayData::$variant(store) => Some(store),
                    _ => None,
                }
            }

            fn view_mut(array: &mut ArrayData) -> Option<&mut DataStore<Self>> {
                match array {
                    ArrayData::$variant(store) => Some(store),
                    _ => None,
                }
            }

            fn into_scalar(self) -> ScalarValue {
                ScalarValue::$variant(self)
            }

            fn from_scalar(scalar: &ScalarValue) -> Option<Self> {
                match scalar {
                    ScalarValue::$variant(value) => Some(*value),
                    _ => None,
                }
            }
        }
    };
}

numeric_element!(i8, Int8);
numeric_element!(u8, UInt8);
numeric_element!(i16, Int16);
numeric_element!(u16, UInt16);
numeric_element!(i32, Int32);
numeric_element!(u32, UInt32);
numeric_element!(i64, Int64);
numeric_element!(u64, UInt64);
numeric_element!(f32, Float32);
numeric_element!(f64, Float64);

impl Element for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Self {
        value != 0.0
    }

    fn into_array(store: DataStore<Self>) -> ArrayData {
        ArrayData::Bool(store)
    }

    fn view(array: &ArrayData) -> Option<&DataStore<Self>> {
        match array {
            ArrayData::Bool(store) => Some(store),
            _ => None,
        }
    }

    fn view_mut(array: &mut ArrayData) -> Option<&mut DataStore<Self>> {
        match array {
            ArrayData::Bool(store) => Some(store),
            _ => None,
        }
    }

    fn into_scalar(self) -> ScalarValue {
        ScalarValue::Bool(self)
    }

    fn from_scalar(scalar: &ScalarValue) -> Option<Self> {
        match scalar {
            ScalarValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}
