use serde::{Deserialize, Serialize};

use crate::data_type::{DataType, Element};
use crate::error::{PayloadError, PayloadResult};
use crate::store::DataStore;

/// A typed tuple array whose element type is chosen at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "store", rename_all = "lowercase")]
pub enum ArrayData {
    Int8(DataStore<i8>),
    UInt8(DataStore<u8>),
    Int16(DataStore<i16>),
    UInt16(DataStore<u16>),
    Int32(DataStore<i32>),
    UInt32(DataStore<u32>),
    Int64(DataStore<i64>),
    UInt64(DataStore<u64>),
    Float32(DataStore<f32>),
    Float64(DataStore<f64>),
    Bool(DataStore<bool>),
}

/// Run `$body` with `$store` bound to the inner typed store of any variant.
macro_rules! with_store {
    ($array:expr, $store:ident => $body:expr) => {
        match $array {
            ArrayData::Int8($store) => $body,
            ArrayData::UInt8($store) => $body,
            ArrayData::Int16($store) => $body,
            ArrayData::UInt16($store) => $body,
            ArrayData::Int32($store) => $body,
            ArrayData::UInt32($store) => $body,
            ArrayData::Int64($store) => $body,
            ArrayData::UInt64($store) => $body,
            ArrayData::Float32($store) => $body,
            ArrayData::Float64($store) => $body,
            ArrayData::Bool($store) => $body,
        }
    };
}

fn typed<T: Element>(tuple_size: usize, tuple_count: usize) -> PayloadResult<ArrayData> {
    Ok(T::into_array(DataStore::<T>::new(tuple_size, tuple_count)?))
}

impl ArrayData {
    /// Create a default-filled array of the given element type and shape.
    pub fn new(data_type: DataType, tuple_size: usize, tuple_count: usize) -> PayloadResult<Self> {
        match data_type {
            DataType::Int8 => typed::<i8>(tuple_size, tuple_count),
            DataType::UInt8 => typed::<u8>(tuple_size, tuple_count),
            DataType::Int16 => typed::<i16>(tuple_size, tuple_count),
            DataType::UInt16 => typed::<u16>(tuple_size, tuple_count),
            DataType::Int32 => typed::<i32>(tuple_size, tuple_count),
            DataType::UInt32 => typed::<u32>(tuple_size, tuple_count),
            DataType::Int64 => typed::<i64>(tuple_size, tuple_count),
            DataType::UInt64 => typed::<u64>(tuple_size, tuple_count),
            DataType::Float32 => typed::<f32>(tuple_size, tuple_count),
            DataType::Float64 => typed::<f64>(tuple_size, tuple_count),
            DataType::Bool => typed::<bool>(tuple_size, tuple_count),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::UInt8(_) => DataType::UInt8,
            Self::Int16(_) => DataType::Int16,
            Self::UInt16(_) => DataType::UInt16,
            Self::Int32(_) => DataType::Int32,
            Self::UInt32(_) => DataType::UInt32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt64(_) => DataType::UInt64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Bool(_) => DataType::Bool,
        }
    }

    pub fn tuple_size(&self) -> usize {
        with_store!(self, s => s.tuple_size())
    }

    pub fn tuple_count(&self) -> usize {
        with_store!(self, s => s.tuple_count())
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        with_store!(self, s => s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resize(&mut self, tuple_count: usize) -> PayloadResult<()> {
        with_store!(self, s => s.resize(tuple_count))
    }

    /// Element at a flat index, converted to `f64`.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        with_store!(self, s => s.get(index).map(Element::to_f64))
    }

    /// Set the element at a flat index from an `f64`, converting to the
    /// array's element type.
    pub fn set_f64(&mut self, index: usize, value: f64) -> PayloadResult<()> {
        with_store!(self, s => s.set(index, Element::from_f64(value)))
    }

    /// Fill every element from an `f64`.
    pub fn fill_f64(&mut self, value: f64) {
        with_store!(self, s => s.fill(Element::from_f64(value)))
    }

    /// Typed view of the underlying store.
    pub fn as_store<T: Element>(&self) -> PayloadResult<&DataStore<T>> {
        T::view(self).ok_or(PayloadError::TypeMismatch {
            expected: T::DATA_TYPE,
            found: self.data_type(),
        })
    }

    pub fn as_store_mut<T: Element>(&mut self) -> PayloadResult<&mut DataStore<T>> {
        let found = self.data_type();
        T::view_mut(self).ok_or(PayloadError::TypeMismatch {
            expected: T::DATA_TYPE,
            found,
        })
    }
}

impl<T: Element> From<DataStore<T>> for ArrayData {
    fn from(store: DataStore<T>) -> Self {
        T::into_array(store)
    }
}
