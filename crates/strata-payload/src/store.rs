use serde::{Deserialize, Serialize};

use crate::data_type::Element;
use crate::error::{PayloadError, PayloadResult};

/// A fixed-shape buffer of tuples.
///
/// Elements are stored flat: tuple `t`, component `c` lives at flat index
/// `t * tuple_size + c`. The tuple size is fixed at construction; the tuple
/// count changes only through [`DataStore::resize`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataStore<T> {
    tuple_size: usize,
    tuple_count: usize,
    values: Vec<T>,
}

fn element_count(tuple_size: usize, tuple_count: usize) -> PayloadResult<usize> {
    tuple_size.checked_mul(tuple_count).ok_or_else(|| {
        PayloadError::InvalidShape(format!(
            "{tuple_count} tuples of {tuple_size} components overflow the buffer length"
        ))
    })
}

impl<T: Element> DataStore<T> {
    /// Create a buffer of `tuple_count` tuples, each `tuple_size` wide,
    /// filled with the element default.
    pub fn new(tuple_size: usize, tuple_count: usize) -> PayloadResult<Self> {
        if tuple_size == 0 {
            return Err(PayloadError::InvalidShape(
                "tuple size must be at least 1".into(),
            ));
        }
        let len = element_count(tuple_size, tuple_count)?;
        Ok(Self {
            tuple_size,
            tuple_count,
            values: vec![T::default(); len],
        })
    }

    /// Wrap existing values. `values.len()` must be a multiple of
    /// `tuple_size`.
    pub fn from_vec(tuple_size: usize, values: Vec<T>) -> PayloadResult<Self> {
        if tuple_size == 0 {
            return Err(PayloadError::InvalidShape(
                "tuple size must be at least 1".into(),
            ));
        }
        if values.len() % tuple_size != 0 {
            return Err(PayloadError::ShapeMismatch {
                len: values.len(),
                tuple_size,
            });
        }
        Ok(Self {
            tuple_size,
            tuple_count: values.len() / tuple_size,
            values,
        })
    }

    /// Number of components per tuple.
    pub fn tuple_size(&self) -> usize {
        self.tuple_size
    }

    /// Number of tuples.
    pub fn tuple_count(&self) -> usize {
        self.tuple_count
    }

    /// Total number of elements (`tuple_size * tuple_count`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Element at a flat index.
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    /// Overwrite the element at a flat index.
    pub fn set(&mut self, index: usize, value: T) -> PayloadResult<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(PayloadError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// The components of one tuple, or `None` past the last tuple.
    pub fn tuple(&self, tuple_index: usize) -> Option<&[T]> {
        let start = tuple_index.checked_mul(self.tuple_size)?;
        let end = start.checked_add(self.tuple_size)?;
        self.values.get(start..end)
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.values.fill(value);
    }

    /// Change the number of tuples. Growing appends default-filled tuples;
    /// shrinking drops trailing tuples.
    pub fn resize(&mut self, tuple_count: usize) -> PayloadResult<()> {
        let len = element_count(self.tuple_size, tuple_count)?;
        self.values.resize(len, T::default());
        self.tuple_count = tuple_count;
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<'a, T: Element> IntoIterator for &'a DataStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Element> IntoIterator for &'a mut DataStore<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
