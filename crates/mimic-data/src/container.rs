// DataContainer — append-only, index-addressable storage

use mimic_core::{check_index, Result};

use crate::sample::Indexed;

/// An insertion-ordered collection with stable indices `0..len`.
///
/// Items are only ever appended; an index handed out once keeps pointing at
/// the same item until the whole container is cleared by a re-import.
#[derive(Debug, Clone)]
pub struct DataContainer<T> {
    items: Vec<T>,
}

impl<T> Default for DataContainer<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> DataContainer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append an item without touching its index.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Bounds-checked access.
    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.items.len())?;
        Ok(&self.items[index])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Indexed> DataContainer<T> {
    /// Append an item, assigning it the next sequential position when it has
    /// no index yet. Returns the item's index.
    pub fn insert(&mut self, mut item: T) -> usize {
        let index = item.assign_index(self.items.len());
        self.items.push(item);
        index
    }
}

impl<T: Indexed> FromIterator<T> for DataContainer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut container = Self::new();
        for item in iter {
            container.insert(item);
        }
        container
    }
}

impl<'a, T> IntoIterator for &'a DataContainer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
