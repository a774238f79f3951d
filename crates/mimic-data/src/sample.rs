// Sample — one data payload paired with one label payload

use std::sync::Arc;

/// A single labeled example.
///
/// Data and label are reference-counted so many samples (and many drawn
/// batches) can share one payload without copying it. `index` records the
/// sample's position in the original dataset; `None` means it has not been
/// assigned yet. Once assigned, the index never changes.
#[derive(Debug)]
pub struct Sample<D, L> {
    data: Arc<D>,
    label: Arc<L>,
    index: Option<usize>,
}

impl<D, L> Sample<D, L> {
    /// A sample with no index; [`DataContainer::insert`](crate::DataContainer::insert)
    /// assigns the next position.
    pub fn new(data: D, label: L) -> Self {
        Self::from_shared(Arc::new(data), Arc::new(label))
    }

    /// A sample with a fixed dataset index.
    pub fn with_index(data: D, label: L, index: usize) -> Self {
        Self {
            data: Arc::new(data),
            label: Arc::new(label),
            index: Some(index),
        }
    }

    /// Build from payloads that are already shared with other samples.
    pub fn from_shared(data: Arc<D>, label: Arc<L>) -> Self {
        Self {
            data,
            label,
            index: None,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    /// Shared handle to the data payload.
    pub fn shared_data(&self) -> Arc<D> {
        Arc::clone(&self.data)
    }

    /// Shared handle to the label payload.
    pub fn shared_label(&self) -> Arc<L> {
        Arc::clone(&self.label)
    }

    /// Position in the original dataset, if assigned.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

// Manual impl: cloning only bumps the reference counts, so D and L need not be Clone.
impl<D, L> Clone for Sample<D, L> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            label: Arc::clone(&self.label),
            index: self.index,
        }
    }
}

/// Items that carry an assignable dataset index.
pub trait Indexed {
    /// Assign `index` if the item has none yet; keep the existing one otherwise.
    fn assign_index(&mut self, index: usize) -> usize;
}

impl<D, L> Indexed for Sample<D, L> {
    fn assign_index(&mut self, index: usize) -> usize {
        *self.index.get_or_insert(index)
    }
}
