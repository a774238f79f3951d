// Batch — named partitions of samples with sequential and random draws

use std::collections::HashSet;
use std::hash::Hash;

use rand::Rng;
use tracing::debug;

use mimic_core::{bail_config, Error, Result};

use crate::container::DataContainer;
use crate::cursor::Cursor;
use crate::sample::Sample;

/// Name of the partition every [`Batch`] starts with.
pub const DEFAULT_PARTITION: &str = "train";

/// One named container of samples with its own cursor and batch size.
///
/// Sequential draws ([`next_training_batch`](Partition::next_training_batch),
/// [`next_sample`](Partition::next_sample)) move the cursor; random draws
/// borrow the partition immutably and never touch it, so the two access paths
/// are fully independent.
#[derive(Debug, Clone)]
pub struct Partition<D, L> {
    name: String,
    samples: DataContainer<Sample<D, L>>,
    cursor: Cursor,
    batch_size: usize,
}

impl<D, L> Partition<D, L> {
    /// Create an empty partition.
    pub fn new(name: impl Into<String>, batch_size: usize) -> Result<Self> {
        validate_batch_size(batch_size)?;
        Ok(Self {
            name: name.into(),
            samples: DataContainer::new(),
            cursor: Cursor::new(),
            batch_size,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a sample; returns its (possibly newly assigned) index.
    pub fn insert(&mut self, sample: Sample<D, L>) -> usize {
        self.samples.insert(sample)
    }

    /// Sample at position `index`; fails with `OutOfRange` outside `[0, len)`.
    pub fn get_sample(&self, index: usize) -> Result<&Sample<D, L>> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &DataContainer<Sample<D, L>> {
        &self.samples
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Set the number of samples returned by sequential and random batch draws.
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<()> {
        validate_batch_size(batch_size)?;
        self.batch_size = batch_size;
        Ok(())
    }

    /// Position the next sequential draw starts from.
    pub fn next_sample_index(&self) -> usize {
        self.cursor.position()
    }

    /// Move the sequential cursor; `index` must be in `[0, len)`.
    pub fn set_next_sample_index(&mut self, index: usize) -> Result<()> {
        self.cursor.set(index, self.samples.len())
    }

    /// Return the next `min(batch_size, len)` samples starting at the cursor.
    ///
    /// The walk wraps modulo `len` and the cursor advances by the number of
    /// samples returned. For `len = 3, batch_size = 2` consecutive calls yield
    /// indices `[0, 1]`, `[2, 0]`, `[1, 2]`, ...
    pub fn next_training_batch(&mut self) -> Result<Vec<Sample<D, L>>> {
        let len = self.non_empty_len()?;
        let count = self.batch_size.min(len);
        let (indices, wrapped) = self.cursor.advance(count, len);
        if wrapped {
            debug!(partition = %self.name, next = self.cursor.position(), "epoch boundary reached");
        }
        Ok(self.collect(&indices))
    }

    /// Return the sample under the cursor and advance it by one (wrapping).
    pub fn next_sample(&mut self) -> Result<Sample<D, L>> {
        let len = self.non_empty_len()?;
        let (indices, _) = self.cursor.advance(1, len);
        Ok(self.samples.as_slice()[indices[0]].clone())
    }

    /// Whether the next sequential batch will reach the end of the partition.
    pub fn is_last_batch(&self) -> bool {
        let len = self.samples.len();
        self.cursor.reaches_end(self.batch_size.min(len), len)
    }

    /// Draw `batch_size` samples uniformly at random, with replacement.
    ///
    /// The index sequence depends only on `rng`: seeding it identically and
    /// issuing the same calls reproduces the same batches.
    pub fn random_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Sample<D, L>>> {
        let len = self.non_empty_len()?;
        let indices: Vec<usize> = (0..self.batch_size).map(|_| rng.gen_range(0..len)).collect();
        Ok(self.collect(&indices))
    }

    /// Draw a single sample uniformly at random.
    pub fn random_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sample<D, L>> {
        let len = self.non_empty_len()?;
        Ok(self.samples.as_slice()[rng.gen_range(0..len)].clone())
    }

    /// Samples at explicit positions. Fails without returning anything if
    /// any position is out of range.
    pub fn batch_at(&self, indices: &[usize]) -> Result<Vec<Sample<D, L>>> {
        indices
            .iter()
            .map(|&i| self.samples.get(i).cloned())
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> + '_ {
        self.samples.iter().map(|s| s.label())
    }

    /// Number of distinct labels in the partition.
    pub fn class_count(&self) -> usize
    where
        L: Eq + Hash,
    {
        self.labels().collect::<HashSet<_>>().len()
    }

    pub(crate) fn reset(&mut self) {
        self.samples.clear();
        self.cursor.reset();
    }

    fn non_empty_len(&self) -> Result<usize> {
        match self.samples.len() {
            0 => Err(Error::OutOfRange { index: 0, len: 0 }),
            len => Ok(len),
        }
    }

    fn collect(&self, indices: &[usize]) -> Vec<Sample<D, L>> {
        let slice = self.samples.as_slice();
        indices.iter().map(|&i| slice[i].clone()).collect()
    }
}

fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        bail_config!("batch size must be positive, got {batch_size}");
    }
    Ok(())
}

/// One or more named partitions (e.g. train / validation / test).
///
/// The first partition is the default target of the forwarding methods
/// (`insert`, `next_training_batch`, `random_batch`, ...). A batch always has
/// at least one partition.
#[derive(Debug, Clone)]
pub struct Batch<D, L> {
    partitions: Vec<Partition<D, L>>,
}

impl<D, L> Default for Batch<D, L> {
    fn default() -> Self {
        Self {
            partitions: vec![Partition {
                name: DEFAULT_PARTITION.to_string(),
                samples: DataContainer::new(),
                cursor: Cursor::new(),
                batch_size: 1,
            }],
        }
    }
}

impl<D, L> Batch<D, L> {
    /// A batch with a single `train` partition and batch size 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch with a single `train` partition.
    pub fn with_batch_size(batch_size: usize) -> Result<Self> {
        let mut batch = Self::new();
        batch.set_batch_size(batch_size)?;
        Ok(batch)
    }

    /// A batch with the given partitions, in order. The first one is the default.
    pub fn with_partitions(names: &[&str], batch_size: usize) -> Result<Self> {
        if names.is_empty() {
            bail_config!("a batch needs at least one partition");
        }
        let mut partitions: Vec<Partition<D, L>> = Vec::with_capacity(names.len());
        for name in names {
            if partitions.iter().any(|p| p.name == *name) {
                bail_config!("duplicate partition name {name:?}");
            }
            partitions.push(Partition::new(*name, batch_size)?);
        }
        Ok(Self { partitions })
    }

    /// Append a new empty partition using the default partition's batch size.
    pub fn add_partition(&mut self, name: &str) -> Result<&mut Partition<D, L>> {
        if self.partitions.iter().any(|p| p.name == name) {
            bail_config!("duplicate partition name {name:?}");
        }
        let partition = Partition::new(name, self.batch_size())?;
        self.partitions.push(partition);
        let last = self.partitions.len() - 1;
        Ok(&mut self.partitions[last])
    }

    pub fn partition(&self, name: &str) -> Result<&Partition<D, L>> {
        self.partitions
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::config(format!("unknown partition {name:?}")))
    }

    pub fn partition_mut(&mut self, name: &str) -> Result<&mut Partition<D, L>> {
        self.partitions
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::config(format!("unknown partition {name:?}")))
    }

    pub fn partition_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.partitions.iter().map(|p| p.name.as_str())
    }

    pub fn default_partition(&self) -> &Partition<D, L> {
        &self.partitions[0]
    }

    pub fn default_partition_mut(&mut self) -> &mut Partition<D, L> {
        &mut self.partitions[0]
    }

    /// Batch size of the default partition.
    pub fn batch_size(&self) -> usize {
        self.default_partition().batch_size()
    }

    /// Set the batch size of every partition.
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<()> {
        validate_batch_size(batch_size)?;
        for p in &mut self.partitions {
            p.batch_size = batch_size;
        }
        Ok(())
    }

    /// Number of samples across all partitions.
    pub fn total_len(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    /// Drop every sample and rewind every cursor. Partition names and batch
    /// sizes are kept.
    pub fn reset(&mut self) {
        for p in &mut self.partitions {
            p.reset();
        }
    }

    // Forwarding to the default partition

    pub fn insert(&mut self, sample: Sample<D, L>) -> usize {
        self.default_partition_mut().insert(sample)
    }

    pub fn get_sample(&self, index: usize) -> Result<&Sample<D, L>> {
        self.default_partition().get_sample(index)
    }

    /// Number of samples in the default partition.
    pub fn len(&self) -> usize {
        self.default_partition().len()
    }

    pub fn is_empty(&self) -> bool {
        self.default_partition().is_empty()
    }

    pub fn set_next_sample_index(&mut self, index: usize) -> Result<()> {
        self.default_partition_mut().set_next_sample_index(index)
    }

    pub fn next_training_batch(&mut self) -> Result<Vec<Sample<D, L>>> {
        self.default_partition_mut().next_training_batch()
    }

    pub fn next_sample(&mut self) -> Result<Sample<D, L>> {
        self.default_partition_mut().next_sample()
    }

    pub fn is_last_batch(&self) -> bool {
        self.default_partition().is_last_batch()
    }

    pub fn random_batch<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Sample<D, L>>> {
        self.default_partition().random_batch(rng)
    }

    pub fn random_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Sample<D, L>> {
        self.default_partition().random_sample(rng)
    }

    pub fn batch_at(&self, indices: &[usize]) -> Result<Vec<Sample<D, L>>> {
        self.default_partition().batch_at(indices)
    }

    pub fn labels(&self) -> impl Iterator<Item = &L> + '_ {
        self.default_partition().labels()
    }

    pub fn class_count(&self) -> usize
    where
        L: Eq + Hash,
    {
        self.default_partition().class_count()
    }
}

/// Dataset positions of a drawn batch, in draw order.
pub fn sample_indices<D, L>(samples: &[Sample<D, L>]) -> Vec<Option<usize>> {
    samples.iter().map(Sample::index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_core::ErrorKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn partition(n: usize, batch_size: usize) -> Partition<usize, usize> {
        let mut p = Partition::new("train", batch_size).unwrap();
        for i in 0..n {
            p.insert(Sample::new(i * 10, i % 2));
        }
        p
    }

    fn ids(samples: &[Sample<usize, usize>]) -> Vec<usize> {
        samples.iter().map(|s| s.index().unwrap()).collect()
    }

    #[test]
    fn three_samples_batch_of_two_wraps() {
        let mut p = partition(3, 2);
        assert_eq!(ids(&p.next_training_batch().unwrap()), vec![0, 1]);
        assert_eq!(ids(&p.next_training_batch().unwrap()), vec![2, 0]);
        assert_eq!(ids(&p.next_training_batch().unwrap()), vec![1, 2]);
    }

    #[test]
    fn batch_larger_than_partition_is_clipped() {
        let mut p = partition(3, 10);
        assert_eq!(ids(&p.next_training_batch().unwrap()), vec![0, 1, 2]);
        assert_eq!(p.next_sample_index(), 0);
        p.set_next_sample_index(1).unwrap();
        assert_eq!(ids(&p.next_training_batch().unwrap()), vec![1, 2, 0]);
        assert_eq!(p.next_sample_index(), 1);
    }

    #[test]
    fn next_sample_steps_by_one() {
        let mut p = partition(2, 5);
        assert_eq!(p.next_sample().unwrap().index(), Some(0));
        assert_eq!(p.next_sample().unwrap().index(), Some(1));
        assert_eq!(p.next_sample().unwrap().index(), Some(0));
    }

    #[test]
    fn is_last_batch_flags_epoch_end() {
        let mut p = partition(4, 2);
        assert!(!p.is_last_batch());
        p.next_training_batch().unwrap();
        assert!(p.is_last_batch());
        p.next_training_batch().unwrap();
        assert!(!p.is_last_batch());
    }

    #[test]
    fn invalid_batch_size_and_cursor() {
        let mut p = partition(3, 1);
        assert_eq!(p.set_batch_size(0).unwrap_err().kind(), ErrorKind::Configuration);
        assert_eq!(p.batch_size(), 1);
        assert_eq!(
            p.set_next_sample_index(3).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert!(Partition::<u8, u8>::new("x", 0).is_err());
    }

    #[test]
    fn empty_partition_draws_fail() {
        let mut p = partition(0, 2);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            p.next_training_batch(),
            Err(Error::OutOfRange { len: 0, .. })
        ));
        assert!(p.next_sample().is_err());
        assert!(p.random_batch(&mut rng).is_err());
        assert!(p.random_sample(&mut rng).is_err());
    }

    #[test]
    fn random_batch_leaves_cursor_alone() {
        let mut p = partition(5, 3);
        p.set_next_sample_index(2).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = p.random_batch(&mut rng).unwrap();
        assert_eq!(drawn.len(), 3);
        assert!(ids(&drawn).iter().all(|&i| i < 5));
        assert_eq!(p.next_sample_index(), 2);
    }

    #[test]
    fn random_batch_is_not_clipped() {
        let p = partition(2, 8);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(p.random_batch(&mut rng).unwrap().len(), 8);
    }

    #[test]
    fn batch_at_is_all_or_nothing() {
        let p = partition(4, 1);
        assert_eq!(ids(&p.batch_at(&[3, 0, 3]).unwrap()), vec![3, 0, 3]);
        assert!(p.batch_at(&[0, 4]).is_err());
    }

    #[test]
    fn class_count_counts_distinct_labels() {
        assert_eq!(partition(5, 1).class_count(), 2);
        assert_eq!(partition(1, 1).class_count(), 1);
        assert_eq!(partition(0, 1).class_count(), 0);
    }

    #[test]
    fn batch_partitions() {
        let mut b: Batch<u8, u8> = Batch::with_partitions(&["train", "test"], 4).unwrap();
        b.insert(Sample::new(1, 1));
        b.partition_mut("test").unwrap().insert(Sample::new(2, 2));
        b.partition_mut("test").unwrap().insert(Sample::new(3, 3));
        assert_eq!(b.len(), 1);
        assert_eq!(b.partition("test").unwrap().len(), 2);
        assert_eq!(b.total_len(), 3);
        assert_eq!(b.partition_names().collect::<Vec<_>>(), vec!["train", "test"]);
        assert!(b.partition("valid").is_err());
        assert!(b.add_partition("test").is_err());
        assert_eq!(b.add_partition("valid").unwrap().batch_size(), 4);

        b.set_batch_size(2).unwrap();
        assert!(b.partition_names().all(|n| b.partition(n).unwrap().batch_size() == 2));

        b.reset();
        assert_eq!(b.total_len(), 0);
        assert_eq!(b.partition_names().count(), 3);
        assert_eq!(b.batch_size(), 2);
    }

    #[test]
    fn batch_constructor_validation() {
        assert!(Batch::<u8, u8>::with_partitions(&[], 1).is_err());
        assert!(Batch::<u8, u8>::with_partitions(&["a", "a"], 1).is_err());
        assert!(Batch::<u8, u8>::with_batch_size(0).is_err());
        let b = Batch::<u8, u8>::new();
        assert_eq!(b.default_partition().name(), DEFAULT_PARTITION);
        assert_eq!(b.batch_size(), 1);
    }
}
