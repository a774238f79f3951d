// Importer — populate a Batch from an external dataset
//
// Parsing is split from bookkeeping: a `DatasetFormat` turns raw bytes into
// (data, label) pairs, and `FormatImporter` owns the file paths, the target
// Batch and the all-or-nothing population logic shared by every format.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use mimic_core::{Error, Result};

use crate::batch::Batch;
use crate::sample::Sample;

/// Capability set of anything that fills a [`Batch`] from a dataset.
///
/// Contract for `import()`:
/// - the batch is reset first, so repeated imports never accumulate;
/// - on success the target partition holds exactly the dataset's samples,
///   sample `i` paired with its own label and carrying index `i`;
/// - on failure the batch is left empty and the error is returned.
pub trait Importer {
    type Data;
    type Label;

    /// Path of the file holding the sample data.
    fn set_data_filename(&mut self, path: impl Into<PathBuf>);

    /// Path of the file holding the labels. Formats that keep labels inside
    /// the data file reject this with a configuration error.
    fn set_labels_filename(&mut self, path: impl Into<PathBuf>) -> Result<()>;

    /// Parse the configured files into the owned batch.
    fn import(&mut self) -> Result<()>;

    fn batch(&self) -> &Batch<Self::Data, Self::Label>;

    fn batch_mut(&mut self) -> &mut Batch<Self::Data, Self::Label>;

    fn into_batch(self) -> Batch<Self::Data, Self::Label>
    where
        Self: Sized;
}

/// Byte-level parser for one dataset layout.
pub trait DatasetFormat {
    type Data;
    type Label;

    /// Human-readable format name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the format reads labels from a separate file.
    fn needs_labels(&self) -> bool {
        false
    }

    /// Parse the whole dataset. `labels` is `Some` exactly when
    /// [`needs_labels`](DatasetFormat::needs_labels) is true.
    fn parse(&self, data: &[u8], labels: Option<&[u8]>)
        -> Result<Vec<(Self::Data, Self::Label)>>;
}

/// The importer shared by every [`DatasetFormat`].
pub struct FormatImporter<F: DatasetFormat> {
    format: F,
    data_filename: Option<PathBuf>,
    labels_filename: Option<PathBuf>,
    samples_limit: Option<usize>,
    partition: String,
    batch: Batch<F::Data, F::Label>,
}

impl<F: DatasetFormat> FormatImporter<F> {
    /// An importer filling the default partition of a fresh batch.
    pub fn new(format: F) -> Self {
        Self::with_batch(format, Batch::new())
    }

    /// An importer filling `batch`, whose partitions and batch sizes are kept.
    pub fn with_batch(format: F, batch: Batch<F::Data, F::Label>) -> Self {
        let partition = batch.default_partition().name().to_string();
        Self {
            format,
            data_filename: None,
            labels_filename: None,
            samples_limit: None,
            partition,
            batch,
        }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn data_filename(&self) -> Option<&Path> {
        self.data_filename.as_deref()
    }

    pub fn labels_filename(&self) -> Option<&Path> {
        self.labels_filename.as_deref()
    }

    /// Keep at most `limit` samples (`None` = no limit).
    pub fn set_samples_limit(&mut self, limit: Option<usize>) {
        self.samples_limit = limit;
    }

    /// Partition receiving the imported samples. Must exist in the batch.
    pub fn set_partition(&mut self, name: &str) -> Result<()> {
        self.batch.partition(name)?;
        self.partition = name.to_string();
        Ok(())
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Import from in-memory bytes, with the same reset / all-or-nothing
    /// behaviour as [`Importer::import`].
    pub fn import_bytes(&mut self, data: &[u8], labels: Option<&[u8]>) -> Result<()> {
        self.batch.reset();
        self.populate(data, labels)
    }

    fn populate(&mut self, data: &[u8], labels: Option<&[u8]>) -> Result<()> {
        let name = self.format.name().to_string();
        if self.format.needs_labels() && labels.is_none() {
            return Err(Error::config(format!("{name} needs a labels source")));
        }
        // Resolve the target before parsing so a bad name cannot leave work half done.
        self.batch.partition(&self.partition)?;

        let mut pairs = self.format.parse(data, labels)?;
        debug!(format = %name, parsed = pairs.len(), "parsed dataset");
        if let Some(limit) = self.samples_limit {
            pairs.truncate(limit);
        }

        let partition = self.batch.partition_mut(&self.partition)?;
        for (index, (d, l)) in pairs.into_iter().enumerate() {
            partition.insert(Sample::with_index(d, l, index));
        }
        info!(format = %name, partition = %self.partition, samples = partition.len(), "import finished");
        Ok(())
    }
}

impl<F: DatasetFormat> Importer for FormatImporter<F> {
    type Data = F::Data;
    type Label = F::Label;

    fn set_data_filename(&mut self, path: impl Into<PathBuf>) {
        self.data_filename = Some(path.into());
    }

    fn set_labels_filename(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        if !self.format.needs_labels() {
            return Err(Error::config(format!(
                "{} keeps labels in the data file; no labels filename accepted",
                self.format.name()
            )));
        }
        self.labels_filename = Some(path.into());
        Ok(())
    }

    fn import(&mut self) -> Result<()> {
        self.batch.reset();

        let data_path = match &self.data_filename {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ => {
                return Err(Error::config(format!(
                    "{}: data filename not set",
                    self.format.name()
                )))
            }
        };
        let labels_path = if self.format.needs_labels() {
            match &self.labels_filename {
                Some(p) if !p.as_os_str().is_empty() => Some(p.clone()),
                _ => {
                    return Err(Error::config(format!(
                        "{}: labels filename not set",
                        self.format.name()
                    )))
                }
            }
        } else {
            None
        };

        info!(format = %self.format.name(), data = %data_path.display(), "importing dataset");
        let data = read_file(&data_path)?;
        let labels = match &labels_path {
            Some(p) => Some(read_file(p)?),
            None => None,
        };
        self.populate(&data, labels.as_deref())
    }

    fn batch(&self) -> &Batch<F::Data, F::Label> {
        &self.batch
    }

    fn batch_mut(&mut self) -> &mut Batch<F::Data, F::Label> {
        &mut self.batch
    }

    fn into_batch(self) -> Batch<F::Data, F::Label> {
        self.batch
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

impl<F: DatasetFormat + Default> Default for FormatImporter<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}
