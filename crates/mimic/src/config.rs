//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is read from TOML or JSON and then turned into a
//! configured importer and encoder:
//!
//! ```toml
//! seed = 42
//!
//! [importer]
//! format = "mnist"
//! data_filename = "data/train-images-idx3-ubyte"
//! labels_filename = "data/train-labels-idx1-ubyte"
//! samples_limit = 1000
//! batch_size = 32
//!
//! [encoder]
//! sdr_length = 784
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mimic_core::{bail_config, Error, Result, SdrScalar};
use mimic_data::{Batch, DatasetFormat, FormatImporter, Importer, DEFAULT_PARTITION};
use mimic_encoders::{ColumnEncoder, ColumnSelection, IndicatorEncoder, SymbolEncoder};

/// Top-level configuration: random seed, importer and encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed of the random source used for random batch draws.
    #[serde(default = "default_seed")]
    pub seed: u64,

    pub importer: ImporterConfig,

    #[serde(default)]
    pub encoder: EncoderConfig,
}

/// Dataset layouts with a built-in adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Mnist,
    Cifar,
    RawText,
    Csv,
}

impl DatasetKind {
    /// Whether the layout keeps labels in a separate file.
    pub fn needs_labels(self) -> bool {
        matches!(self, DatasetKind::Mnist)
    }

    /// Name reported by the matching [`DatasetFormat`].
    pub fn format_name(self) -> &'static str {
        match self {
            DatasetKind::Mnist => "MNIST",
            DatasetKind::Cifar => "CIFAR-10",
            DatasetKind::RawText => "raw text",
            DatasetKind::Csv => "CSV",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

/// Where the dataset lives and how the batch is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImporterConfig {
    pub format: DatasetKind,

    pub data_filename: PathBuf,

    /// Required for MNIST, rejected for formats with embedded labels.
    #[serde(default)]
    pub labels_filename: Option<PathBuf>,

    /// Keep at most this many samples.
    #[serde(default)]
    pub samples_limit: Option<usize>,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Partition receiving the samples.
    #[serde(default = "default_partition")]
    pub partition: String,
}

/// Encoder settings. Which fields matter depends on the encoder built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Number of SDR units. Symbol encoders default to the alphabet size.
    #[serde(default)]
    pub sdr_length: Option<usize>,

    /// Ordered alphabet for symbol encoders; printable ASCII when omitted.
    #[serde(default)]
    pub alphabet: Option<String>,

    /// Column picked by the column encoder; the whole matrix when omitted.
    #[serde(default)]
    pub column: Option<usize>,
}

fn default_seed() -> u64 {
    42
}

fn default_batch_size() -> usize {
    1
}

fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| Error::config(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| Error::config(format!("invalid JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::config(format!(
                "unrecognised config extension: {}",
                path.display()
            ))),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.importer.validate()?;
        self.encoder.validate()
    }
}

impl ImporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail_config!("batch_size must be positive");
        }
        if self.data_filename.as_os_str().is_empty() {
            bail_config!("data_filename must not be empty");
        }
        if self.partition.is_empty() {
            bail_config!("partition name must not be empty");
        }
        let has_labels = self
            .labels_filename
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());
        match (self.format.needs_labels(), has_labels) {
            (true, false) => bail_config!("{} needs labels_filename", self.format),
            (false, true) => bail_config!("{} does not use labels_filename", self.format),
            _ => Ok(()),
        }
    }

    /// An importer for `format`, with paths, limit, batch size and target
    /// partition applied. `format` must be the adapter for [`Self::format`].
    pub fn build<F: DatasetFormat>(&self, format: F) -> Result<FormatImporter<F>> {
        self.validate()?;
        if format.name() != self.format.format_name() {
            bail_config!(
                "configured for {} but given a {} adapter",
                self.format,
                format.name()
            );
        }

        let batch = if self.partition == DEFAULT_PARTITION {
            Batch::with_batch_size(self.batch_size)?
        } else {
            Batch::with_partitions(&[DEFAULT_PARTITION, self.partition.as_str()], self.batch_size)?
        };
        let mut importer = FormatImporter::with_batch(format, batch);
        importer.set_partition(&self.partition)?;
        importer.set_data_filename(&self.data_filename);
        if let Some(labels) = &self.labels_filename {
            importer.set_labels_filename(labels)?;
        }
        importer.set_samples_limit(self.samples_limit);
        Ok(importer)
    }
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sdr_length == Some(0) {
            bail_config!("sdr_length must be positive");
        }
        if self.alphabet.as_deref() == Some("") {
            bail_config!("alphabet must not be empty");
        }
        Ok(())
    }

    fn required_sdr_length(&self, encoder: &str) -> Result<usize> {
        self.sdr_length
            .ok_or_else(|| Error::config(format!("{encoder} encoder needs sdr_length")))
    }

    pub fn indicator<S: SdrScalar>(&self) -> Result<IndicatorEncoder<S>> {
        IndicatorEncoder::new(self.required_sdr_length("indicator")?)
    }

    /// Symbol encoder over `alphabet` (printable ASCII if unset).
    pub fn symbol<S: SdrScalar>(&self) -> Result<SymbolEncoder<char, S>> {
        use mimic_encoders::MatrixSdrEncoder;

        let mut encoder = match &self.alphabet {
            Some(alphabet) => SymbolEncoder::new(alphabet.chars())?,
            None => SymbolEncoder::printable_ascii(),
        };
        if let Some(len) = self.sdr_length {
            encoder.set_sdr_length(len)?;
        }
        Ok(encoder)
    }

    pub fn column<S: SdrScalar>(&self) -> Result<ColumnEncoder<S>> {
        ColumnEncoder::new(
            self.required_sdr_length("column")?,
            ColumnSelection::from(self.column),
        )
    }
}
