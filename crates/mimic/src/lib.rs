//! # mimic
//!
//! Dataset ingestion and SDR encoding for machine-intelligence experiments.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ## Usage
//!
//! ```rust
//! use mimic::prelude::*;
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|----------|
//! | `mimic-core` | Error taxonomy, matrix aliases, SDR scalar bound |
//! | `mimic-data` | Sample, Batch, Importer + MNIST/CIFAR/text/CSV formats, DataCollector |
//! | `mimic-encoders` | Encoder traits, indicator / symbol / column encoders |
//!
//! ## Modules
//!
//! - [`config`] — TOML/JSON pipeline configuration
//! - [`pipeline`] — importer + encoder + seeded random source

/// Re-export core types.
pub use mimic_core::{check_index, first_active, Error, ErrorKind, Matrix, Result, SdrScalar, Tensor3};

/// Re-export samples, batches, importers and the collector.
pub mod data {
    pub use mimic_data::*;
}

/// Re-export encoders.
pub mod encoders {
    pub use mimic_encoders::*;
}

pub mod config;
pub mod pipeline;

pub use config::{DatasetKind, EncoderConfig, ImporterConfig, PipelineConfig};
pub use pipeline::{EncodedBatch, Pipeline};

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::data::{
        Batch, CifarFormat, CifarImporter, CsvFormat, CsvImporter, DataCollector, Importer,
        MnistFormat, MnistImporter, RawTextFormat, RawTextImporter, Sample,
    };
    pub use crate::encoders::{
        ColumnEncoder, ColumnSelection, Encoder, IndicatorEncoder, MatrixSdrEncoder,
        SymbolEncoder,
    };
    pub use crate::pipeline::{EncodedBatch, Pipeline};
    pub use crate::{Error, Matrix, Result};
}
