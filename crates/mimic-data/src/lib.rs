//! # mimic-data
//!
//! Dataset ingestion for mimic.
//!
//! This crate provides:
//! - [`Sample`] — a (data, label) pair with shared payloads and a set-once index
//! - [`DataContainer`] / [`Batch`] — append-only sample storage with named
//!   partitions, sequential (wrapping) and seeded random draws
//! - [`Importer`] trait — the import contract every dataset adapter meets
//! - [`FormatImporter`] — shared import machinery over a [`DatasetFormat`]
//   - Built-in formats: MNIST (IDX), CIFAR-10 (binary), raw text, CSV
//! - [`DataCollector`] — label-keyed observation log with CSV export, plus
//!   standalone vector/value/comment/matrix CSV exports

pub mod batch;
pub mod collector;
pub mod container;
pub mod cursor;
pub mod formats;
pub mod importer;
pub mod sample;

pub use batch::{sample_indices, Batch, Partition, DEFAULT_PARTITION};
pub use collector::{
    export_comment_csv, export_matrices_csv, export_matrix_csv, export_value_csv,
    export_vector_csv, write_comment_csv, write_matrices_csv, write_matrix_csv, write_value_csv,
    write_vector_csv, DataCollector, ExportMode, Series, SeriesRange,
};
pub use container::DataContainer;
pub use cursor::Cursor;
pub use formats::{
    CifarFormat, CifarImporter, CsvFormat, CsvImporter, MnistFormat, MnistImporter,
    RawTextFormat, RawTextImporter,
};
pub use importer::{DatasetFormat, FormatImporter, Importer};
pub use sample::{Indexed, Sample};
