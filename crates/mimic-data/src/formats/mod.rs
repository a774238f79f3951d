//! Per-format dataset adapters.
//!
//! Each adapter implements [`DatasetFormat`](crate::DatasetFormat) and has a
//! matching `FormatImporter` alias.

pub mod cifar;
pub mod csv;
pub mod mnist;
pub mod text;

pub use cifar::{build_cifar_bytes, CifarFormat, CifarImporter};
pub use csv::{CsvFormat, CsvImporter};
pub use mnist::{build_idx1_bytes, build_idx3_bytes, MnistFormat, MnistImporter};
pub use text::{RawTextFormat, RawTextImporter};
