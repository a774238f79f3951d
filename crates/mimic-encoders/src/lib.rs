//! # mimic-encoders
//!
//! Encoders turning sample payloads into sparse distributed representations
//! (SDRs): `(sdr_length, 1)` matrices whose active units are the values > 0.
//!
//! - [`Encoder`] — encode / optional decode over associated `Input`, `Output`
//! - [`MatrixSdrEncoder`] — fixed SDR length, batch encode/decode
//! - [`IndicatorEncoder`] — integer index → one active unit
//! - [`SymbolEncoder`] — alphabet symbol → one active unit
//! - [`ColumnEncoder`] — matrix column (or whole matrix) → SDR, encode only

pub mod column;
pub mod encoder;
pub mod indicator;
pub mod symbol;

pub use column::{ColumnEncoder, ColumnSelection};
pub use encoder::{Encoder, MatrixSdrEncoder};
pub use indicator::IndicatorEncoder;
pub use symbol::SymbolEncoder;
