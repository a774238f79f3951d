//! # mimic-core
//!
//! Shared building blocks for the mimic crates.
//!
//! This crate provides:
//! - [`Error`] / [`ErrorKind`] — the error taxonomy used everywhere
//! - [`Matrix`] / [`Tensor3`] — ndarray-backed payload aliases
//! - [`SdrScalar`] — element type bound for SDR matrices

pub mod error;
pub mod types;

pub use error::{check_index, Error, ErrorKind, Result};
pub use types::{first_active, Matrix, SdrScalar, Tensor3};
