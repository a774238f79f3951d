// Encoder — map samples to sparse distributed representations

use std::borrow::Borrow;

use ndarray::Axis;
use tracing::debug;

use mimic_core::{first_active, Error, Matrix, Result, SdrScalar};

/// Converts a value of type `Input` into an `Output` representation.
///
/// Encoders hold configuration only; `encode` never depends on earlier calls.
pub trait Encoder {
    type Input;
    type Output;

    /// Short name used in errors and logs.
    fn name(&self) -> &str;

    fn encode(&self, input: &Self::Input) -> Result<Self::Output>;

    /// Invert [`encode`](Encoder::encode). Encoders whose mapping loses
    /// information keep this default, which always fails with
    /// [`Error::Unsupported`].
    fn decode(&self, _output: &Self::Output) -> Result<Self::Input> {
        Err(Error::unsupported(format!(
            "{} encoder has no inverse",
            self.name()
        )))
    }
}

/// An [`Encoder`] whose output is an SDR column of fixed length.
///
/// Every successful `encode` returns a matrix of exactly
/// [`sdr_shape`](MatrixSdrEncoder::sdr_shape), whatever the input size.
pub trait MatrixSdrEncoder<S: SdrScalar>: Encoder<Output = Matrix<S>> {
    fn sdr_length(&self) -> usize;

    /// Change the number of SDR units. Zero is a configuration error.
    fn set_sdr_length(&mut self, sdr_length: usize) -> Result<()>;

    fn sdr_shape(&self) -> (usize, usize) {
        (self.sdr_length(), 1)
    }

    /// Encode several inputs side by side: column `j` of the result is the
    /// SDR of `inputs[j]`.
    fn encode_batch<B: Borrow<Self::Input>>(&self, inputs: &[B]) -> Result<Matrix<S>> {
        let shape = self.sdr_shape();
        let mut out = Matrix::zeros((shape.0, inputs.len()));
        for (j, input) in inputs.iter().enumerate() {
            let sdr = self.encode(input.borrow())?;
            if sdr.dim() != shape {
                return Err(Error::InvalidSdr(format!(
                    "{} produced shape {:?}, expected {:?}",
                    self.name(),
                    sdr.dim(),
                    shape
                )));
            }
            out.column_mut(j).assign(&sdr.column(0));
        }
        debug!(encoder = self.name(), columns = inputs.len(), "encoded batch");
        Ok(out)
    }

    /// Decode a matrix produced by [`encode_batch`](MatrixSdrEncoder::encode_batch),
    /// column by column.
    fn decode_batch(&self, sdrs: &Matrix<S>) -> Result<Vec<Self::Input>> {
        if sdrs.nrows() != self.sdr_length() {
            return Err(Error::InvalidSdr(format!(
                "expected {} rows, got {}",
                self.sdr_length(),
                sdrs.nrows()
            )));
        }
        sdrs.columns()
            .into_iter()
            .map(|col| self.decode(&col.to_owned().insert_axis(Axis(1))))
            .collect()
    }
}

pub(crate) fn validate_sdr_length(sdr_length: usize) -> Result<()> {
    if sdr_length == 0 {
        mimic_core::bail_config!("SDR length must be positive");
    }
    Ok(())
}

/// A `(len, 1)` SDR with a single active unit at `index`.
pub(crate) fn one_hot<S: SdrScalar>(len: usize, index: usize) -> Result<Matrix<S>> {
    mimic_core::check_index(index, len)?;
    let mut sdr = Matrix::zeros((len, 1));
    sdr[[index, 0]] = S::one();
    Ok(sdr)
}

/// Position of the lowest active unit of a `(len, 1)` SDR.
pub(crate) fn active_unit<S: SdrScalar>(sdr: &Matrix<S>, len: usize) -> Result<usize> {
    if sdr.dim() != (len, 1) {
        return Err(Error::InvalidSdr(format!(
            "expected shape ({len}, 1), got {:?}",
            sdr.dim()
        )));
    }
    first_active(sdr.iter()).ok_or_else(|| Error::InvalidSdr("no active unit".into()))
}
