// Indicator — one active unit per integer index

use std::marker::PhantomData;

use mimic_core::{Matrix, Result, SdrScalar};

use crate::encoder::{active_unit, one_hot, validate_sdr_length, Encoder, MatrixSdrEncoder};

/// Encodes an index `i < sdr_length` as an SDR whose only active unit is `i`.
///
/// ```ignore
/// let enc = IndicatorEncoder::<f32>::new(3)?;
/// enc.encode(&1)?; // [[0], [1], [0]]
/// ```
#[derive(Debug, Clone)]
pub struct IndicatorEncoder<S = f32> {
    sdr_length: usize,
    _scalar: PhantomData<S>,
}

impl<S: SdrScalar> IndicatorEncoder<S> {
    pub fn new(sdr_length: usize) -> Result<Self> {
        validate_sdr_length(sdr_length)?;
        Ok(Self {
            sdr_length,
            _scalar: PhantomData,
        })
    }
}

impl<S: SdrScalar> Encoder for IndicatorEncoder<S> {
    type Input = usize;
    type Output = Matrix<S>;

    fn name(&self) -> &str {
        "indicator"
    }

    fn encode(&self, index: &usize) -> Result<Matrix<S>> {
        one_hot(self.sdr_length, *index)
    }

    /// Lowest active unit wins when several are set.
    fn decode(&self, sdr: &Matrix<S>) -> Result<usize> {
        active_unit(sdr, self.sdr_length)
    }
}

impl<S: SdrScalar> MatrixSdrEncoder<S> for IndicatorEncoder<S> {
    fn sdr_length(&self) -> usize {
        self.sdr_length
    }

    fn set_sdr_length(&mut self, sdr_length: usize) -> Result<()> {
        validate_sdr_length(sdr_length)?;
        self.sdr_length = sdr_length;
        Ok(())
    }
}
