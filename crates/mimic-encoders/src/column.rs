// Column — project a matrix payload onto an SDR column

use tracing::trace;

use mimic_core::{Matrix, Result, SdrScalar};

use crate::encoder::{validate_sdr_length, Encoder, MatrixSdrEncoder};

/// Which part of the input matrix becomes the SDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    /// A single column, top to bottom.
    Column(usize),
    /// The whole matrix, column after column.
    #[default]
    Flatten,
}

/// Copies matrix values into a fixed-length SDR column.
///
/// Inputs longer than the SDR are clipped and shorter ones zero-padded. The
/// mapping is lossy, so [`decode`](Encoder::decode) is unsupported.
///
/// # Example
/// ```ignore
/// // 28×28 MNIST image → 784-unit SDR
/// let enc = ColumnEncoder::<f32>::new(784, ColumnSelection::Flatten)?;
/// ```
#[derive(Debug, Clone)]
pub struct ColumnEncoder<S = f32> {
    sdr_length: usize,
    selection: ColumnSelection,
    _scalar: std::marker::PhantomData<S>,
}

impl<S: SdrScalar> ColumnEncoder<S> {
    pub fn new(sdr_length: usize, selection: ColumnSelection) -> Result<Self> {
        validate_sdr_length(sdr_length)?;
        Ok(Self {
            sdr_length,
            selection,
            _scalar: std::marker::PhantomData,
        })
    }

    pub fn selection(&self) -> ColumnSelection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: ColumnSelection) {
        self.selection = selection;
    }
}

impl<S: SdrScalar> Encoder for ColumnEncoder<S> {
    type Input = Matrix<S>;
    type Output = Matrix<S>;

    fn name(&self) -> &str {
        "column"
    }

    fn encode(&self, input: &Matrix<S>) -> Result<Matrix<S>> {
        let values: Vec<S> = match self.selection {
            ColumnSelection::Column(j) => {
                mimic_core::check_index(j, input.ncols())?;
                input.column(j).iter().copied().collect()
            }
            // The transpose's logical order is the original's column-major order.
            ColumnSelection::Flatten => input.t().iter().copied().collect(),
        };
        if values.len() != self.sdr_length {
            trace!(
                available = values.len(),
                sdr_length = self.sdr_length,
                "resizing column to SDR length"
            );
        }

        let mut sdr = Matrix::zeros((self.sdr_length, 1));
        for (unit, v) in sdr.iter_mut().zip(values) {
            *unit = v;
        }
        Ok(sdr)
    }
}

impl<S: SdrScalar> MatrixSdrEncoder<S> for ColumnEncoder<S> {
    fn sdr_length(&self) -> usize {
        self.sdr_length
    }

    fn set_sdr_length(&mut self, sdr_length: usize) -> Result<()> {
        validate_sdr_length(sdr_length)?;
        self.sdr_length = sdr_length;
        Ok(())
    }
}

impl From<Option<usize>> for ColumnSelection {
    fn from(column: Option<usize>) -> Self {
        column.map_or(ColumnSelection::Flatten, ColumnSelection::Column)
    }
}
