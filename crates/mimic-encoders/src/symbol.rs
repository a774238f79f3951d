// Symbol — indicator SDRs keyed by position in a fixed alphabet

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use mimic_core::{bail_config, Error, Matrix, Result, SdrScalar};

use crate::encoder::{active_unit, one_hot, validate_sdr_length, Encoder, MatrixSdrEncoder};

/// First and last printable ASCII characters (space through tilde).
const PRINTABLE_ASCII: std::ops::RangeInclusive<u8> = 0x20..=0x7E;

/// Encodes each symbol of an ordered alphabet as the indicator SDR of its
/// alphabet position.
///
/// The SDR length defaults to the alphabet size. Shrinking it leaves the
/// trailing symbols unencodable (`OutOfRange`); growing it leaves spare units.
#[derive(Debug, Clone)]
pub struct SymbolEncoder<T, S = f32> {
    alphabet: Vec<T>,
    positions: HashMap<T, usize>,
    sdr_length: usize,
    _scalar: PhantomData<S>,
}

impl<T, S> SymbolEncoder<T, S>
where
    T: Eq + Hash + Clone + Debug,
    S: SdrScalar,
{
    /// Build from an ordered alphabet. Empty alphabets and repeated symbols
    /// are configuration errors.
    pub fn new(alphabet: impl IntoIterator<Item = T>) -> Result<Self> {
        let alphabet: Vec<T> = alphabet.into_iter().collect();
        let mut positions = HashMap::with_capacity(alphabet.len());
        for (i, symbol) in alphabet.iter().enumerate() {
            if positions.insert(symbol.clone(), i).is_some() {
                bail_config!("symbol {symbol:?} appears twice in the alphabet");
            }
        }
        let sdr_length = alphabet.len();
        validate_sdr_length(sdr_length)?;
        Ok(Self {
            alphabet,
            positions,
            sdr_length,
            _scalar: PhantomData,
        })
    }

    pub fn alphabet(&self) -> &[T] {
        &self.alphabet
    }

    /// Alphabet position of `symbol`, if it belongs to the alphabet.
    pub fn position(&self, symbol: &T) -> Option<usize> {
        self.positions.get(symbol).copied()
    }
}

impl<S: SdrScalar> SymbolEncoder<char, S> {
    /// The 95 printable ASCII characters, space first.
    pub fn printable_ascii() -> Self {
        let alphabet: Vec<char> = PRINTABLE_ASCII.map(char::from).collect();
        let positions = alphabet.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            sdr_length: alphabet.len(),
            alphabet,
            positions,
            _scalar: PhantomData,
        }
    }
}

impl<T, S> Encoder for SymbolEncoder<T, S>
where
    T: Eq + Hash + Clone + Debug,
    S: SdrScalar,
{
    type Input = T;
    type Output = Matrix<S>;

    fn name(&self) -> &str {
        "symbol"
    }

    fn encode(&self, symbol: &T) -> Result<Matrix<S>> {
        let position = self
            .position(symbol)
            .ok_or_else(|| Error::UnknownSymbol(format!("{symbol:?}")))?;
        one_hot(self.sdr_length, position)
    }

    fn decode(&self, sdr: &Matrix<S>) -> Result<T> {
        let unit = active_unit(sdr, self.sdr_length)?;
        self.alphabet.get(unit).cloned().ok_or_else(|| {
            Error::InvalidSdr(format!(
                "active unit {unit} is past the {}-symbol alphabet",
                self.alphabet.len()
            ))
        })
    }
}

impl<T, S> MatrixSdrEncoder<S> for SymbolEncoder<T, S>
where
    T: Eq + Hash + Clone + Debug,
    S: SdrScalar,
{
    fn sdr_length(&self) -> usize {
        self.sdr_length
    }

    fn set_sdr_length(&mut self, sdr_length: usize) -> Result<()> {
        validate_sdr_length(sdr_length)?;
        self.sdr_length = sdr_length;
        Ok(())
    }
}
