// Numeric payload types
//
// Dense arithmetic lives in ndarray; mimic only names the shapes it uses.

use std::fmt::Debug;

use num_traits::{One, Zero};

/// 2-D matrix payload (image, glyph, column vector, SDR).
pub type Matrix<T> = ndarray::Array2<T>;

/// 3-D tensor payload, laid out `[channels, height, width]`.
pub type Tensor3<T> = ndarray::Array3<T>;

/// Element type of an SDR matrix.
///
/// An SDR unit is *active* when its value is greater than zero.
pub trait SdrScalar: Copy + Zero + One + PartialOrd + Debug + Send + Sync + 'static {
    /// Whether this unit counts as active.
    fn is_active(&self) -> bool {
        *self > Self::zero()
    }
}

impl<T> SdrScalar for T where T: Copy + Zero + One + PartialOrd + Debug + Send + Sync + 'static {}

/// Index of the lowest active unit in `values`, if any.
pub fn first_active<'a, S: SdrScalar>(values: impl IntoIterator<Item = &'a S>) -> Option<usize> {
    values.into_iter().position(|v| v.is_active())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_active_prefers_lowest_index() {
        let v = [0.0f32, 0.0, 1.0, 1.0];
        assert_eq!(first_active(&v), Some(2));
        let v = [0u8, 0, 0];
        assert_eq!(first_active(&v), None);
    }

    #[test]
    fn negative_values_are_inactive() {
        assert!(!(-1.0f64).is_active());
        assert!(0.5f64.is_active());
    }
}
