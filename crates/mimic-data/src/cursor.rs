// Cursor — sequential iteration state kept apart from the data it walks

use mimic_core::{check_index, Result};

/// Position of the next sample handed out by sequential draws.
///
/// The cursor never owns or borrows the container; callers pass the current
/// length on every move. Positions always wrap modulo that length, so a cursor
/// over a non-empty container is always a valid index into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor to `position`, which must be in `[0, len)`.
    pub fn set(&mut self, position: usize, len: usize) -> Result<()> {
        check_index(position, len)?;
        self.position = position;
        Ok(())
    }

    /// Consume `count` positions starting at the cursor, wrapping modulo `len`.
    ///
    /// Returns the visited indices in order and whether the walk reached or
    /// crossed the end of the container (an epoch boundary).
    ///
    /// `len` must be non-zero.
    pub fn advance(&mut self, count: usize, len: usize) -> (Vec<usize>, bool) {
        debug_assert!(len > 0, "Cursor::advance on an empty container");
        let start = self.position;
        let indices = (0..count).map(|k| (start + k) % len).collect();
        let wrapped = start + count >= len;
        self.position = (start + count) % len;
        (indices, wrapped)
    }

    /// Whether consuming `count` more positions would reach the end.
    pub fn reaches_end(&self, count: usize, len: usize) -> bool {
        self.position + count >= len
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}
