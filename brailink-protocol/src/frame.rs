//! Output frame assembly for CombiBraille displays
//!
//! Frame format:
//! - PRE-DATA: device-specific prefix, copied verbatim
//! - STATUS (5 cells): physical dot patterns, 0x1B doubled
//! - DISPLAY (columns × rows cells): physical dot patterns, 0x1B doubled
//! - POST-DATA: device-specific suffix, copied verbatim
//! - CLOSE: close sequence, only in the final frame sent at shutdown

use heapless::Vec;

use crate::dots::DotMap;

/// Reserved escape byte; doubled whenever it appears in cell data
pub const ESCAPE: u8 = 0x1B;

/// Number of status cells on every CombiBraille model
pub const STATUS_CELLS: usize = 5;

/// Errors that can occur during frame assembly or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame does not fit the output buffer
    BufferTooSmall,
    /// An escape byte was not followed by a second escape byte
    InvalidEscape,
}

/// Worst-case frame length: every cell stuffed, plus the verbatim sequences
pub const fn worst_case_len(cells: usize, verbatim: usize) -> usize {
    2 * (STATUS_CELLS + cells) + verbatim
}

/// Builder for one output frame
///
/// Backed by a fixed-capacity buffer that is reused from frame to frame.
#[derive(Debug, Clone)]
pub struct FrameBuilder<const N: usize> {
    buffer: Vec<u8, N>,
}

impl<const N: usize> Default for FrameBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuilder<N> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Discard the previous frame
    pub fn clear(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    /// Append bytes verbatim (pre-data, post-data, close sequence)
    pub fn raw(&mut self, bytes: &[u8]) -> Result<&mut Self, FrameError> {
        self.buffer
            .extend_from_slice(bytes)
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(self)
    }

    /// Append physical cells, doubling every escape byte
    pub fn stuffed(&mut self, cells: &[u8]) -> Result<&mut Self, FrameError> {
        for &cell in cells {
            self.push_cell(cell)?;
        }
        Ok(self)
    }

    /// Append logical cells, translating through `map` before stuffing
    pub fn mapped(&mut self, cells: &[u8], map: &DotMap) -> Result<&mut Self, FrameError> {
        for &cell in cells {
            self.push_cell(map.map(cell))?;
        }
        Ok(self)
    }

    /// Append `count` blank cells
    ///
    /// Blank maps to blank under any dot order and never needs stuffing.
    pub fn blank(&mut self, count: usize) -> Result<&mut Self, FrameError> {
        if self.buffer.len() + count > N {
            return Err(FrameError::BufferTooSmall);
        }
        for _ in 0..count {
            let _ = self.buffer.push(0);
        }
        Ok(self)
    }

    /// Bytes assembled so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of bytes assembled so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing has been assembled
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn push_cell(&mut self, cell: u8) -> Result<(), FrameError> {
        self.buffer.push(cell).map_err(|_| FrameError::BufferTooSmall)?;
        if cell == ESCAPE {
            self.buffer.push(cell).map_err(|_| FrameError::BufferTooSmall)?;
        }
        Ok(())
    }
}

/// Reverse the stuffing applied by [`FrameBuilder::stuffed`]
pub fn unstuff<const N: usize>(stuffed: &[u8], out: &mut Vec<u8, N>) -> Result<(), FrameError> {
    let mut bytes = stuffed.iter();
    while let Some(&byte) = bytes.next() {
        if byte == ESCAPE && bytes.next() != Some(&ESCAPE) {
            return Err(FrameError::InvalidEscape);
        }
        out.push(byte).map_err(|_| FrameError::BufferTooSmall)?;
    }
    Ok(())
}
