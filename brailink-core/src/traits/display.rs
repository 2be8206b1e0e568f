//! Braille display driver trait

use core::fmt;

use brailink_protocol::STATUS_CELLS;

use crate::command::{Command, InputMode};

/// Display size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Cells per row
    pub columns: u8,
    /// Number of rows
    pub rows: u8,
}

impl Geometry {
    /// Create a geometry; `None` unless both dimensions are positive
    pub fn new(columns: u8, rows: u8) -> Option<Self> {
        if columns == 0 || rows == 0 {
            return None;
        }
        Some(Self { columns, rows })
    }

    /// Total number of display cells
    pub fn cells(&self) -> usize {
        usize::from(self.columns) * usize::from(self.rows)
    }
}

/// Reasons a display could not be brought up
///
/// Callers usually collapse all of these into "no display available".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The serial device could not be opened or configured
    DeviceOpenFailure,
    /// Every handshake attempt went unacknowledged
    HandshakeTimeout,
    /// Display buffers could not be obtained
    AllocationFailure,
    /// The identification byte matches no known model
    GeometryUnresolved,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::DeviceOpenFailure => f.write_str("display device could not be opened"),
            InitError::HandshakeTimeout => f.write_str("display did not acknowledge"),
            InitError::AllocationFailure => f.write_str("display buffers could not be allocated"),
            InitError::GeometryUnresolved => f.write_str("display model not recognized"),
        }
    }
}

/// Errors reported by an initialized driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Display buffer length does not match the geometry
    BufferSize { expected: usize, actual: usize },
    /// Output frame exceeded its buffer
    FrameOverflow,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::BufferSize { expected, actual } => {
                write!(f, "display buffer has {} cells, expected {}", actual, expected)
            }
            DriverError::FrameOverflow => f.write_str("output frame overflow"),
        }
    }
}

/// Result of a render call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Content matched the previous render; nothing was sent
    Unchanged,
    /// A frame was handed to the channel
    Sent,
}

/// Capability interface implemented by every display family
///
/// Construction is family-specific; once a driver exists, the daemon only
/// talks to it through this trait.
pub trait BrailleDriver {
    /// Human-readable driver and model description
    fn identify(&self) -> &'static str;

    /// Resolved display size
    fn geometry(&self) -> Geometry;

    /// Show `display` (logical dot patterns, `geometry().cells()` long)
    /// and the status cells
    ///
    /// Write failures are not reported: output is fire-and-forget.
    fn render(
        &mut self,
        display: &[u8],
        status: &[u8; STATUS_CELLS],
    ) -> Result<Refresh, DriverError>;

    /// Poll for the next logical command
    ///
    /// Never blocks. `None` means no complete key is available yet.
    fn read_command(&mut self, mode: InputMode) -> Option<Command>;

    /// Blank the display and release the device
    fn shutdown(self)
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_must_be_positive() {
        assert!(Geometry::new(0, 1).is_none());
        assert!(Geometry::new(40, 0).is_none());
        assert_eq!(Geometry::new(40, 2).unwrap().cells(), 80);
    }

    #[test]
    fn test_buffer_size_message() {
        let err = DriverError::BufferSize {
            expected: 40,
            actual: 39,
        };
        assert_eq!(err.to_string(), "display buffer has 39 cells, expected 40");
    }
}
