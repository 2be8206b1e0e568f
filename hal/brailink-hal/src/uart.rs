//! UART serial communication abstractions
//!
//! Provides traits for the byte-oriented serial channel a braille display
//! is attached to. Reads are non-blocking: an empty read is a normal
//! outcome, not an error.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Serial channel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Device could not be opened
    Open,
    /// Line settings could not be read or applied
    Configure,
    /// Requested setting is not supported by the platform
    Unsupported,
    /// Transfer failed
    Io,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::Open => f.write_str("serial device could not be opened"),
            UartError::Configure => f.write_str("serial line settings could not be applied"),
            UartError::Unsupported => f.write_str("unsupported serial setting"),
            UartError::Io => f.write_str("serial transfer failed"),
        }
    }
}

/// UART transmitter
pub trait UartTx {
    /// Write data to the channel
    ///
    /// Returns the number of bytes accepted, which may be less than
    /// `data.len()`.
    fn write(&mut self, data: &[u8]) -> Result<usize, UartError>;

    /// Write the whole buffer, treating a short write as an error
    fn write_all(&mut self, data: &[u8]) -> Result<(), UartError> {
        if self.write(data)? == data.len() {
            Ok(())
        } else {
            Err(UartError::Io)
        }
    }
}

/// UART receiver
pub trait UartRx {
    /// Read whatever data is currently available
    ///
    /// Never blocks. Returns `Ok(0)` when nothing is pending.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError>;

    /// Read a single byte if one is available
    fn read_byte(&mut self) -> Result<Option<u8>, UartError> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// An exclusively owned, configurable serial device
///
/// Dropping the port closes it.
pub trait SerialPort: UartTx + UartRx {
    /// Apply line settings, remembering the previous ones for [`restore`](Self::restore)
    fn configure(&mut self, config: &UartConfig) -> Result<(), UartError>;

    /// Put back the line settings saved by [`configure`](Self::configure)
    fn restore(&mut self) -> Result<(), UartError>;

    /// Drop any received but unread input
    fn discard_input(&mut self) -> Result<(), UartError>;
}

/// Opens serial ports by device path
pub trait PortOpener {
    /// Port type produced by this opener
    type Port: SerialPort;

    /// Open the device at `path` for reading and writing
    fn open(&mut self, path: &str) -> Result<Self::Port, UartError>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// RTS/CTS hardware flow control
    pub hardware_flow_control: bool,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 38400,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            hardware_flow_control: true,
        }
    }
}

impl UartConfig {
    /// 8N1 with hardware flow control at the given rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    One,
    Two,
}
