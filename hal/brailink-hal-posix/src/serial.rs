//! termios serial port
//!
//! The port is put in raw mode with `VMIN = 0, VTIME = 0`, so reads return
//! immediately with whatever is pending. The previous line settings are
//! saved by `configure` and put back by `restore`.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;

use brailink_hal::{
    DataBits, Parity, PortOpener, SerialPort, StopBits, UartConfig, UartError, UartRx, UartTx,
};
use nix::sys::termios::{
    self, BaudRate, ControlFlags, FlushArg, InputFlags, LocalFlags, OutputFlags, SetArg,
    SpecialCharacterIndices, Termios,
};

/// Serial device opened through the POSIX terminal interface
pub struct PosixSerial {
    file: File,
    saved: Option<Termios>,
}

impl PosixSerial {
    /// Open `path` for reading and writing without making it the controlling tty
    pub fn open(path: &str) -> Result<Self, UartError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(nix::libc::O_NOCTTY)
            .open(path)
            .map_err(|err| {
                tracing::warn!(path, %err, "cannot open serial device");
                UartError::Open
            })?;

        Ok(Self { file, saved: None })
    }
}

fn baud_rate(rate: u32) -> Option<BaudRate> {
    let baud = match rate {
        1200 => BaudRate::B1200,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        _ => return None,
    };
    Some(baud)
}

fn control_flags(config: &UartConfig) -> ControlFlags {
    let mut flags = ControlFlags::CLOCAL | ControlFlags::CREAD;

    flags |= match config.data_bits {
        DataBits::Seven => ControlFlags::CS7,
        DataBits::Eight => ControlFlags::CS8,
    };
    match config.parity {
        Parity::None => {}
        Parity::Even => flags |= ControlFlags::PARENB,
        Parity::Odd => flags |= ControlFlags::PARENB | ControlFlags::PARODD,
    }
    if config.stop_bits == StopBits::Two {
        flags |= ControlFlags::CSTOPB;
    }
    if config.hardware_flow_control {
        flags |= ControlFlags::CRTSCTS;
    }
    flags
}

fn transfer_result(result: io::Result<usize>) -> Result<usize, UartError> {
    match result {
        Ok(n) => Ok(n),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
            ) =>
        {
            Ok(0)
        }
        Err(err) => {
            tracing::debug!(%err, "serial transfer failed");
            Err(UartError::Io)
        }
    }
}

impl UartTx for PosixSerial {
    fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        transfer_result(self.file.write(data))
    }
}

impl UartRx for PosixSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        transfer_result(self.file.read(buf))
    }
}

impl SerialPort for PosixSerial {
    fn configure(&mut self, config: &UartConfig) -> Result<(), UartError> {
        let speed = baud_rate(config.baudrate).ok_or(UartError::Unsupported)?;

        let original = termios::tcgetattr(&self.file).map_err(|err| {
            tracing::warn!(%err, "cannot read serial line settings");
            UartError::Configure
        })?;

        let mut raw = original.clone();
        raw.control_flags = control_flags(config);
        raw.input_flags = InputFlags::IGNPAR;
        raw.output_flags = OutputFlags::empty();
        raw.local_flags = LocalFlags::empty();
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        termios::cfsetspeed(&mut raw, speed).map_err(|_| UartError::Unsupported)?;

        termios::tcsetattr(&self.file, SetArg::TCSANOW, &raw).map_err(|err| {
            tracing::warn!(%err, "cannot apply serial line settings");
            UartError::Configure
        })?;

        if self.saved.is_none() {
            self.saved = Some(original);
        }
        tracing::debug!(baud = config.baudrate, "serial line configured");
        Ok(())
    }

    fn restore(&mut self) -> Result<(), UartError> {
        let Some(original) = self.saved.take() else {
            return Ok(());
        };
        termios::tcsetattr(&self.file, SetArg::TCSANOW, &original).map_err(|err| {
            tracing::warn!(%err, "cannot restore serial line settings");
            UartError::Configure
        })
    }

    fn discard_input(&mut self) -> Result<(), UartError> {
        termios::tcflush(&self.file, FlushArg::TCIFLUSH).map_err(|_| UartError::Io)
    }
}

/// Opens [`PosixSerial`] ports by device path
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixOpener;

impl PortOpener for PosixOpener {
    type Port = PosixSerial;

    fn open(&mut self, path: &str) -> Result<PosixSerial, UartError> {
        PosixSerial::open(path)
    }
}
