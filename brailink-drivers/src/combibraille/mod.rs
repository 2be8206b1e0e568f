//! Tieman CombiBraille driver
//!
//! Serial displays with five status cells and 20, 40 or 80 main cells.
//! Output is a full-frame refresh sent only when content changes; input
//! is decoded from escape sequences and resolved into logical commands.

mod handshake;

use heapless::Vec;

use brailink_core::command::{Command, CommandResolver, InputMode};
use brailink_core::config::{CommandTable, DriverConfig, MAX_SEQUENCE_LEN};
use brailink_core::traits::{BrailleDriver, DriverError, Geometry, InitError, Refresh};
use brailink_hal::{Clock, PortOpener, SerialPort, UartConfig};
use brailink_protocol::frame::worst_case_len;
use brailink_protocol::{DotMap, FrameBuilder, FrameError, KeyDecoder, STATUS_CELLS};

/// Largest supported display, in cells
pub const MAX_CELLS: usize = 160;

/// Output buffer size: every cell stuffed plus pre, post and close sequences
const MAX_FRAME: usize = worst_case_len(MAX_CELLS, 3 * MAX_SEQUENCE_LEN);

/// An initialized CombiBraille display
pub struct CombiBraille<P: SerialPort> {
    port: P,
    config: DriverConfig,
    commands: CommandTable,
    geometry: Geometry,
    dots: DotMap,
    /// Logical content of the last frame sent
    previous: Vec<u8, MAX_CELLS>,
    previous_status: [u8; STATUS_CELLS],
    frame: FrameBuilder<MAX_FRAME>,
    keys: KeyDecoder,
    resolver: CommandResolver,
}

impl<P: SerialPort> CombiBraille<P> {
    /// Open `path`, identify the display and prepare its buffers
    ///
    /// On failure the port is closed before returning; no partially
    /// initialized driver ever escapes.
    pub fn initialize<O, C>(
        opener: &mut O,
        clock: &mut C,
        path: &str,
        config: DriverConfig,
        commands: CommandTable,
    ) -> Result<Self, InitError>
    where
        O: PortOpener<Port = P>,
        C: Clock,
    {
        let mut port = opener.open(path).map_err(|e| {
            tracing::warn!(path, error = %e, "cannot open braille device");
            InitError::DeviceOpenFailure
        })?;

        if let Err(e) = port.configure(&UartConfig::with_baudrate(config.baud_rate)) {
            tracing::warn!(path, error = %e, "cannot configure braille device");
            return Err(InitError::DeviceOpenFailure);
        }

        let Some(id) = handshake::identify(&mut port, clock, &config) else {
            return Err(Self::abandon(port, InitError::HandshakeTimeout));
        };

        let Some(geometry) = config.geometry_for(id) else {
            tracing::warn!(id, "unknown display model");
            return Err(Self::abandon(port, InitError::GeometryUnresolved));
        };

        let mut previous = Vec::new();
        if previous.resize(geometry.cells(), 0).is_err()
            || worst_case_len(geometry.cells(), config.verbatim_len()) > MAX_FRAME
        {
            tracing::warn!(cells = geometry.cells(), "display too large");
            return Err(Self::abandon(port, InitError::AllocationFailure));
        }

        tracing::info!(
            id,
            columns = geometry.columns,
            rows = geometry.rows,
            "CombiBraille identified"
        );

        Ok(Self {
            port,
            config,
            commands,
            geometry,
            dots: DotMap::tieman(),
            previous,
            previous_status: [0; STATUS_CELLS],
            frame: FrameBuilder::new(),
            keys: KeyDecoder::new(),
            resolver: CommandResolver::new(),
        })
    }

    /// Restore line settings and close the port
    fn abandon(mut port: P, error: InitError) -> InitError {
        let _ = port.restore();
        drop(port);
        error
    }

    fn assemble(&mut self, display: &[u8], status: &[u8; STATUS_CELLS]) -> Result<(), FrameError> {
        self.frame
            .clear()
            .raw(&self.config.pre_data)?
            .mapped(status, &self.dots)?
            .mapped(display, &self.dots)?
            .raw(&self.config.post_data)?;
        Ok(())
    }

    fn assemble_blank(&mut self) -> Result<(), FrameError> {
        self.frame
            .clear()
            .raw(&self.config.pre_data)?
            .blank(STATUS_CELLS + self.geometry.cells())?
            .raw(&self.config.post_data)?
            .raw(&self.config.close_sequence)?;
        Ok(())
    }

    /// Hand the assembled frame to the port; failures are only logged
    fn send(&mut self) {
        if let Err(e) = self.port.write_all(self.frame.as_bytes()) {
            tracing::warn!(error = %e, bytes = self.frame.len(), "braille write failed");
        }
    }
}

impl<P: SerialPort> BrailleDriver for CombiBraille<P> {
    fn identify(&self) -> &'static str {
        match self.geometry.columns {
            20 => "Tieman B.V. CombiBraille 25",
            40 => "Tieman B.V. CombiBraille 45",
            80 => "Tieman B.V. CombiBraille 85",
            _ => "Tieman B.V. CombiBraille",
        }
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn render(
        &mut self,
        display: &[u8],
        status: &[u8; STATUS_CELLS],
    ) -> Result<Refresh, DriverError> {
        let expected = self.geometry.cells();
        if display.len() != expected {
            return Err(DriverError::BufferSize {
                expected,
                actual: display.len(),
            });
        }

        if display == self.previous.as_slice() && *status == self.previous_status {
            return Ok(Refresh::Unchanged);
        }

        self.assemble(display, status)
            .map_err(|_| DriverError::FrameOverflow)?;

        // Lengths already match, so the copy cannot fail
        self.previous.copy_from_slice(display);
        self.previous_status = *status;

        self.send();
        Ok(Refresh::Sent)
    }

    fn read_command(&mut self, mode: InputMode) -> Option<Command> {
        loop {
            let byte = match self.port.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => return None,
                Err(e) => {
                    tracing::trace!(error = %e, "braille read failed");
                    return None;
                }
            };

            if let Some(raw) = self.keys.feed(byte) {
                let command =
                    self.resolver
                        .resolve(raw, mode, &self.commands, &self.config.offsets);
                tracing::trace!(raw, ?command, "key");
                return command;
            }
        }
    }

    fn shutdown(mut self) {
        match self.assemble_blank() {
            Ok(()) => self.send(),
            Err(_) => tracing::warn!("closing frame does not fit"),
        }
        tracing::debug!("CombiBraille closed");
        // Dropping the port closes it
    }
}
