//! Display session
//!
//! Owns an initialized driver together with the blink state and the
//! little bit of screen state the daemon keeps: a cursor that routing keys
//! move and a block selection marked with the begin/end block keys.

use brailink_core::blink::{BlinkAspect, Blinkers};
use brailink_core::command::{Command, InputMode, Routing};
use brailink_core::config::{BlinkPreferences, RoutingOffsets};
use brailink_core::traits::{BrailleDriver, DriverError, Refresh};
use brailink_hal::AlarmScheduler;
use brailink_protocol::STATUS_CELLS;

/// Dots 7 and 8
const CURSOR_DOTS: u8 = 0xC0;

/// Dot 8
const SELECTION_DOTS: u8 = 0x80;

pub struct Session<D: BrailleDriver> {
    driver: D,
    prefs: BlinkPreferences,
    offsets: RoutingOffsets,
    blinkers: Blinkers,
    cells: Vec<u8>,
    cursor: usize,
    block_start: Option<usize>,
    selection: Option<(usize, usize)>,
}

impl<D: BrailleDriver> Session<D> {
    /// Wrap a driver and start every blinker from its initial phase
    pub fn new<S>(driver: D, prefs: BlinkPreferences, offsets: RoutingOffsets, alarms: &mut S) -> Self
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        let cells = vec![0; driver.geometry().cells()];
        let mut blinkers = Blinkers::new();
        blinkers.reset_all(&prefs, alarms);

        Self {
            driver,
            prefs,
            offsets,
            blinkers,
            cells,
            cursor: 0,
            block_start: None,
            selection: None,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// A blink alarm fired
    pub fn on_alarm<S>(&mut self, aspect: BlinkAspect, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        self.blinkers.handle_alarm(aspect, &self.prefs, alarms);
    }

    /// Drain every complete command the display has sent
    pub fn poll_input<S>(&mut self, alarms: &mut S) -> usize
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        let mut count = 0;
        while let Some(command) = self.driver.read_command(InputMode::Normal) {
            self.apply(command, alarms);
            count += 1;
        }
        count
    }

    /// Act on one logical command
    pub fn apply<S>(&mut self, command: Command, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        let Some((routing, cell)) = command.routing_target(&self.offsets) else {
            if command != Command::NOOP {
                tracing::debug!(command = command.0, "unhandled command");
            }
            return;
        };

        let cell = usize::from(cell);
        if cell >= self.cells.len() {
            tracing::debug!(cell, "routing key beyond the display");
            return;
        }

        match routing {
            Routing::Route => {
                self.cursor = cell;
                // Show the cursor straight away after it moves
                self.blinkers
                    .get_mut(BlinkAspect::Cursor)
                    .set_state(true, &self.prefs, alarms);
                tracing::debug!(cell, "cursor routed");
            }
            Routing::BeginBlock => {
                self.block_start = Some(cell);
                self.selection = None;
            }
            Routing::EndBlock => match self.block_start.take() {
                Some(start) => {
                    self.selection = Some((start.min(cell), start.max(cell)));
                    tracing::debug!(start, end = cell, "block selected");
                }
                None => tracing::debug!(cell, "end of block without a beginning"),
            },
        }
    }

    /// Draw the current state and hand it to the driver
    pub fn refresh(&mut self) -> Result<Refresh, DriverError> {
        self.cells.fill(0);

        if let Some((start, end)) = self.selection {
            if self.blinkers.is_visible(BlinkAspect::Attributes, &self.prefs) {
                for cell in &mut self.cells[start..=end] {
                    *cell |= SELECTION_DOTS;
                }
            }
        }
        if self.blinkers.is_visible(BlinkAspect::Cursor, &self.prefs) {
            self.cells[self.cursor] |= CURSOR_DOTS;
        }

        // Status cells stay blank
        self.driver.render(&self.cells, &[0; STATUS_CELLS])
    }

    /// Give the driver back, e.g. to shut it down
    pub fn into_driver(self) -> D {
        self.driver
    }
}
