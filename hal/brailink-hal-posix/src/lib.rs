//! POSIX implementation of the Brailink HAL
//!
//! Provides host implementations of the traits in `brailink-hal`:
//!
//! - [`serial::PosixSerial`] - termios serial port (raw, non-blocking reads)
//! - [`clock::SystemClock`] - monotonic clock over `std::time::Instant`
//! - [`alarm::AlarmQueue`] - in-order one-shot alarms for a poll loop

#![deny(unsafe_code)]

pub mod alarm;
pub mod clock;
pub mod serial;

pub use alarm::AlarmQueue;
pub use clock::SystemClock;
pub use serial::{PosixOpener, PosixSerial};
