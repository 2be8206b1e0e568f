//! Brailink Hardware Abstraction Layer
//!
//! This crate defines the traits a braille display driver needs from its
//! platform. Drivers are written against these traits only, so the same
//! protocol code runs against a POSIX serial port, an embedded UART, or a
//! scripted mock in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  brailink-drivers (protocol drivers)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  brailink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ brailink-hal- │
//!             │     posix     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`], [`uart::SerialPort`] - Serial channel
//! - [`uart::PortOpener`] - Opening a channel by device path
//! - [`time::Clock`] - Monotonic time and cooperative delays
//! - [`alarm::AlarmScheduler`] - One-shot alarms delivered on the caller's thread

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod alarm;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use alarm::{AlarmHandle, AlarmScheduler};
pub use time::Clock;
pub use uart::{
    DataBits, Parity, PortOpener, SerialPort, StopBits, UartConfig, UartError, UartRx, UartTx,
};
