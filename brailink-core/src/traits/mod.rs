//! Driver capability traits
//!
//! These traits define the interface between the daemon and the
//! device-family implementations in `brailink-drivers`.

pub mod display;

pub use display::{BrailleDriver, DriverError, Geometry, InitError, Refresh};
