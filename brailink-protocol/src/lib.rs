//! CombiBraille serial wire format
//!
//! This crate defines the byte-level protocol spoken by Tieman CombiBraille
//! displays (and devices that mimic them). It is pure data transformation:
//! no I/O, no timing.
//!
//! # Protocol Overview
//!
//! Output frames carry the five status cells followed by the display cells,
//! in the device's physical dot order. The escape byte doubles as a framing
//! marker, so any cell equal to it is sent twice:
//! ```text
//! ┌──────────┬────────────────┬──────────────────────┬───────────┐
//! │ PRE-DATA │ STATUS (5)     │ DISPLAY (cols×rows)  │ POST-DATA │
//! │ 0–16B    │ 0x1B doubled   │ 0x1B doubled         │ 0–16B     │
//! └──────────┴────────────────┴──────────────────────┴───────────┘
//! ```
//!
//! Input arrives as escape sequences:
//! ```text
//! ESC 'K' code          key press (code != 0)
//! ESC 'K' 0x00 modifier key press, decoded as modifier | 0x60
//! ESC 'C' code          cursor routing key, decoded as code | 0x80
//! ```
//! Everything else on the input line is noise.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dots;
pub mod frame;
pub mod keys;

pub use dots::{DotMap, STANDARD_DOT_ORDER, TIEMAN_DOT_ORDER};
pub use frame::{unstuff, FrameBuilder, FrameError, ESCAPE, STATUS_CELLS};
pub use keys::{KeyDecoder, RawKey, MARKER_KEY, MARKER_ROUTING};
