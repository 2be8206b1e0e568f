//! Device-agnostic core logic for braille display drivers
//!
//! This crate contains everything that does not depend on a particular
//! display family or platform:
//!
//! - The driver capability trait and display geometry
//! - Driver configuration (byte sequences, models, command table)
//! - Logical command resolution, including the cursor-routing submode
//! - Blink toggling for cursor and attribute rendering

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod blink;
pub mod command;
pub mod config;
pub mod traits;
