//! Braille display driver implementations
//!
//! This crate provides concrete implementations of the
//! [`BrailleDriver`](brailink_core::traits::BrailleDriver) trait, one module
//! per display family:
//!
//! - Tieman CombiBraille (serial)
//!
//! A new family is added with its own handshake and framing module; families
//! that only differ in byte sequences or key layout reuse an existing driver
//! with a different [`DriverConfig`](brailink_core::config::DriverConfig).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod combibraille;

pub use combibraille::CombiBraille;
