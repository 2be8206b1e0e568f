//! Configuration types
//!
//! Everything a driver or the blink toggler reads but never derives itself:
//! line settings, device byte sequences, model table, key bindings and
//! blink preferences. All of it is supplied by the daemon, typically from
//! a TOML file.

pub mod keymap;
pub mod prefs;
pub mod types;

pub use keymap::*;
pub use prefs::*;
pub use types::*;
