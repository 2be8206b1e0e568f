//! Raw key to command translation table

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::command::{ROUTING_FLAG, SET_BEGIN_BLOCK, SET_END_BLOCK};

/// A single entry of the translation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyBinding {
    /// Raw key code from the decoder
    pub key: u8,
    /// Translated code
    pub command: u8,
}

/// 256-entry lookup from raw key codes to translated codes
///
/// Translated codes with the high bit set are routing keys, codes 1 and 2
/// select the block-routing submode, everything else is a command.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandTable {
    entries: [u8; 256],
}

impl core::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let bound = self.entries.iter().filter(|&&c| c != 0).count();
        f.debug_struct("CommandTable").field("bound", &bound).finish()
    }
}

impl Default for CommandTable {
    /// Routing keys and the two submode keys pass through unchanged;
    /// every other key is unbound
    fn default() -> Self {
        let mut table = Self::empty();
        for key in ROUTING_FLAG..=u8::MAX {
            table.bind(key, key);
        }
        table.bind(SET_BEGIN_BLOCK, SET_BEGIN_BLOCK);
        table.bind(SET_END_BLOCK, SET_END_BLOCK);
        table
    }
}

impl CommandTable {
    /// Table with every key unbound
    pub const fn empty() -> Self {
        Self { entries: [0; 256] }
    }

    /// Start from the default table and apply `bindings` in order
    pub fn from_bindings<'a>(bindings: impl IntoIterator<Item = &'a KeyBinding>) -> Self {
        let mut table = Self::default();
        for binding in bindings {
            table.bind(binding.key, binding.command);
        }
        table
    }

    /// Bind one key
    pub fn bind(&mut self, key: u8, command: u8) {
        self.entries[key as usize] = command;
    }

    /// Translate a raw key code
    #[inline]
    pub fn translate(&self, key: u8) -> u8 {
        self.entries[key as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_passes_routing_keys() {
        let table = CommandTable::default();
        assert_eq!(table.translate(0x80), 0x80);
        assert_eq!(table.translate(0xC5), 0xC5);
        assert_eq!(table.translate(SET_BEGIN_BLOCK), SET_BEGIN_BLOCK);
        assert_eq!(table.translate(0x07), 0);
    }

    #[test]
    fn test_bindings_override_defaults() {
        let bindings = [
            KeyBinding { key: 0x07, command: 0x21 },
            KeyBinding { key: 0x85, command: 0x00 },
        ];
        let table = CommandTable::from_bindings(&bindings);
        assert_eq!(table.translate(0x07), 0x21);
        assert_eq!(table.translate(0x85), 0x00);
        assert_eq!(table.translate(0x86), 0x86);
    }
}
