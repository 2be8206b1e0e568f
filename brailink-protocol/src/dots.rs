//! Dot mapping between logical and physical cell encodings
//!
//! A braille cell is one byte, bit `i` meaning dot `i + 1`. The screen layer
//! produces cells in the standard order; each device family wires its pins
//! differently, so every cell is pushed through a 256-entry table before it
//! goes on the wire.

/// Standard logical order: bit `i` is dot `i + 1`
pub const STANDARD_DOT_ORDER: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Physical bit position of each logical dot on Tieman displays
pub const TIEMAN_DOT_ORDER: [u8; 8] = [0, 7, 1, 6, 2, 5, 3, 4];

/// Precomputed logical-to-physical cell translation
///
/// Only relocates bits, so `map(n).count_ones() == n.count_ones()` for
/// every `n` and the table is invertible.
#[derive(Clone, PartialEq, Eq)]
pub struct DotMap {
    table: [u8; 256],
}

impl core::fmt::Debug for DotMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DotMap")
            .field("dot1", &self.table[0x01])
            .field("dot8", &self.table[0x80])
            .finish()
    }
}

impl DotMap {
    /// Build the table for a device whose logical dot `i` lives at
    /// physical bit `physical[i]`
    ///
    /// Returns `None` unless `physical` is a permutation of `0..8`.
    pub fn new(physical: [u8; 8]) -> Option<Self> {
        let mut seen = 0u8;
        for &bit in &physical {
            if bit >= 8 || seen & (1 << bit) != 0 {
                return None;
            }
            seen |= 1 << bit;
        }

        let mut table = [0u8; 256];
        for (n, entry) in table.iter_mut().enumerate() {
            for (logical, &bit) in STANDARD_DOT_ORDER.iter().zip(physical.iter()) {
                if n & (1 << logical) != 0 {
                    *entry |= 1 << bit;
                }
            }
        }

        Some(Self { table })
    }

    /// Identity mapping
    pub fn identity() -> Self {
        let mut table = [0u8; 256];
        for (n, entry) in table.iter_mut().enumerate() {
            *entry = n as u8;
        }
        Self { table }
    }

    /// Mapping used by Tieman CombiBraille displays
    pub fn tieman() -> Self {
        // TIEMAN_DOT_ORDER is a permutation, so `new` cannot reject it
        Self::new(TIEMAN_DOT_ORDER).unwrap_or_else(Self::identity)
    }

    /// Translate one logical cell
    #[inline]
    pub fn map(&self, cell: u8) -> u8 {
        self.table[cell as usize]
    }

    /// Translate cells in place
    pub fn map_in_place(&self, cells: &mut [u8]) {
        for cell in cells {
            *cell = self.map(*cell);
        }
    }

    /// Table translating physical cells back to logical ones
    pub fn inverse(&self) -> Self {
        let mut table = [0u8; 256];
        for (n, &physical) in self.table.iter().enumerate() {
            table[physical as usize] = n as u8;
        }
        Self { table }
    }
}

impl Default for DotMap {
    fn default() -> Self {
        Self::tieman()
    }
}
