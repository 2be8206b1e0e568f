//! Driver configuration definitions
//!
//! Defaults describe a Tieman CombiBraille on its factory settings.

use core::fmt;

use heapless::Vec;

use brailink_protocol::ESCAPE;

use crate::traits::Geometry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of any device byte sequence
pub const MAX_SEQUENCE_LEN: usize = 16;

/// Maximum number of entries in the model table
pub const MAX_MODELS: usize = 8;

/// Device byte sequence (init, ack, pre/post data, close)
pub type ByteSequence = Vec<u8, MAX_SEQUENCE_LEN>;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A byte sequence is longer than [`MAX_SEQUENCE_LEN`]
    SequenceTooLong,
    /// A model has a zero dimension
    InvalidGeometry,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SequenceTooLong => f.write_str("byte sequence too long"),
            ConfigError::InvalidGeometry => f.write_str("display model has a zero dimension"),
        }
    }
}

/// Build a byte sequence from a slice
pub fn sequence(bytes: &[u8]) -> Result<ByteSequence, ConfigError> {
    Vec::from_slice(bytes).map_err(|_| ConfigError::SequenceTooLong)
}

/// Display model, keyed by the identification byte sent during handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelGeometry {
    /// Identification byte
    pub id: u8,
    /// Cells per row
    pub columns: u8,
    /// Number of rows
    pub rows: u8,
}

/// Command offsets for the three kinds of cursor routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingOffsets {
    /// Plain cursor routing
    pub route: u16,
    /// Begin block selection
    pub begin_block: u16,
    /// End block selection
    pub end_block: u16,
}

impl Default for RoutingOffsets {
    fn default() -> Self {
        Self {
            route: 0x100,
            begin_block: 0x200,
            end_block: 0x300,
        }
    }
}

/// Configuration consumed by a protocol driver
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Line speed in bits per second
    pub baud_rate: u32,
    /// Handshake attempts before giving up (0 = try forever)
    pub max_attempts: u16,
    /// How long to wait for an acknowledgement per attempt (ms)
    pub ack_timeout_ms: u32,
    /// Pause between acknowledgement polls (ms)
    pub poll_interval_ms: u32,
    /// Sent to the device to start a handshake
    pub init_sequence: ByteSequence,
    /// Expected before the identification byte
    pub ack_prefix: ByteSequence,
    /// Sent before the cells of every frame
    pub pre_data: ByteSequence,
    /// Sent after the cells of every frame
    pub post_data: ByteSequence,
    /// Appended to the final frame at shutdown
    pub close_sequence: ByteSequence,
    /// Known models by identification byte
    pub models: Vec<ModelGeometry, MAX_MODELS>,
    /// Routing command offsets
    pub offsets: RoutingOffsets,
}

impl Default for DriverConfig {
    fn default() -> Self {
        let mut models = Vec::new();
        for (id, columns) in [(0u8, 20u8), (1, 40), (2, 80)] {
            let _ = models.push(ModelGeometry {
                id,
                columns,
                rows: 1,
            });
        }

        Self {
            baud_rate: 38400,
            max_attempts: 0,
            ack_timeout_ms: 5000,
            poll_interval_ms: 20,
            init_sequence: Vec::from_slice(&[ESCAPE, b'?']).unwrap_or_default(),
            ack_prefix: Vec::from_slice(&[ESCAPE, b'?']).unwrap_or_default(),
            pre_data: Vec::from_slice(&[ESCAPE, b'B']).unwrap_or_default(),
            post_data: Vec::new(),
            close_sequence: Vec::new(),
            models,
            offsets: RoutingOffsets::default(),
        }
    }
}

impl DriverConfig {
    /// Resolve the display size for an identification byte
    pub fn geometry_for(&self, id: u8) -> Option<Geometry> {
        self.models
            .iter()
            .find(|model| model.id == id)
            .and_then(|model| Geometry::new(model.columns, model.rows))
    }

    /// Check the model table for unusable entries
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.iter().any(|m| m.columns == 0 || m.rows == 0) {
            return Err(ConfigError::InvalidGeometry);
        }
        Ok(())
    }

    /// Combined length of the sequences copied verbatim into frames
    pub fn verbatim_len(&self) -> usize {
        self.pre_data.len() + self.post_data.len() + self.close_sequence.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models() {
        let config = DriverConfig::default();
        assert_eq!(config.geometry_for(0), Geometry::new(20, 1));
        assert_eq!(config.geometry_for(1), Geometry::new(40, 1));
        assert_eq!(config.geometry_for(2), Geometry::new(80, 1));
        assert_eq!(config.geometry_for(3), None);
    }

    #[test]
    fn test_zero_dimension_model_unresolved() {
        let mut config = DriverConfig::default();
        config.models.clear();
        config
            .models
            .push(ModelGeometry {
                id: 7,
                columns: 0,
                rows: 1,
            })
            .unwrap();
        assert_eq!(config.geometry_for(7), None);
        assert_eq!(config.validate(), Err(ConfigError::InvalidGeometry));
    }

    #[test]
    fn test_default_sequences() {
        let config = DriverConfig::default();
        assert_eq!(config.init_sequence.as_slice(), &[0x1B, b'?']);
        assert_eq!(config.pre_data.as_slice(), &[0x1B, b'B']);
        assert!(config.close_sequence.is_empty());
        assert_eq!(config.verbatim_len(), 2);
    }

    #[test]
    fn test_sequence_too_long() {
        assert_eq!(sequence(&[0; MAX_SEQUENCE_LEN + 1]), Err(ConfigError::SequenceTooLong));
        assert!(sequence(&[]).unwrap().is_empty());
    }
}
