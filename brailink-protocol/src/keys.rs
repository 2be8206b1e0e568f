//! Key input decoding
//!
//! The display reports keys as short escape sequences. The decoder is fed
//! one byte at a time and keeps its partial state between calls, so a
//! sequence split across several reads still decodes.

use crate::frame::ESCAPE;

/// Marker for ordinary key sequences
pub const MARKER_KEY: u8 = b'K';

/// Marker for cursor routing key sequences
pub const MARKER_ROUTING: u8 = b'C';

/// Bit added to routing key codes
const ROUTING_FLAG: u8 = 0x80;

/// Bits added to the modifier byte of an extended key sequence
const EXTENDED_FLAG: u8 = 0x60;

/// Raw key code as produced by the decoder, before command translation
pub type RawKey = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for ESC
    Idle,
    /// Got ESC, waiting for a marker
    SawEscape,
    /// Got ESC and a marker, waiting for the code
    SawMarker(u8),
    /// Got `ESC 'K' 0x00`, waiting for the modifier byte
    AwaitModifier,
}

/// State machine for parsing incoming key sequences
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    state: DecodeState,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    /// Create a decoder waiting for the start of a sequence
    pub fn new() -> Self {
        Self {
            state: DecodeState::Idle,
        }
    }

    /// Drop any partially received sequence
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
    }

    /// True when no sequence is in progress
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Idle
    }

    /// Number of bytes of the current sequence received so far
    pub fn pending(&self) -> usize {
        match self.state {
            DecodeState::Idle => 0,
            DecodeState::SawEscape => 1,
            DecodeState::SawMarker(_) => 2,
            DecodeState::AwaitModifier => 3,
        }
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Some(key)` when the byte completes a sequence. Bytes that
    /// cannot start or continue a sequence are discarded.
    pub fn feed(&mut self, byte: u8) -> Option<RawKey> {
        match self.state {
            DecodeState::Idle => {
                if byte == ESCAPE {
                    self.state = DecodeState::SawEscape;
                }
                None
            }
            DecodeState::SawEscape => {
                self.state = match byte {
                    MARKER_KEY | MARKER_ROUTING => DecodeState::SawMarker(byte),
                    // The offending byte is dropped, not rescanned
                    _ => DecodeState::Idle,
                };
                None
            }
            DecodeState::SawMarker(MARKER_ROUTING) => {
                self.state = DecodeState::Idle;
                Some(byte | ROUTING_FLAG)
            }
            DecodeState::SawMarker(_) => {
                if byte == 0 {
                    self.state = DecodeState::AwaitModifier;
                    return None;
                }
                self.state = DecodeState::Idle;
                Some(byte)
            }
            DecodeState::AwaitModifier => {
                self.state = DecodeState::Idle;
                Some(byte | EXTENDED_FLAG)
            }
        }
    }

    /// Feed bytes until one completes a key
    ///
    /// Returns the key and the number of bytes consumed. Bytes after the
    /// completing one are left for the next call.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Option<RawKey>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(key) = self.feed(byte) {
                return (Some(key), i + 1);
            }
        }
        (None, bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(bytes: &[u8]) -> Option<RawKey> {
        KeyDecoder::new().feed_bytes(bytes).0
    }

    #[test]
    fn test_routing_key() {
        assert_eq!(decode(&[ESCAPE, b'C', 0x05]), Some(0x85));
    }

    #[test]
    fn test_plain_key() {
        assert_eq!(decode(&[ESCAPE, b'K', 0x07]), Some(0x07));
    }

    #[test]
    fn test_extended_key() {
        assert_eq!(decode(&[ESCAPE, b'K', 0x00, 0x03]), Some(0x63));
    }

    #[test]
    fn test_partial_sequence_survives_between_calls() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed_bytes(&[ESCAPE, b'K']), (None, 2));
        assert_eq!(decoder.pending(), 2);
        assert_eq!(decoder.feed_bytes(&[0x00]), (None, 1));
        assert_eq!(decoder.pending(), 3);
        assert_eq!(decoder.feed_bytes(&[0x03]), (Some(0x63), 1));
        assert!(decoder.is_idle());
    }

    #[test]
    fn test_bad_marker_resyncs() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed_bytes(&[ESCAPE, b'X']), (None, 2));
        assert!(decoder.is_idle());
        assert_eq!(decoder.feed_bytes(&[ESCAPE, b'K', 0x07]), (Some(0x07), 3));
    }

    #[test]
    fn test_second_escape_is_not_rescanned() {
        // ESC ESC K 7: the second ESC is the bad marker and gets dropped,
        // so 'K' and 0x07 arrive while idle and are noise.
        assert_eq!(decode(&[ESCAPE, ESCAPE, b'K', 0x07]), None);
    }

    #[test]
    fn test_noise_while_idle() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed_bytes(&[b'K', 0x07, b'C', 0x00]), (None, 4));
        assert!(decoder.is_idle());
    }

    #[test]
    fn test_escape_is_a_valid_code() {
        assert_eq!(decode(&[ESCAPE, b'K', ESCAPE]), Some(ESCAPE));
        assert_eq!(decode(&[ESCAPE, b'C', ESCAPE]), Some(ESCAPE | 0x80));
    }

    #[test]
    fn test_leftover_bytes_not_consumed() {
        let mut decoder = KeyDecoder::new();
        let bytes = [ESCAPE, b'C', 0x01, ESCAPE, b'C', 0x02];
        let (key, used) = decoder.feed_bytes(&bytes);
        assert_eq!(key, Some(0x81));
        assert_eq!(used, 3);
        assert_eq!(decoder.feed_bytes(&bytes[used..]), (Some(0x82), 3));
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut decoder = KeyDecoder::new();
        decoder.feed(ESCAPE);
        decoder.reset();
        assert_eq!(decoder.feed(b'K'), None);
        assert!(decoder.is_idle());
    }

    proptest! {
        #[test]
        fn prop_resyncs_after_noise(
            noise in proptest::collection::vec(any::<u8>().prop_filter("no ESC", |b| *b != ESCAPE), 0..32),
            code in 1u8..=255,
        ) {
            let mut decoder = KeyDecoder::new();
            let (key, _) = decoder.feed_bytes(&noise);
            prop_assert_eq!(key, None);
            prop_assert!(decoder.is_idle());
            prop_assert_eq!(decoder.feed_bytes(&[ESCAPE, b'K', code]).0, Some(code));
        }

        #[test]
        fn prop_routing_codes_have_high_bit(code in any::<u8>()) {
            prop_assert_eq!(decode(&[ESCAPE, b'C', code]), Some(code | 0x80));
        }
    }
}
