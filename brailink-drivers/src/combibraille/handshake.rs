//! CombiBraille identification handshake
//!
//! Each attempt writes the init sequence, then polls for the
//! acknowledgement prefix followed by one identification byte. A byte that
//! breaks the prefix ends the attempt early; running out of time ends it
//! too. Attempts repeat until one succeeds or the attempt budget is spent.

use brailink_core::config::DriverConfig;
use brailink_hal::{Clock, SerialPort};

/// Run the handshake, returning the identification byte
pub fn identify<P, C>(port: &mut P, clock: &mut C, config: &DriverConfig) -> Option<u8>
where
    P: SerialPort,
    C: Clock,
{
    let mut attempt: u32 = 0;

    loop {
        if config.max_attempts != 0 && attempt >= u32::from(config.max_attempts) {
            tracing::warn!(attempts = attempt, "display did not acknowledge");
            return None;
        }
        attempt += 1;
        tracing::debug!(attempt, "handshake attempt");

        // Leftovers from an aborted attempt must not be read as a reply
        let _ = port.discard_input();

        if !config.init_sequence.is_empty() {
            match port.write(&config.init_sequence) {
                Ok(n) if n == config.init_sequence.len() => {}
                _ => continue,
            }
        }

        if let Some(id) = await_ack(port, clock, config) {
            tracing::debug!(attempt, id, "handshake acknowledged");
            return Some(id);
        }
    }
}

/// Poll for `ack_prefix` + identification byte within the timeout window
fn await_ack<P, C>(port: &mut P, clock: &mut C, config: &DriverConfig) -> Option<u8>
where
    P: SerialPort,
    C: Clock,
{
    let prefix = config.ack_prefix.as_slice();
    let start = clock.now_ms();
    let mut matched = 0;

    loop {
        clock.delay_ms(config.poll_interval_ms);

        if let Ok(Some(byte)) = port.read_byte() {
            if matched == prefix.len() {
                return Some(byte);
            }
            if byte != prefix[matched] {
                tracing::trace!(byte, position = matched, "unexpected acknowledgement byte");
                return None;
            }
            matched += 1;
        }

        if clock.has_elapsed(start, config.ack_timeout_ms) {
            return None;
        }
    }
}
