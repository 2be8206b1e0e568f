//! User preferences that the core reacts to live
//!
//! Times are in preference units of 10 ms, so a `u8` covers up to 2.55 s.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::blink::BlinkAspect;

/// Convert a preference time to milliseconds
pub const fn preferences_time_ms(time: u8) -> u32 {
    time as u32 * 10
}

/// Blink settings for one aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlinkSetting {
    /// Whether this aspect blinks at all
    pub enabled: bool,
    /// Visible phase duration (preference units)
    pub visible_time: u8,
    /// Invisible phase duration (preference units)
    pub invisible_time: u8,
}

impl BlinkSetting {
    /// Milliseconds to stay in the given phase
    pub fn phase_ms(&self, visible: bool) -> u32 {
        preferences_time_ms(if visible {
            self.visible_time
        } else {
            self.invisible_time
        })
    }
}

/// Blink preferences for every blinkable aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlinkPreferences {
    pub cursor: BlinkSetting,
    pub attributes: BlinkSetting,
    pub capitals: BlinkSetting,
    pub speech_cursor: BlinkSetting,
}

impl Default for BlinkPreferences {
    fn default() -> Self {
        Self {
            cursor: BlinkSetting {
                enabled: true,
                visible_time: 40,
                invisible_time: 40,
            },
            attributes: BlinkSetting {
                enabled: true,
                visible_time: 20,
                invisible_time: 60,
            },
            capitals: BlinkSetting {
                enabled: false,
                visible_time: 60,
                invisible_time: 20,
            },
            speech_cursor: BlinkSetting {
                enabled: false,
                visible_time: 40,
                invisible_time: 40,
            },
        }
    }
}

impl BlinkPreferences {
    /// Settings for one aspect
    pub fn setting(&self, aspect: BlinkAspect) -> &BlinkSetting {
        match aspect {
            BlinkAspect::Cursor => &self.cursor,
            BlinkAspect::Attributes => &self.attributes,
            BlinkAspect::Capitals => &self.capitals,
            BlinkAspect::SpeechCursor => &self.speech_cursor,
        }
    }

    /// Mutable settings for one aspect
    pub fn setting_mut(&mut self, aspect: BlinkAspect) -> &mut BlinkSetting {
        match aspect {
            BlinkAspect::Cursor => &mut self.cursor,
            BlinkAspect::Attributes => &mut self.attributes,
            BlinkAspect::Capitals => &mut self.capitals,
            BlinkAspect::SpeechCursor => &mut self.speech_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ms() {
        let setting = BlinkSetting {
            enabled: true,
            visible_time: 20,
            invisible_time: 60,
        };
        assert_eq!(setting.phase_ms(true), 200);
        assert_eq!(setting.phase_ms(false), 600);
        assert_eq!(preferences_time_ms(255), 2550);
    }
}
