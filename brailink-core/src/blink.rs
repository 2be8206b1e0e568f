//! Timed visibility toggling
//!
//! Each blinkable aspect (cursor, attributes, capitals, speech cursor) has a
//! descriptor that flips between visible and invisible on alarms from the
//! scheduler. The screen layer asks [`Blinkers::is_visible`] when composing
//! the next frame; nothing here touches the display.
//!
//! Preferences are passed in on every call rather than captured, so a
//! change to them takes effect on the next transition.

use brailink_hal::{AlarmHandle, AlarmScheduler};

use crate::config::BlinkPreferences;

/// Something on the display that can blink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkAspect {
    Cursor,
    Attributes,
    Capitals,
    SpeechCursor,
}

impl BlinkAspect {
    /// Every aspect, in descriptor order
    pub const ALL: [BlinkAspect; 4] = [
        BlinkAspect::Cursor,
        BlinkAspect::Attributes,
        BlinkAspect::Capitals,
        BlinkAspect::SpeechCursor,
    ];

    /// Visibility after a reset
    pub const fn initial_state(self) -> bool {
        matches!(self, BlinkAspect::Capitals)
    }

    const fn index(self) -> usize {
        match self {
            BlinkAspect::Cursor => 0,
            BlinkAspect::Attributes => 1,
            BlinkAspect::Capitals => 2,
            BlinkAspect::SpeechCursor => 3,
        }
    }
}

/// Blink state for one aspect
#[derive(Debug)]
pub struct BlinkDescriptor {
    aspect: BlinkAspect,
    visible: bool,
    alarm: Option<AlarmHandle>,
}

impl BlinkDescriptor {
    /// Create a descriptor in its initial state with no alarm pending
    pub fn new(aspect: BlinkAspect) -> Self {
        Self {
            aspect,
            visible: aspect.initial_state(),
            alarm: None,
        }
    }

    /// Aspect this descriptor controls
    pub fn aspect(&self) -> BlinkAspect {
        self.aspect
    }

    /// Whether blinking is currently enabled for this aspect
    pub fn is_enabled(&self, prefs: &BlinkPreferences) -> bool {
        prefs.setting(self.aspect).enabled
    }

    /// Whether the aspect should be drawn
    ///
    /// Always true while blinking is disabled.
    pub fn is_visible(&self, prefs: &BlinkPreferences) -> bool {
        !self.is_enabled(prefs) || self.visible
    }

    /// True while an alarm is pending
    pub fn is_scheduled(&self) -> bool {
        self.alarm.is_some()
    }

    /// Enter a phase and schedule the next flip
    ///
    /// With blinking disabled any pending alarm is cancelled and the
    /// descriptor stays put.
    pub fn set_state<S>(&mut self, visible: bool, prefs: &BlinkPreferences, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        self.visible = visible;

        if self.is_enabled(prefs) {
            let delay_ms = prefs.setting(self.aspect).phase_ms(visible);
            match &self.alarm {
                Some(handle) => alarms.reset_alarm_in(handle, delay_ms),
                None => self.alarm = Some(alarms.set_alarm_in(delay_ms, self.aspect)),
            }
        } else if let Some(handle) = self.alarm.take() {
            alarms.cancel(handle);
        }
    }

    /// Return to the initial state
    pub fn reset<S>(&mut self, prefs: &BlinkPreferences, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        self.set_state(self.aspect.initial_state(), prefs, alarms);
    }

    /// The pending alarm fired: flip to the other phase
    pub fn handle_alarm<S>(&mut self, prefs: &BlinkPreferences, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        // A delivered alarm is gone; its handle must not be reused
        self.alarm = None;
        self.set_state(!self.visible, prefs, alarms);
    }
}

/// The process-wide set of blink descriptors
#[derive(Debug)]
pub struct Blinkers {
    descriptors: [BlinkDescriptor; 4],
}

impl Default for Blinkers {
    fn default() -> Self {
        Self::new()
    }
}

impl Blinkers {
    /// One descriptor per aspect, none scheduled
    pub fn new() -> Self {
        Self {
            descriptors: BlinkAspect::ALL.map(BlinkDescriptor::new),
        }
    }

    /// Descriptor for one aspect
    pub fn get(&self, aspect: BlinkAspect) -> &BlinkDescriptor {
        &self.descriptors[aspect.index()]
    }

    /// Mutable descriptor for one aspect
    pub fn get_mut(&mut self, aspect: BlinkAspect) -> &mut BlinkDescriptor {
        &mut self.descriptors[aspect.index()]
    }

    /// Whether an aspect should be drawn
    pub fn is_visible(&self, aspect: BlinkAspect, prefs: &BlinkPreferences) -> bool {
        self.get(aspect).is_visible(prefs)
    }

    /// Reset every descriptor, e.g. after preferences were reloaded
    pub fn reset_all<S>(&mut self, prefs: &BlinkPreferences, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        for descriptor in &mut self.descriptors {
            descriptor.reset(prefs, alarms);
        }
    }

    /// Route a delivered alarm to its descriptor
    pub fn handle_alarm<S>(&mut self, aspect: BlinkAspect, prefs: &BlinkPreferences, alarms: &mut S)
    where
        S: AlarmScheduler<BlinkAspect>,
    {
        let descriptor = self.get_mut(aspect);
        descriptor.handle_alarm(prefs, alarms);
        tracing::trace!(?aspect, visible = descriptor.visible, "blink");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Set(u32, u32, BlinkAspect),
        Reset(u32, u32),
        Cancel(u32),
    }

    #[derive(Default)]
    struct MockScheduler {
        next_id: u32,
        calls: Vec<Call>,
        pending: Vec<u32>,
    }

    impl AlarmScheduler<BlinkAspect> for MockScheduler {
        fn set_alarm_in(&mut self, delay_ms: u32, payload: BlinkAspect) -> AlarmHandle {
            self.next_id += 1;
            self.calls.push(Call::Set(self.next_id, delay_ms, payload));
            self.pending.push(self.next_id);
            AlarmHandle::new(self.next_id)
        }

        fn reset_alarm_in(&mut self, handle: &AlarmHandle, delay_ms: u32) {
            assert!(self.pending.contains(&handle.id()), "reset of dead alarm");
            self.calls.push(Call::Reset(handle.id(), delay_ms));
        }

        fn cancel(&mut self, handle: AlarmHandle) {
            assert!(self.pending.contains(&handle.id()), "cancel of dead alarm");
            self.pending.retain(|&id| id != handle.id());
            self.calls.push(Call::Cancel(handle.id()));
        }
    }

    impl MockScheduler {
        /// Deliver the alarm with `id`, as the real scheduler would
        fn fire(&mut self, id: u32) {
            self.pending.retain(|&p| p != id);
        }
    }

    fn cursor_prefs(enabled: bool) -> BlinkPreferences {
        let mut prefs = BlinkPreferences::default();
        prefs.cursor.enabled = enabled;
        prefs.cursor.visible_time = 30;
        prefs.cursor.invisible_time = 70;
        prefs
    }

    #[test]
    fn test_visible_schedules_visible_duration() {
        let prefs = cursor_prefs(true);
        let mut alarms = MockScheduler::default();
        let mut blink = BlinkDescriptor::new(BlinkAspect::Cursor);

        blink.set_state(true, &prefs, &mut alarms);

        assert_eq!(alarms.calls, vec![Call::Set(1, 300, BlinkAspect::Cursor)]);
        assert!(blink.is_visible(&prefs));
        assert!(blink.is_scheduled());
    }

    #[test]
    fn test_reschedule_reuses_pending_alarm() {
        let prefs = cursor_prefs(true);
        let mut alarms = MockScheduler::default();
        let mut blink = BlinkDescriptor::new(BlinkAspect::Cursor);

        blink.set_state(true, &prefs, &mut alarms);
        blink.set_state(false, &prefs, &mut alarms);

        assert_eq!(alarms.calls[1], Call::Reset(1, 700));
        assert!(!blink.is_visible(&prefs));
    }

    #[test]
    fn test_alarm_flips_and_reschedules() {
        let prefs = cursor_prefs(true);
        let mut alarms = MockScheduler::default();
        let mut blink = BlinkDescriptor::new(BlinkAspect::Cursor);

        blink.set_state(true, &prefs, &mut alarms);
        alarms.fire(1);
        blink.handle_alarm(&prefs, &mut alarms);

        assert!(!blink.is_visible(&prefs));
        assert_eq!(alarms.calls[1], Call::Set(2, 700, BlinkAspect::Cursor));

        alarms.fire(2);
        blink.handle_alarm(&prefs, &mut alarms);
        assert!(blink.is_visible(&prefs));
        assert_eq!(alarms.calls[2], Call::Set(3, 300, BlinkAspect::Cursor));
    }

    #[test]
    fn test_disable_cancels_and_reports_visible() {
        let mut prefs = cursor_prefs(true);
        let mut alarms = MockScheduler::default();
        let mut blink = BlinkDescriptor::new(BlinkAspect::Cursor);

        blink.set_state(false, &prefs, &mut alarms);
        assert!(!blink.is_visible(&prefs));

        prefs.cursor.enabled = false;
        // Visible regardless of the internal bit
        assert!(blink.is_visible(&prefs));

        blink.set_state(false, &prefs, &mut alarms);
        assert_eq!(alarms.calls.last(), Some(&Call::Cancel(1)));
        assert!(!blink.is_scheduled());
        assert!(alarms.pending.is_empty());
        assert!(blink.is_visible(&prefs));
    }

    #[test]
    fn test_alarm_after_disable_leaves_no_alarm() {
        let mut prefs = cursor_prefs(true);
        let mut alarms = MockScheduler::default();
        let mut blink = BlinkDescriptor::new(BlinkAspect::Cursor);

        blink.set_state(true, &prefs, &mut alarms);
        prefs.cursor.enabled = false;
        alarms.fire(1);
        blink.handle_alarm(&prefs, &mut alarms);

        assert!(!blink.is_scheduled());
        assert_eq!(alarms.calls.len(), 1);
    }

    #[test]
    fn test_disabled_never_schedules() {
        let prefs = cursor_prefs(false);
        let mut alarms = MockScheduler::default();
        let mut blink = BlinkDescriptor::new(BlinkAspect::Cursor);

        blink.set_state(true, &prefs, &mut alarms);
        blink.reset(&prefs, &mut alarms);

        assert!(alarms.calls.is_empty());
        assert!(blink.is_visible(&prefs));
    }

    #[test]
    fn test_reset_all_initial_states() {
        let mut prefs = BlinkPreferences::default();
        for aspect in BlinkAspect::ALL {
            prefs.setting_mut(aspect).enabled = true;
        }
        let mut alarms = MockScheduler::default();
        let mut blinkers = Blinkers::new();

        blinkers.reset_all(&prefs, &mut alarms);

        assert!(!blinkers.is_visible(BlinkAspect::Cursor, &prefs));
        assert!(!blinkers.is_visible(BlinkAspect::Attributes, &prefs));
        assert!(blinkers.is_visible(BlinkAspect::Capitals, &prefs));
        assert!(!blinkers.is_visible(BlinkAspect::SpeechCursor, &prefs));
        assert_eq!(alarms.pending.len(), 4);
        // Capitals start visible, so they wait out the visible time
        assert!(alarms
            .calls
            .contains(&Call::Set(3, 600, BlinkAspect::Capitals)));
    }

    #[test]
    fn test_blinkers_route_alarm() {
        let prefs = cursor_prefs(true);
        let mut alarms = MockScheduler::default();
        let mut blinkers = Blinkers::new();

        blinkers.reset_all(&prefs, &mut alarms);
        // cursor (1) and attributes (2) are enabled by these prefs
        assert_eq!(alarms.pending, vec![1, 2]);

        alarms.fire(1);
        blinkers.handle_alarm(BlinkAspect::Cursor, &prefs, &mut alarms);
        assert!(blinkers.is_visible(BlinkAspect::Cursor, &prefs));
        assert!(!blinkers.is_visible(BlinkAspect::Attributes, &prefs));
    }
}
