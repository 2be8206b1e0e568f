//! One-shot alarm scheduling
//!
//! The scheduler delivers alarms on the same execution context as every
//! other driver call, in deadline order. Nothing here is thread-safe and
//! nothing needs to be.
//!
//! An alarm carries a payload of type `T`; when it fires the scheduler
//! hands the payload back to the dispatch loop, which routes it to the
//! owner. Firing consumes the alarm, so the owner must forget its handle.

/// Identifies a pending alarm
///
/// Deliberately neither `Copy` nor `Clone`: exactly one owner may cancel
/// or reschedule an alarm.
#[derive(Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmHandle(u32);

impl AlarmHandle {
    /// Wrap a scheduler-assigned identifier
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Scheduler-assigned identifier
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// Single-threaded one-shot alarm scheduler
pub trait AlarmScheduler<T> {
    /// Schedule `payload` to be delivered after `delay_ms`
    fn set_alarm_in(&mut self, delay_ms: u32, payload: T) -> AlarmHandle;

    /// Move a pending alarm to fire `delay_ms` from now
    fn reset_alarm_in(&mut self, handle: &AlarmHandle, delay_ms: u32);

    /// Cancel a pending alarm
    ///
    /// Takes effect before returning: the payload is never delivered.
    fn cancel(&mut self, handle: AlarmHandle);
}
