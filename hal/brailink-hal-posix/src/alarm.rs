//! Alarm queue for a single-threaded poll loop
//!
//! Alarms are kept in a small vector and fired in deadline order; alarms
//! with equal deadlines fire in the order they were (re)scheduled. The
//! owning loop calls [`AlarmQueue::pop_expired`] until it returns `None`.

use brailink_hal::{AlarmHandle, AlarmScheduler, Clock};

struct Pending<T> {
    deadline: u64,
    seq: u64,
    id: u32,
    payload: T,
}

/// One-shot alarms timed by a [`Clock`]
pub struct AlarmQueue<T, C: Clock> {
    clock: C,
    pending: Vec<Pending<T>>,
    next_id: u32,
    next_seq: u64,
}

impl<T, C: Clock> AlarmQueue<T, C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            pending: Vec::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Clock the queue measures deadlines against
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline, in clock milliseconds
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Milliseconds until the earliest alarm is due, zero if overdue
    pub fn time_to_next(&self) -> Option<u64> {
        let now = self.clock.now_ms();
        self.next_deadline().map(|d| d.saturating_sub(now))
    }

    /// Remove and return the payload of the earliest expired alarm
    pub fn pop_expired(&mut self) -> Option<T> {
        let now = self.clock.now_ms();
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= now)
            .min_by_key(|(_, p)| (p.deadline, p.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(index).payload)
    }

    fn deadline_in(&self, delay_ms: u32) -> u64 {
        self.clock.now_ms().saturating_add(u64::from(delay_ms))
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<T, C: Clock> AlarmScheduler<T> for AlarmQueue<T, C> {
    fn set_alarm_in(&mut self, delay_ms: u32, payload: T) -> AlarmHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let deadline = self.deadline_in(delay_ms);
        let seq = self.take_seq();
        self.pending.push(Pending {
            deadline,
            seq,
            id,
            payload,
        });
        AlarmHandle::new(id)
    }

    fn reset_alarm_in(&mut self, handle: &AlarmHandle, delay_ms: u32) {
        let deadline = self.deadline_in(delay_ms);
        let seq = self.take_seq();
        match self.pending.iter_mut().find(|p| p.id == handle.id()) {
            Some(pending) => {
                pending.deadline = deadline;
                pending.seq = seq;
            }
            None => tracing::debug!(id = handle.id(), "reset of an alarm that is not pending"),
        }
    }

    fn cancel(&mut self, handle: AlarmHandle) {
        self.pending.retain(|p| p.id != handle.id());
    }
}
