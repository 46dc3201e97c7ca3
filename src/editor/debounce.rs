//! Single-slot debounce timer
//!
//! A session owns exactly one slot. Arming replaces whatever was pending,
//! so at most one recomputation is ever scheduled. The slot does not
//! sleep: the host reads [`DebounceSlot::deadline`] and reports time
//! passing through [`DebounceSlot::due`] or fires the ticket it was given.

use std::time::{Duration, Instant};

/// Handle to one armed timer; stale tickets never fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    ticket: TimerTicket,
    deadline: Instant,
}

#[derive(Debug)]
pub struct DebounceSlot {
    window: Duration,
    pending: Option<PendingTimer>,
    next_ticket: u64,
}

impl DebounceSlot {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Cancel any pending timer and arm a fresh one
    pub fn arm(&mut self, now: Instant) -> TimerTicket {
        let ticket = TimerTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        if let Some(previous) = self.pending.replace(PendingTimer {
            ticket,
            deadline: now + self.window,
        }) {
            tracing::trace!(previous = ?previous.ticket, current = ?ticket, "debounce re-armed");
        }
        ticket
    }

    /// Cancel the pending timer; returns whether one was pending
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Time left until the pending timer fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|d| d.saturating_duration_since(now))
    }

    /// Consume `ticket` if it is the one pending
    pub fn fire(&mut self, ticket: TimerTicket) -> bool {
        match self.pending {
            Some(p) if p.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// The pending ticket, if its deadline has passed
    pub fn due(&self, now: Instant) -> Option<TimerTicket> {
        self.pending
            .filter(|p| now >= p.deadline)
            .map(|p| p.ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    #[test]
    fn arm_then_due_after_window() {
        let t0 = Instant::now();
        let mut slot = DebounceSlot::new(WINDOW);
        let ticket = slot.arm(t0);
        assert_eq!(slot.due(t0 + Duration::from_millis(149)), None);
        assert_eq!(slot.due(t0 + WINDOW), Some(ticket));
        assert!(slot.fire(ticket));
        assert!(!slot.is_pending());
    }

    #[test]
    fn rearm_supersedes_previous_ticket() {
        let t0 = Instant::now();
        let mut slot = DebounceSlot::new(WINDOW);
        let first = slot.arm(t0);
        let second = slot.arm(t0 + Duration::from_millis(100));
        assert_ne!(first, second);
        assert!(!slot.fire(first));
        assert_eq!(slot.due(t0 + WINDOW), None);
        assert_eq!(slot.deadline(), Some(t0 + Duration::from_millis(250)));
        assert!(slot.fire(second));
    }

    #[test]
    fn cancel_prevents_firing() {
        let t0 = Instant::now();
        let mut slot = DebounceSlot::new(WINDOW);
        let ticket = slot.arm(t0);
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert_eq!(slot.due(t0 + WINDOW * 2), None);
        assert!(!slot.fire(ticket));
    }

    #[test]
    fn remaining_saturates() {
        let t0 = Instant::now();
        let mut slot = DebounceSlot::new(WINDOW);
        assert_eq!(slot.remaining(t0), None);
        slot.arm(t0);
        assert_eq!(slot.remaining(t0 + WINDOW * 3), Some(Duration::ZERO));
    }
}
