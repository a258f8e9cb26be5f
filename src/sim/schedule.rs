//! Delayed actions tied to a phase token
//!
//! A task only fires if the phase it was scheduled in is still current, so a
//! restart or a second impact can never trigger two "next level" loads.

use serde::{Deserialize, Serialize};

/// Counter bumped on every phase change
pub type PhaseToken = u64;

/// What to do when a scheduled task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Leave the explosion and load the next problem
    NextLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub token: PhaseToken,
    pub due_tick: u64,
    pub action: ScheduledAction,
}

/// Holds at most one pending task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Option<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run `delay_ticks` after `now`. Replaces any pending task.
    pub fn schedule(
        &mut self,
        token: PhaseToken,
        now: u64,
        delay_ticks: u64,
        action: ScheduledAction,
    ) {
        if let Some(old) = self.pending {
            log::debug!("Replacing pending {:?} (token {})", old.action, old.token);
        }
        self.pending = Some(ScheduledTask {
            token,
            due_tick: now + delay_ticks,
            action,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            log::debug!("Cancelled {:?} (token {})", task.action, task.token);
        }
    }

    pub fn pending(&self) -> Option<&ScheduledTask> {
        self.pending.as_ref()
    }

    /// Take the pending action if it is due and still belongs to `current`.
    /// A task from an older phase is dropped.
    pub fn poll(&mut self, now: u64, current: PhaseToken) -> Option<ScheduledAction> {
        let task = self.pending?;
        if task.token != current {
            log::debug!(
                "Dropping stale {:?} (token {}, current {})",
                task.action,
                task.token,
                current
            );
            self.pending = None;
            return None;
        }
        if now < task.due_tick {
            return None;
        }
        self.pending = None;
        Some(task.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, 10, 5, ScheduledAction::NextLevel);

        assert_eq!(scheduler.poll(14, 3), None);
        assert!(scheduler.pending().is_some());
        assert_eq!(scheduler.poll(15, 3), Some(ScheduledAction::NextLevel));
        assert!(scheduler.pending().is_none());
        // Fires only once
        assert_eq!(scheduler.poll(16, 3), None);
    }

    #[test]
    fn test_stale_token_is_dropped() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, 0, 1, ScheduledAction::NextLevel);

        assert_eq!(scheduler.poll(100, 4), None);
        assert!(scheduler.pending().is_none());
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0, 10, ScheduledAction::NextLevel);
        scheduler.schedule(2, 5, 10, ScheduledAction::NextLevel);

        assert_eq!(scheduler.pending().map(|t| t.due_tick), Some(15));
        assert_eq!(scheduler.poll(10, 1), None);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 0, 1, ScheduledAction::NextLevel);
        scheduler.cancel();
        assert_eq!(scheduler.poll(10, 1), None);
    }
}
