//! Countdown timer registry.
//!
//! 256 independently addressable periodic timers, ticked once per frame with
//! the frame's elapsed time. A slot that runs out fires once and re-arms for
//! its period, carrying the overshoot forward. There is deliberately no
//! catch-up: however far a frame overruns, a slot fires at most once per
//! tick, so a long stall produces one late callback instead of a burst.

/// Timer slot id, 0-255.
pub type TimerId = u8;

pub const TIMER_SLOTS: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    active: bool,
    remaining: f32,
    period: f32,
}

/// Fixed table of countdown timers owned by the frame loop.
pub struct TimerBank {
    slots: [Slot; TIMER_SLOTS],
}

impl TimerBank {
    pub fn new() -> Self {
        Self {
            slots: [Slot::default(); TIMER_SLOTS],
        }
    }

    /// Arm slot `id` to fire every `duration` seconds. Re-arming an active
    /// slot restarts its countdown from the new duration.
    pub fn start(&mut self, id: TimerId, duration: f32) {
        let slot = &mut self.slots[id as usize];
        slot.active = true;
        slot.period = duration;
        slot.remaining = duration;
    }

    /// Disarm slot `id`. No effect if it was not running.
    pub fn stop(&mut self, id: TimerId) {
        self.slots[id as usize].active = false;
    }

    /// Whether slot `id` is armed.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.slots[id as usize].active
    }

    /// Seconds until slot `id` next fires, or None if it is not armed.
    pub fn remaining(&self, id: TimerId) -> Option<f32> {
        let slot = self.slots[id as usize];
        slot.active.then_some(slot.remaining)
    }

    /// Advance every active slot by `elapsed` seconds, appending the ids of
    /// slots that expired to `fired` (at most once per slot). Expired slots
    /// re-arm with their period minus the overshoot.
    pub fn tick(&mut self, elapsed: f32, fired: &mut Vec<TimerId>) {
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if !slot.active {
                continue;
            }
            slot.remaining -= elapsed;
            if slot.remaining <= 0.0 {
                slot.remaining += slot.period;
                fired.push(id as TimerId);
            }
        }
    }
}

impl Default for TimerBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(bank: &mut TimerBank, elapsed: f32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        bank.tick(elapsed, &mut fired);
        fired
    }

    #[test]
    fn test_fires_once_with_overshoot_carry() {
        let mut bank = TimerBank::new();
        bank.start(5, 2.0);

        assert!(tick(&mut bank, 0.8).is_empty());
        assert!(tick(&mut bank, 0.8).is_empty());
        // Cumulative 2.4s: one firing, not two, and the 0.4s overshoot
        // shortens the next interval.
        assert_eq!(tick(&mut bank, 0.8), vec![5]);
        let remaining = bank.remaining(5).unwrap();
        assert!((remaining - 1.6).abs() < 1e-5, "remaining = {remaining}");
    }

    #[test]
    fn test_no_catch_up_under_lag() {
        let mut bank = TimerBank::new();
        bank.start(0, 0.5);
        // A 2.1s stall covers four periods but fires only once.
        assert_eq!(tick(&mut bank, 2.1), vec![0]);
    }

    #[test]
    fn test_auto_repeat_until_stopped() {
        let mut bank = TimerBank::new();
        bank.start(9, 1.0);
        assert_eq!(tick(&mut bank, 1.0), vec![9]);
        assert_eq!(tick(&mut bank, 1.0), vec![9]);
        bank.stop(9);
        assert!(tick(&mut bank, 1.0).is_empty());
        assert!(!bank.is_active(9));
    }

    #[test]
    fn test_restart_resets_countdown() {
        let mut bank = TimerBank::new();
        bank.start(3, 1.0);
        assert!(tick(&mut bank, 0.9).is_empty());
        bank.start(3, 1.0);
        // The earlier 0.9s no longer counts.
        assert!(tick(&mut bank, 0.9).is_empty());
        assert_eq!(tick(&mut bank, 0.2), vec![3]);
    }

    #[test]
    fn test_stop_inactive_is_harmless() {
        let mut bank = TimerBank::new();
        bank.stop(200);
        assert!(bank.remaining(200).is_none());
    }

    #[test]
    fn test_independent_slots() {
        let mut bank = TimerBank::new();
        bank.start(1, 1.0);
        bank.start(2, 2.0);
        assert_eq!(tick(&mut bank, 1.0), vec![1]);
        assert_eq!(tick(&mut bank, 1.0), vec![1, 2]);
    }
}
