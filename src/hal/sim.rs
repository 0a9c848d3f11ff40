//! Simulated timer and pin for host-side tests.
//!
//! Record every interaction so tests can assert on the programmed interval,
//! armed state and toggle activity without real hardware.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::{PulseTimer, TogglePin};

/// Simulated periodic timer.
///
/// Captures the last programmed half-period and counts counter resets and
/// pending-flag clears.
pub struct SimTimer {
    half_period_us: AtomicU32,
    armed: AtomicBool,
    counter_resets: AtomicU32,
    pending_clears: AtomicU32,
}

impl SimTimer {
    pub const fn new() -> Self {
        Self {
            half_period_us: AtomicU32::new(0),
            armed: AtomicBool::new(false),
            counter_resets: AtomicU32::new(0),
            pending_clears: AtomicU32::new(0),
        }
    }

    /// Last half-period programmed via [`PulseTimer::set_half_period`].
    pub fn half_period_us(&self) -> u32 {
        self.half_period_us.load(Ordering::Relaxed)
    }

    /// Whether the toggle interrupt is currently enabled.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Relaxed)
    }

    /// How many times the counter was reset.
    pub fn counter_resets(&self) -> u32 {
        self.counter_resets.load(Ordering::Relaxed)
    }

    /// How many times the pending condition was acknowledged.
    pub fn pending_clears(&self) -> u32 {
        self.pending_clears.load(Ordering::Relaxed)
    }
}

impl PulseTimer for SimTimer {
    fn set_half_period(&self, us: u32) {
        self.half_period_us.store(us, Ordering::Relaxed);
    }

    fn reset_counter(&self) {
        self.counter_resets.fetch_add(1, Ordering::Relaxed);
    }

    fn enable_irq(&self) {
        self.armed.store(true, Ordering::Relaxed);
    }

    fn disable_irq(&self) {
        self.armed.store(false, Ordering::Relaxed);
    }

    fn clear_pending(&self) {
        self.pending_clears.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for SimTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulated output pin tracking its level and total toggle count.
pub struct SimPin {
    level: AtomicBool,
    toggles: AtomicU32,
}

impl SimPin {
    pub const fn new() -> Self {
        Self {
            level: AtomicBool::new(false),
            toggles: AtomicU32::new(0),
        }
    }

    /// Current logic level.
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }

    /// Total number of toggles since creation.
    pub fn toggles(&self) -> u32 {
        self.toggles.load(Ordering::Relaxed)
    }
}

impl TogglePin for SimPin {
    fn toggle(&self) {
        self.level.fetch_xor(true, Ordering::Relaxed);
        self.toggles.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for SimPin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_timer_records_programming() {
        let timer = SimTimer::new();
        assert!(!timer.is_armed());

        timer.set_half_period(1136);
        timer.reset_counter();
        timer.enable_irq();

        assert!(timer.is_armed());
        assert_eq!(timer.half_period_us(), 1136);
        assert_eq!(timer.counter_resets(), 1);

        timer.disable_irq();
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_sim_pin_toggles() {
        let pin = SimPin::new();
        assert!(!pin.level());

        pin.toggle();
        assert!(pin.level());
        pin.toggle();
        assert!(!pin.level());
        assert_eq!(pin.toggles(), 2);
    }
}
