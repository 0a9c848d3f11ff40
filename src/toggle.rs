//! Interrupt-context pin toggle.
//!
//! The only work done in interrupt context: flip the output pin, acknowledge
//! the interrupt. Two toggles per programmed interval pair make one square
//! wave cycle. The handler never touches queue or sequencer state.

use crate::hal::{PulseTimer, TogglePin};

/// The toggle interrupt routine, bound to its pin and timer.
pub struct ToggleHandler<'a, P: TogglePin, T: PulseTimer> {
    pin: &'a P,
    timer: &'a T,
}

impl<'a, P: TogglePin, T: PulseTimer> ToggleHandler<'a, P, T> {
    pub const fn new(pin: &'a P, timer: &'a T) -> Self {
        Self { pin, timer }
    }

    /// Service one toggle interrupt.
    ///
    /// # Timing
    ///
    /// Runs at up to 2 × [`crate::freq::MAX_TONE_HZ`] per second and may
    /// preempt both the admission and the tick path. O(1), no other state
    /// access.
    #[inline]
    pub fn on_interrupt(&self) {
        self.pin.toggle();
        self.timer.clear_pending();
    }
}
