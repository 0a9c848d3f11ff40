//! Frequency to toggle-interval translation.
//!
//! Arms the periodic toggle interrupt for a target tone, or disarms it for
//! silence. The pin must flip twice per wave cycle, so the programmed
//! interval is half the tone period.

use crate::hal::PulseTimer;

/// Highest tone the driver will program. Requests above this are clamped so
/// a pathological payload cannot saturate the interrupt subsystem.
pub const MAX_TONE_HZ: u16 = 10_000;

/// Half of one second in microseconds: two toggles per wave cycle.
const HALF_CYCLE_US: u32 = 500_000;

/// Compute the toggle interval for a (pre-clamp) frequency.
#[inline]
pub fn half_period_us(freq_hz: u16) -> u32 {
    HALF_CYCLE_US / freq_hz.min(MAX_TONE_HZ) as u32
}

/// Translates tone frequencies into timer programming.
///
/// Holds the armed/disarmed state that, together with the sequencer's
/// counters, encodes what is currently sounding. `arm` is idempotent: calling
/// it again simply reprograms the interval.
pub struct FrequencyDriver<'a, T: PulseTimer> {
    timer: &'a T,
    armed: bool,
}

impl<'a, T: PulseTimer> FrequencyDriver<'a, T> {
    /// Create a driver over a (shared) hardware timer.
    pub fn new(timer: &'a T) -> Self {
        Self {
            timer,
            armed: false,
        }
    }

    /// Arm the toggle interrupt for `freq_hz`, or disarm for zero.
    ///
    /// Frequencies above [`MAX_TONE_HZ`] are silently clamped rather than
    /// rejected.
    pub fn arm(&mut self, freq_hz: u16) {
        if freq_hz == 0 {
            // Zero frequency is silence: stop toggling, pin holds its level.
            self.disarm();
            return;
        }

        self.timer.clear_pending();
        self.timer.set_half_period(half_period_us(freq_hz));
        self.timer.reset_counter();
        self.timer.enable_irq();
        self.armed = true;
    }

    /// Disable the toggle interrupt. The pin keeps its last level.
    pub fn disarm(&mut self) {
        self.timer.disable_irq();
        self.armed = false;
    }

    /// Whether the toggle interrupt is currently armed.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
