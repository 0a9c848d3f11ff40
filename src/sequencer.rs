//! Tone playback state machine.
//!
//! Pure logic, no hardware dependencies. Consumes queued samples, drives the
//! frequency driver. Fully testable on host.
//!
//! Invoked at a fixed 1 kHz cadence by an external periodic caller; the
//! driver does not compensate tick jitter. Two logical phases per sample:
//! SOUNDING while `elapsed < duration`, then the transition step that disarms
//! and immediately pulls the next sample. There is no timed gap between
//! notes; a producer that wants one enqueues an explicit rest.

use crate::freq::FrequencyDriver;
use crate::hal::PulseTimer;
use crate::queue::SampleQueue;

/// Cadence the tick interface must be driven at.
pub const TICK_HZ: u32 = 1_000;

/// Millisecond-resolution playback sequencer.
///
/// Idle state is `duration == 0` with the frequency driver disarmed; the
/// queue being empty is normal, not an error.
pub struct ToneSequencer {
    /// Milliseconds since the current sample began sounding.
    elapsed_ms: u16,

    /// Duration of the sample currently sounding, 0 when idle.
    duration_ms: u16,
}

impl ToneSequencer {
    /// Create an idle sequencer.
    pub const fn new() -> Self {
        Self {
            elapsed_ms: 0,
            duration_ms: 0,
        }
    }

    /// Advance playback by one millisecond tick.
    ///
    /// While the current sample still has time left this only bumps the
    /// elapsed counter. Once the duration has elapsed the driver is disarmed
    /// and, if the queue holds another sample, it starts sounding on this
    /// same tick, re-arming for its frequency (a rest keeps the driver
    /// disarmed). With the queue drained the sequencer parks in the idle
    /// state until a later admission.
    ///
    /// # Timing
    ///
    /// O(1), never blocks, never allocates.
    pub fn tick<T: PulseTimer, const N: usize>(
        &mut self,
        queue: &SampleQueue<N>,
        driver: &mut FrequencyDriver<'_, T>,
    ) {
        if self.elapsed_ms < self.duration_ms {
            // Still sounding the current sample.
            self.elapsed_ms += 1;
            return;
        }

        driver.disarm();

        match queue.pop() {
            Some(sample) => {
                driver.arm(sample.freq_hz);
                self.duration_ms = sample.duration_ms;
                self.elapsed_ms = 0;
            }
            None => {
                self.duration_ms = 0;
                self.elapsed_ms = 0;
            }
        }
    }

    /// Whether the sequencer is parked with nothing sounding.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.duration_ms == 0
    }

    /// Milliseconds into the current sample.
    #[inline]
    pub fn elapsed_ms(&self) -> u16 {
        self.elapsed_ms
    }

    /// Duration of the current sample, 0 when idle.
    #[inline]
    pub fn duration_ms(&self) -> u16 {
        self.duration_ms
    }

    /// Drop the current sample's progress and return to idle.
    ///
    /// Does not touch the queue or the frequency driver.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.duration_ms = 0;
    }
}

impl Default for ToneSequencer {
    fn default() -> Self {
        Self::new()
    }
}
