//! Hardware Abstraction Layer for the piezo driver.
//!
//! Thin capability traits around the timer and the output pin. Business
//! logic stays in core modules, HAL is just I/O.
//!
//! Methods take `&self`: hardware registers are shared between the arming
//! path and the interrupt context, so backends use atomics or re-entrant
//! system calls internally.

pub mod sim;

#[cfg(feature = "esp32")]
pub mod esp;

pub use sim::{SimPin, SimTimer};

#[cfg(feature = "esp32")]
pub use esp::{EspBackendError, EspPulseTimer, EspTogglePin};

/// Periodic toggle timer with microsecond resolution.
///
/// The contract mirrors a one-channel hardware timer: a programmable reload
/// value, a resettable counter, and an interrupt line that can be enabled,
/// disabled and acknowledged.
pub trait PulseTimer {
    /// Program the interval between toggle interrupts, in microseconds.
    fn set_half_period(&self, us: u32);

    /// Reset the running counter so the next interval starts from zero.
    fn reset_counter(&self);

    /// Enable the periodic toggle interrupt.
    fn enable_irq(&self);

    /// Disable the periodic toggle interrupt.
    fn disable_irq(&self);

    /// Acknowledge a pending interrupt condition.
    fn clear_pending(&self);
}

/// Output line driving the piezo element.
pub trait TogglePin {
    /// Flip the pin's logic level.
    fn toggle(&self);
}
