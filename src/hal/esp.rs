//! ESP-IDF timer and GPIO backend.
//!
//! Maps the capability traits onto `esp_timer` and the GPIO driver through
//! raw `esp_idf_svc::sys` calls. `esp_timer` exposes no counter register or
//! pending flag: starting a periodic timer begins a fresh interval and the
//! framework acknowledges expirations internally, so `reset_counter` and
//! `clear_pending` are no-ops in this backend.
//!
//! Both types are const-constructible so the firmware can keep them in
//! statics and finish bring-up with `init` before the first arm.

use core::ffi::c_void;
use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, AtomicU32, Ordering};

use esp_idf_svc::sys;

use super::{PulseTimer, TogglePin};

/// Bring-up failure from the ESP-IDF backend.
///
/// Carries the raw `esp_err_t`. Only construction can fail; the arm/disarm
/// path is infallible by contract once `init` has succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EspBackendError {
    TimerCreate(sys::esp_err_t),
    PinSetup(sys::esp_err_t),
}

/// Toggle callback signature passed to [`EspPulseTimer::init`].
pub type ToggleCallback = unsafe extern "C" fn(arg: *mut c_void);

/// Periodic toggle timer on `esp_timer`.
pub struct EspPulseTimer {
    handle: AtomicPtr<sys::esp_timer>,
    half_period_us: AtomicU32,
}

// SAFETY: the esp_timer start/stop API is safe to call from any task, and
// the handle pointer is published once by init via Release/Acquire.
unsafe impl Sync for EspPulseTimer {}
unsafe impl Send for EspPulseTimer {}

impl EspPulseTimer {
    pub const fn new() -> Self {
        Self {
            handle: AtomicPtr::new(ptr::null_mut()),
            half_period_us: AtomicU32::new(0),
        }
    }

    /// Register the toggle callback and create the underlying timer.
    ///
    /// Must be called once before the first arm. `callback` runs in the
    /// esp_timer dispatch task each time the programmed interval elapses.
    pub fn init(&self, callback: ToggleCallback, arg: *mut c_void) -> Result<(), EspBackendError> {
        let args = sys::esp_timer_create_args_t {
            callback: Some(callback),
            arg,
            dispatch_method: sys::esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"piezo-toggle\0".as_ptr().cast(),
            skip_unhandled_events: true,
        };

        let mut handle: sys::esp_timer_handle_t = ptr::null_mut();
        let err = unsafe { sys::esp_timer_create(&args, &mut handle) };
        if err != sys::ESP_OK {
            return Err(EspBackendError::TimerCreate(err));
        }

        self.handle.store(handle, Ordering::Release);
        Ok(())
    }

    #[inline]
    fn handle(&self) -> Option<sys::esp_timer_handle_t> {
        let handle = self.handle.load(Ordering::Acquire);
        if handle.is_null() {
            None
        } else {
            Some(handle)
        }
    }
}

impl PulseTimer for EspPulseTimer {
    fn set_half_period(&self, us: u32) {
        self.half_period_us.store(us, Ordering::Relaxed);
    }

    fn reset_counter(&self) {
        // esp_timer_start_periodic begins a fresh interval; nothing to do.
    }

    fn enable_irq(&self) {
        if let Some(handle) = self.handle() {
            let period = self.half_period_us.load(Ordering::Relaxed) as u64;
            // Stop is rejected when the timer is not running; that is fine.
            unsafe {
                sys::esp_timer_stop(handle);
                sys::esp_timer_start_periodic(handle, period);
            }
        }
    }

    fn disable_irq(&self) {
        if let Some(handle) = self.handle() {
            unsafe {
                sys::esp_timer_stop(handle);
            }
        }
    }

    fn clear_pending(&self) {
        // Expirations are acknowledged inside the esp_timer framework.
    }
}

impl Default for EspPulseTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Piezo output line on a GPIO pad.
///
/// The hardware has no toggle register, so the current level is mirrored in
/// an atomic and rewritten on every flip.
pub struct EspTogglePin {
    gpio: i32,
    level: AtomicBool,
}

impl EspTogglePin {
    pub const fn new(gpio: i32) -> Self {
        Self {
            gpio,
            level: AtomicBool::new(false),
        }
    }

    /// Configure the pad as a push-pull output driven low.
    pub fn init(&self) -> Result<(), EspBackendError> {
        unsafe {
            let err = sys::gpio_reset_pin(self.gpio);
            if err != sys::ESP_OK {
                return Err(EspBackendError::PinSetup(err));
            }
            let err = sys::gpio_set_direction(self.gpio, sys::gpio_mode_t_GPIO_MODE_OUTPUT);
            if err != sys::ESP_OK {
                return Err(EspBackendError::PinSetup(err));
            }
            sys::gpio_set_level(self.gpio, 0);
        }
        self.level.store(false, Ordering::Relaxed);
        Ok(())
    }
}

impl TogglePin for EspTogglePin {
    #[inline]
    fn toggle(&self) {
        let was = self.level.fetch_xor(true, Ordering::Relaxed);
        unsafe {
            sys::gpio_set_level(self.gpio, !was as u32);
        }
    }
}
