//! Firmware entry point for the ESP32 build.
//!
//! Wires the static queue and diagnostics ring to the esp_timer/GPIO
//! backend, beeps out the firmware revision, then runs the 1 kHz tick loop.
//! The toggle callback runs in the esp_timer dispatch context and touches
//! nothing but the pin and the timer.

#![no_std]
#![no_main]

use core::ffi::c_void;

use esp_idf_svc::sys;

use piezo_driver::diag::{DiagLevel, DiagRing};
use piezo_driver::hal::{EspPulseTimer, EspTogglePin};
use piezo_driver::{diag, diag_info, diag_warn};
use piezo_driver::{revision, FrequencyDriver, SampleQueue, ToggleHandler, ToneSequencer};

/// GPIO pad wired to the piezo element.
const PIEZO_GPIO: i32 = 4;

static QUEUE: SampleQueue = SampleQueue::new();
static DIAG: DiagRing = DiagRing::new();
static PIN: EspTogglePin = EspTogglePin::new(PIEZO_GPIO);
static TIMER: EspPulseTimer = EspPulseTimer::new();

/// Toggle callback registered with esp_timer.
///
/// Pin flip and acknowledge only; queue and sequencer state stay off-limits
/// here.
unsafe extern "C" fn toggle_cb(_arg: *mut c_void) {
    ToggleHandler::new(&PIN, &TIMER).on_interrupt();
}

/// Milliseconds since boot.
#[inline]
fn now_ms() -> u32 {
    (unsafe { sys::esp_timer_get_time() } / 1000) as u32
}

/// Firmware revision byte encoded by the boot beeps (set by build.rs).
fn fw_rev() -> u8 {
    env!("FW_REV")
        .bytes()
        .fold(0u8, |acc, b| acc.wrapping_mul(10).wrapping_add(b - b'0'))
}

/// Write pending diagnostics to the console.
fn drain_diag() {
    while let Some(entry) = DIAG.drain() {
        let mut line = [0u8; 160];
        let len = piezo_driver::diag::format_into(
            &mut line,
            format_args!(
                "[{:8}] {}: {}\n",
                entry.at_ms,
                entry.level.as_str(),
                entry.text()
            ),
        );
        unsafe {
            sys::printf(c"%.*s".as_ptr(), len as i32, line.as_ptr());
        }
    }
}

#[no_mangle]
fn main() {
    sys::link_patches();

    diag_info!(DIAG, now_ms(), "{}", env!("VERSION_STRING"));

    if let Err(err) = PIN.init() {
        diag!(DIAG, now_ms(), DiagLevel::Error, "pin setup failed: {:?}", err);
        drain_diag();
        panic!("piezo pin bring-up failed");
    }
    if let Err(err) = TIMER.init(toggle_cb, core::ptr::null_mut()) {
        diag!(DIAG, now_ms(), DiagLevel::Error, "timer setup failed: {:?}", err);
        drain_diag();
        panic!("piezo timer bring-up failed");
    }

    let rev = fw_rev();
    match revision::enqueue_revision_beeps(&QUEUE, rev) {
        Ok(()) => diag_info!(DIAG, now_ms(), "revision {} beeps queued", rev),
        Err(err) => diag_warn!(DIAG, now_ms(), "revision beeps rejected: {:?}", err),
    }

    // TODO: hook the command transport (UART/USB) into QUEUE.admit so remote
    // producers can enqueue tones.

    let mut driver = FrequencyDriver::new(&TIMER);
    let mut sequencer = ToneSequencer::new();
    let mut ticks: u32 = 0;

    loop {
        sequencer.tick(&QUEUE, &mut driver);

        ticks = ticks.wrapping_add(1);
        if ticks % 10_000 == 0 {
            diag!(
                DIAG,
                now_ms(),
                DiagLevel::Debug,
                "queued {} dropped {}",
                QUEUE.occupied(),
                DIAG.dropped()
            );
        }

        drain_diag();

        unsafe {
            sys::usleep(1_000);
        }
    }
}
