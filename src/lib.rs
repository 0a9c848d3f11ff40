//! # piezo-driver
//!
//! Interrupt-driven piezo tone sequencer.
//!
//! ## Architecture
//!
//! Tone commands flow one way:
//!
//! ```text
//! producer ──▶ SampleQueue ──▶ ToneSequencer ──▶ FrequencyDriver ──▶ ToggleHandler ──▶ pin
//!              (lock-free)     (1 kHz tick)      (arm/disarm)        (IRQ context)
//! ```
//!
//! Three execution contexts touch the driver: the admission call, the 1 kHz
//! tick, and the toggle interrupt. The queue's atomic indices make the first
//! two safe against each other; the interrupt path touches only the pin and
//! the timer's pending flag, never shared driver state.
//!
//! Hardware sits behind the [`hal`] capability traits, so everything above
//! runs unchanged against the [`hal::sim`] fakes on the host.

#![cfg_attr(not(test), no_std)]

pub mod diag;
pub mod freq;
pub mod hal;
pub mod queue;
pub mod revision;
pub mod sample;
pub mod sequencer;
pub mod toggle;

pub use freq::{FrequencyDriver, MAX_TONE_HZ};
pub use queue::{AdmitError, SampleQueue, DEFAULT_QUEUE_LEN};
pub use sample::ToneSample;
pub use sequencer::{ToneSequencer, TICK_HZ};
pub use toggle::ToggleHandler;
