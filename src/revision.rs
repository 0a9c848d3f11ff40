//! Boot-time revision beeps.
//!
//! Encodes a firmware revision byte as a sequence of tones so that a board
//! in the field can be version-checked by ear. The byte is split into four
//! base-4 digits; each digit's tone repeats digit-many times, most
//! significant digit first, with a short rest after every note.
//!
//! Pure client of the admission interface, with no coupling to the queue
//! internals.

use crate::queue::{AdmitError, SampleQueue};
use crate::sample::ToneSample;

/// One tone per base-4 digit position, least significant first.
/// Descending C arpeggio: C4, G3, E3, C3.
pub const DIGIT_TONES_HZ: [u16; 4] = [261, 196, 164, 130];

/// Length of one beep note.
pub const NOTE_MS: u16 = 150;

/// Rest after each note so repeated digits stay countable.
pub const REST_MS: u16 = 15;

/// Enqueue the beep sequence for `revision`.
///
/// Revision 0 enqueues nothing. Each sample goes through [`SampleQueue::admit`]
/// on its own; the first rejection aborts the remainder and is returned.
/// The worst case (all digits 3) is 24 samples.
pub fn enqueue_revision_beeps<const N: usize>(
    queue: &SampleQueue<N>,
    revision: u8,
) -> Result<(), AdmitError> {
    for digit in (0..4).rev() {
        let count = (revision >> (2 * digit)) & 0x3;
        let tone = DIGIT_TONES_HZ[digit as usize];

        for _ in 0..count {
            queue.admit(&ToneSample::new(tone, NOTE_MS).to_wire())?;
            queue.admit(&ToneSample::new(0, REST_MS).to_wire())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<const N: usize>(queue: &SampleQueue<N>) -> Vec<ToneSample> {
        let mut out = Vec::new();
        while let Some(s) = queue.pop() {
            out.push(s);
        }
        out
    }

    #[test]
    fn test_revision_zero_is_silent() {
        let queue: SampleQueue<32> = SampleQueue::new();
        enqueue_revision_beeps(&queue, 0).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_single_low_digit() {
        let queue: SampleQueue<32> = SampleQueue::new();
        enqueue_revision_beeps(&queue, 2).unwrap();

        // Digit 0 has value 2: two C4 beeps, each followed by a rest
        let samples = drain(&queue);
        assert_eq!(
            samples,
            vec![
                ToneSample::new(261, NOTE_MS),
                ToneSample::new(0, REST_MS),
                ToneSample::new(261, NOTE_MS),
                ToneSample::new(0, REST_MS),
            ]
        );
    }

    #[test]
    fn test_most_significant_digit_first() {
        // 0b01_00_00_01: digit 3 = 1 (C3), digit 0 = 1 (C4)
        let queue: SampleQueue<32> = SampleQueue::new();
        enqueue_revision_beeps(&queue, 0b0100_0001).unwrap();

        let samples = drain(&queue);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], ToneSample::new(130, NOTE_MS));
        assert_eq!(samples[1], ToneSample::new(0, REST_MS));
        assert_eq!(samples[2], ToneSample::new(261, NOTE_MS));
        assert_eq!(samples[3], ToneSample::new(0, REST_MS));
    }

    #[test]
    fn test_worst_case_revision_fits_default_queue() {
        // All digits 3: 12 beeps, 24 samples, within the 31 usable slots
        let queue: SampleQueue<32> = SampleQueue::new();
        enqueue_revision_beeps(&queue, 0xFF).unwrap();
        assert_eq!(queue.occupied(), 24);

        let samples = drain(&queue);
        let tones: Vec<u16> = samples
            .iter()
            .filter(|s| !s.is_rest())
            .map(|s| s.freq_hz)
            .collect();
        assert_eq!(
            tones,
            vec![130, 130, 130, 164, 164, 164, 196, 196, 196, 261, 261, 261]
        );
    }

    #[test]
    fn test_full_queue_rejection_propagates() {
        let queue: SampleQueue<4> = SampleQueue::new();
        assert_eq!(
            enqueue_revision_beeps(&queue, 0xFF),
            Err(AdmitError::InsufficientCapacity)
        );
    }
}
