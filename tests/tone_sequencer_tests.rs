//! Sequencer integration tests against the simulated hardware

use piezo_driver::hal::SimTimer;
use piezo_driver::{freq, FrequencyDriver, SampleQueue, ToneSample, ToneSequencer};

fn payload(samples: &[ToneSample]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_wire()).collect()
}

#[test]
fn test_end_to_end_two_note_playback() {
    // Admit (440, 100) then (0, 50) into an empty 32-slot queue and drive
    // the whole lifecycle through the simulated timer.
    let queue: SampleQueue = SampleQueue::new();
    let timer = SimTimer::new();
    let mut driver = FrequencyDriver::new(&timer);
    let mut seq = ToneSequencer::new();

    let data = payload(&[ToneSample::new(440, 100), ToneSample::new(0, 50)]);
    assert_eq!(queue.admit(&data), Ok(()));
    assert_eq!(queue.occupied(), 2);

    // First tick starts the 440 Hz note
    seq.tick(&queue, &mut driver);
    assert!(driver.is_armed());
    assert!(timer.is_armed());
    assert_eq!(timer.half_period_us(), 1136); // 500000 / 440
    assert_eq!(seq.duration_ms(), 100);

    // Sounding for the full duration
    for _ in 0..100 {
        seq.tick(&queue, &mut driver);
        assert!(timer.is_armed());
    }
    assert_eq!(seq.elapsed_ms(), 100);

    // Transition tick: dequeues the rest, driver stays disarmed (freq 0)
    seq.tick(&queue, &mut driver);
    assert!(!driver.is_armed());
    assert!(!timer.is_armed());
    assert_eq!(seq.duration_ms(), 50);
    assert_eq!(seq.elapsed_ms(), 0);
    assert!(queue.is_empty());

    // Silent for 50 ms
    for _ in 0..50 {
        seq.tick(&queue, &mut driver);
        assert!(!timer.is_armed());
    }

    // Then idle, and it stays that way
    seq.tick(&queue, &mut driver);
    assert!(seq.is_idle());
    assert_eq!(seq.duration_ms(), 0);
    assert_eq!(seq.elapsed_ms(), 0);
    for _ in 0..20 {
        seq.tick(&queue, &mut driver);
        assert!(seq.is_idle());
        assert!(!timer.is_armed());
    }
}

#[test]
fn test_admission_after_idle_resumes_playback() {
    let queue: SampleQueue = SampleQueue::new();
    let timer = SimTimer::new();
    let mut driver = FrequencyDriver::new(&timer);
    let mut seq = ToneSequencer::new();

    // Run idle for a while
    for _ in 0..10 {
        seq.tick(&queue, &mut driver);
    }
    assert!(seq.is_idle());

    // A later admission is picked up on the next tick
    queue
        .admit(&payload(&[ToneSample::new(1000, 5)]))
        .unwrap();
    seq.tick(&queue, &mut driver);
    assert!(driver.is_armed());
    assert_eq!(timer.half_period_us(), 500);
}

#[test]
fn test_clamped_frequency_matches_max() {
    let timer_high = SimTimer::new();
    let timer_max = SimTimer::new();
    let mut high = FrequencyDriver::new(&timer_high);
    let mut max = FrequencyDriver::new(&timer_max);

    high.arm(15_000);
    max.arm(freq::MAX_TONE_HZ);

    assert_eq!(timer_high.half_period_us(), timer_max.half_period_us());
    assert_eq!(timer_max.half_period_us(), 50);
}

#[test]
fn test_back_to_back_notes_reprogram_interval() {
    let queue: SampleQueue = SampleQueue::new();
    let timer = SimTimer::new();
    let mut driver = FrequencyDriver::new(&timer);
    let mut seq = ToneSequencer::new();

    queue
        .admit(&payload(&[
            ToneSample::new(440, 1),
            ToneSample::new(880, 1),
            ToneSample::new(220, 1),
        ]))
        .unwrap();

    seq.tick(&queue, &mut driver);
    assert_eq!(timer.half_period_us(), 500_000 / 440);

    seq.tick(&queue, &mut driver); // elapsed 1
    seq.tick(&queue, &mut driver); // transition to 880
    assert_eq!(timer.half_period_us(), 500_000 / 880);

    seq.tick(&queue, &mut driver);
    seq.tick(&queue, &mut driver); // transition to 220
    assert_eq!(timer.half_period_us(), 500_000 / 220);
    assert!(queue.is_empty());
}
