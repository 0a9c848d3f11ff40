//! Lock-free tone command queue.
//!
//! SPSC (single producer, single consumer): the transport admits encoded
//! samples, the 1 kHz sequencer consumes them. `head` is written only by the
//! consumer and `tail` only by the producer; both are atomics with
//! acquire/release pairing so the two sides may run in different contexts.
//!
//! One slot is permanently reserved so that `head == tail` can only mean
//! empty: a queue of `N` slots holds at most `N - 1` samples.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::sample::{ToneSample, SAMPLE_WIRE_SIZE};

/// Default queue length in slots. Usable capacity is one less.
pub const DEFAULT_QUEUE_LEN: usize = 32;

/// Why an admission was rejected.
///
/// Rejection is an answer, not an exception: callers own retry and
/// backpressure policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmitError {
    /// Payload length is not a multiple of the 4-byte sample encoding.
    InvalidPayloadSize,

    /// Admitting would fill the reserved slot.
    InsufficientCapacity,
}

/// Fixed-capacity circular buffer of tone commands.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Slots in `[tail, tail + k)` are written before the `Release` store of
///   `tail` publishes them
/// - The consumer's `Acquire` load of `tail` orders the slot reads after
///   those writes, and symmetrically for `head`
/// - Single producer and single consumer are a usage contract, enforced by
///   the firmware wiring rather than the type system
///
/// # Memory Ordering
///
/// Each side loads its own index `Relaxed` (it is the only writer) and the
/// other side's index `Acquire`; index advances are `Release` stores.
pub struct SampleQueue<const N: usize = DEFAULT_QUEUE_LEN> {
    /// Slot array. Indices stay in `0..N` and advance mod `N`.
    slots: UnsafeCell<[ToneSample; N]>,

    /// Next slot to consume. Written only by the consumer.
    head: AtomicUsize,

    /// Next free slot. Written only by the producer.
    tail: AtomicUsize,
}

// SAFETY: single producer, single consumer, all cross-context visibility
// through the acquire/release pairing on `head` and `tail`.
unsafe impl<const N: usize> Sync for SampleQueue<N> {}
unsafe impl<const N: usize> Send for SampleQueue<N> {}

impl<const N: usize> SampleQueue<N> {
    /// Create a new empty queue.
    pub const fn new() -> Self {
        assert!(N >= 2, "queue needs at least one usable slot");

        Self {
            slots: UnsafeCell::new([ToneSample::EMPTY; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Usable capacity: total slots minus the reserved one.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of queued samples not yet consumed.
    #[inline]
    pub fn occupied(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (tail + N - head) % N
    }

    /// Number of samples a producer can still admit.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.occupied()
    }

    /// Check whether the queue holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Admit a raw payload of encoded samples (producer side).
    ///
    /// The payload is a sequence of 4-byte samples per [`ToneSample`]'s wire
    /// form. An empty payload is accepted without effect. On any rejection
    /// the queue is left untouched.
    ///
    /// # Timing
    ///
    /// O(payload length), never blocks, never allocates.
    pub fn admit(&self, data: &[u8]) -> Result<(), AdmitError> {
        if data.is_empty() {
            return Ok(());
        }
        if data.len() % SAMPLE_WIRE_SIZE != 0 {
            return Err(AdmitError::InvalidPayloadSize);
        }

        let incoming = data.len() / SAMPLE_WIRE_SIZE;

        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        let occupied = (tail + N - head) % N;

        // Strictly less than the raw free count keeps the reserved slot open.
        if incoming >= N - occupied {
            return Err(AdmitError::InsufficientCapacity);
        }

        // Decode into the slots starting at tail, wrapping at the array end.
        // Nothing is visible to the consumer until tail is published below.
        for (i, chunk) in data.chunks_exact(SAMPLE_WIRE_SIZE).enumerate() {
            let idx = (tail + i) % N;
            // SAFETY: slots in [tail, tail + incoming) are unoccupied (checked
            // above) and the consumer will not read them before the Release
            // store of tail.
            unsafe {
                (*self.slots.get())[idx] = ToneSample::from_wire(chunk);
            }
        }

        self.tail.store((tail + incoming) % N, Ordering::Release);
        Ok(())
    }

    /// Take the oldest queued sample (consumer side).
    ///
    /// Returns `None` on an empty queue; that is the normal idle condition,
    /// not an error.
    #[inline]
    pub fn pop(&self) -> Option<ToneSample> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        // SAFETY: the slot at head was published by the producer's Release
        // store of tail, and only the consumer moves head.
        let sample = unsafe { (*self.slots.get())[head] };

        self.head.store((head + 1) % N, Ordering::Release);
        Some(sample)
    }
}

impl<const N: usize> Default for SampleQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
