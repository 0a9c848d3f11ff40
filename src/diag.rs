//! Driver diagnostics ring.
//!
//! The admission and tick paths must never block on I/O, so diagnostic
//! messages go into a lock-free SPSC ring and a background drain writes them
//! out at leisure. Entries are dropped, and counted, when the ring is full.
//!
//! Unlike the sample queue this ring uses free-running u32 indices masked to
//! a power-of-2 length; the counters double as sequence numbers for the
//! drain side.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message text length per entry.
pub const MAX_DIAG_LEN: usize = 96;

/// Default ring length (entries). Must be a power of 2.
pub const DIAG_RING_LEN: usize = 64;

/// Severity of a diagnostic entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum DiagLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl DiagLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagLevel::Error => "ERROR",
            DiagLevel::Warn => "WARN",
            DiagLevel::Info => "INFO",
            DiagLevel::Debug => "DEBUG",
        }
    }
}

/// One diagnostic record.
#[derive(Clone, Copy)]
pub struct DiagEntry {
    /// Milliseconds since boot, supplied by the caller.
    pub at_ms: u32,
    pub level: DiagLevel,
    /// Text length in bytes.
    pub len: u8,
    /// Message bytes, not null-terminated.
    pub text: [u8; MAX_DIAG_LEN],
}

impl DiagEntry {
    const BLANK: Self = Self {
        at_ms: 0,
        level: DiagLevel::Info,
        len: 0,
        text: [0; MAX_DIAG_LEN],
    };

    /// Message text as a str, lossy on truncated UTF-8.
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.text[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

/// Lock-free SPSC diagnostics ring.
///
/// Single producer (the firmware's control loop), single consumer (the
/// drain). Push never blocks; a full ring drops the entry and bumps the
/// dropped counter.
pub struct DiagRing<const N: usize = DIAG_RING_LEN> {
    entries: UnsafeCell<[DiagEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: one producer and one consumer, coordinated through the
// acquire/release pairing on write_idx/read_idx.
unsafe impl<const N: usize> Sync for DiagRing<N> {}
unsafe impl<const N: usize> Send for DiagRing<N> {}

impl<const N: usize> DiagRing<N> {
    const MASK: usize = N - 1;

    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "ring length must be a power of 2");

        Self {
            entries: UnsafeCell::new([DiagEntry::BLANK; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an entry (producer side). Returns `false` if the ring was full
    /// and the entry was dropped. Text beyond [`MAX_DIAG_LEN`] is truncated.
    #[inline]
    pub fn push(&self, at_ms: u32, level: DiagLevel, text: &[u8]) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let len = text.len().min(MAX_DIAG_LEN);

        // SAFETY: single producer; this slot is outside the readable window
        // until the Release store below.
        unsafe {
            let entry = &mut (*self.entries.get())[(write as usize) & Self::MASK];
            entry.at_ms = at_ms;
            entry.level = level;
            entry.len = len as u8;
            entry.text[..len].copy_from_slice(&text[..len]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Take the next entry (consumer side), `None` when drained.
    #[inline]
    pub fn drain(&self) -> Option<DiagEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: single consumer, entry published by the producer's Release.
        let entry = unsafe { (*self.entries.get())[(read as usize) & Self::MASK] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Entries dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for DiagRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format into a fixed buffer, returning the bytes written. Truncates.
pub fn format_into(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct Cursor<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl Write for Cursor<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let take = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + take].copy_from_slice(&bytes[..take]);
            self.pos += take;
            Ok(())
        }
    }

    let mut cursor = Cursor { buf, pos: 0 };
    let _ = core::fmt::write(&mut cursor, args);
    cursor.pos
}

/// Push a formatted diagnostic without heap or blocking I/O.
///
/// ```ignore
/// diag!(RING, now_ms, DiagLevel::Info, "tone {} Hz for {} ms", f, d);
/// ```
#[macro_export]
macro_rules! diag {
    ($ring:expr, $at_ms:expr, $level:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::diag::MAX_DIAG_LEN];
        let len = $crate::diag::format_into(&mut buf, format_args!($($arg)*));
        $ring.push($at_ms, $level, &buf[..len]);
    }};
}

/// Info-level [`diag!`].
#[macro_export]
macro_rules! diag_info {
    ($ring:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag!($ring, $at_ms, $crate::diag::DiagLevel::Info, $($arg)*)
    };
}

/// Warn-level [`diag!`].
#[macro_export]
macro_rules! diag_warn {
    ($ring:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::diag!($ring, $at_ms, $crate::diag::DiagLevel::Warn, $($arg)*)
    };
}
