//! Interrupt-safe single-producer/single-consumer byte queue.
//!
//! [`RxRing`] backs the receive path between an interrupt context that
//! pushes bytes as they arrive on the wire and a cooperative context that
//! drains them. It is lock-free by cursor discipline: after
//! [`RxRing::split`], the producer half owns the `end` cursor and only
//! reads `start`, while the consumer half owns `start` and only reads
//! `end`. With exactly one of each half alive, no compare-and-swap is
//! needed — plain atomic loads and stores with acquire/release pairing are
//! enough, which also makes the queue usable on targets without native
//! CAS (Cortex-M0 and friends, via `portable-atomic`).
//!
//! One slot is kept unused so that `start == end` always means empty and
//! `end + 1 == start` always means full: a ring of capacity `N` holds at
//! most `N - 1` bytes. When full, [`RxProducer::push`] reads the byte and
//! throws it away instead of blocking the interrupt; the loss is recorded
//! in a counter the consumer can drain with [`RxConsumer::take_dropped`].

use core::cell::UnsafeCell;
use portable_atomic::{AtomicU32, AtomicUsize, Ordering};

/// Fixed-capacity SPSC byte ring.
///
/// Create one per serial session, [`split`](Self::split) it, and hand the
/// [`RxProducer`] to the byte-arrival context and the [`RxConsumer`] to
/// the draining context.
pub struct RxRing<const N: usize> {
    buf: UnsafeCell<[u8; N]>,
    /// Consumer cursor: next slot to pop.
    start: AtomicUsize,
    /// Producer cursor: next slot to fill.
    end: AtomicUsize,
    /// Bytes discarded because the ring was full.
    dropped: AtomicU32,
}

// SAFETY: the buffer is only touched through the split halves, and the
// cursor discipline guarantees the producer and consumer never access the
// same slot concurrently.
unsafe impl<const N: usize> Sync for RxRing<N> {}

impl<const N: usize> RxRing<N> {
    /// Create an empty ring.
    pub const fn new() -> Self {
        assert!(N >= 2, "ring needs at least one usable slot");
        Self {
            buf: UnsafeCell::new([0; N]),
            start: AtomicUsize::new(0),
            end: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Split the ring into its producer and consumer halves.
    ///
    /// The exclusive borrow guarantees at most one producer and one
    /// consumer exist at a time, which is what makes the lock-free cursor
    /// discipline sound.
    pub fn split(&mut self) -> (RxProducer<'_, N>, RxConsumer<'_, N>) {
        (RxProducer { ring: self }, RxConsumer { ring: self })
    }

    /// Discard all buffered bytes and clear the overrun counter.
    ///
    /// Requires exclusive access: both halves must have been dropped (or
    /// not yet created), which is exactly the "producer disabled" condition
    /// a re-initialization needs.
    pub fn reset(&mut self) {
        self.start.store(0, Ordering::Relaxed);
        self.end.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Total slots in the ring; one more than the usable byte capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producing half of an [`RxRing`]; safe to drive from interrupt context.
pub struct RxProducer<'a, const N: usize> {
    ring: &'a RxRing<N>,
}

impl<const N: usize> RxProducer<'_, N> {
    /// Append one byte. O(1), never blocks, never allocates.
    ///
    /// Returns `false` if the ring was full; the byte is dropped and the
    /// overrun counter incremented, keeping interrupt latency bounded at
    /// the cost of losing the newest data.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        let end = self.ring.end.load(Ordering::Relaxed);
        let next = if end + 1 == N { 0 } else { end + 1 };

        if next == self.ring.start.load(Ordering::Acquire) {
            self.ring.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: slot `end` is owned by the producer until the cursor
        // store below publishes it; the consumer never reads past `end`.
        unsafe {
            (self.ring.buf.get() as *mut u8).add(end).write(byte);
        }
        self.ring.end.store(next, Ordering::Release);
        true
    }
}

/// Consuming half of an [`RxRing`]; drained from the cooperative context.
pub struct RxConsumer<'a, const N: usize> {
    ring: &'a RxRing<N>,
}

impl<const N: usize> RxConsumer<'_, N> {
    /// Remove and return the oldest byte, or `None` if the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        let start = self.ring.start.load(Ordering::Relaxed);
        if start == self.ring.end.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: slot `start` was published by the producer's release
        // store on `end`, and the producer never writes it again before
        // the cursor store below frees it.
        let byte = unsafe { (self.ring.buf.get() as *const u8).add(start).read() };

        let next = if start + 1 == N { 0 } else { start + 1 };
        self.ring.start.store(next, Ordering::Release);
        Some(byte)
    }

    /// Number of buffered bytes, computed from the cursor difference.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        let start = self.ring.start.load(Ordering::Relaxed);
        let end = self.ring.end.load(Ordering::Acquire);
        (end + N - start) % N
    }

    /// Whether the ring currently holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Return the number of bytes dropped since the last call, resetting
    /// the counter.
    #[inline]
    pub fn take_dropped(&mut self) -> u32 {
        self.ring.dropped.swap(0, Ordering::Relaxed)
    }
}
