//! Interrupt-to-main-loop hand-off cells.
//!
//! Every cell here has exactly one writer context (a timer callback or a
//! GPIO ISR) and one reader/clearer context (the main loop).  Both sides
//! touch a single atomic word, so no locks are needed.
//!
//! ```text
//! ┌─────────────┐  raise()   ┌─────────┐  consume()  ┌──────────────┐
//! │ GPIO ISR    │───────────▶│  Latch  │────────────▶│  Main Loop   │
//! │ Timer tick  │            │ (bool)  │             │  (consumer)  │
//! └─────────────┘            └─────────┘             └──────────────┘
//! ```
//!
//! A latch is a level, not a counter: any number of raises between two
//! consumes are observed as one event.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-slot boolean mailbox.
#[derive(Debug)]
pub struct Latch {
    pending: AtomicBool,
}

impl Latch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Mark the latch as pending.  Safe from interrupt context.
    #[inline]
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Read and clear in one step.  Returns whether the latch was set.
    #[inline]
    pub fn consume(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Peek without clearing.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

/// One pending-event latch per external input source (e.g. per button).
///
/// Sources are addressed by index; the thermostat uses `0` for "setpoint
/// up" and `1` for "setpoint down".
#[derive(Debug)]
pub struct EventLatch<const N: usize> {
    sources: [Latch; N],
}

impl<const N: usize> EventLatch<N> {
    pub const fn new() -> Self {
        Self {
            sources: [const { Latch::new() }; N],
        }
    }

    /// Record an edge on `source`.  Out-of-range sources are ignored so a
    /// miswired ISR can never panic in interrupt context.
    #[inline]
    pub fn on_edge(&self, source: usize) {
        if let Some(latch) = self.sources.get(source) {
            latch.raise();
        }
    }

    /// Main-loop side: was an edge seen on `source` since the last call?
    #[inline]
    pub fn consume(&self, source: usize) -> bool {
        self.sources.get(source).is_some_and(Latch::consume)
    }

    /// Direct handle to one source, for wiring into an ISR.
    ///
    /// Meant for `static` initialisers, where an out-of-range `source`
    /// fails const evaluation.  At run time it panics instead.
    pub const fn source(&self, source: usize) -> &Latch {
        &self.sources[source]
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> Default for EventLatch<N> {
    fn default() -> Self {
        Self::new()
    }
}
