//! Tick multiplexer: one recurring timer, several logical task periods.
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!  TickSource ───▶│ TaskMultiplexer::on_tick()               │
//!  (base period)  │   counter_ms += base                     │
//!                 │   for each task: counter_ms % P == 0 ──▶ │──▶ TaskFlags[i].raise()
//!                 └──────────────────────────────────────────┘
//!                                                               main loop: flags.take(i)
//! ```
//!
//! The multiplexer runs entirely in the timer callback.  It never blocks,
//! never allocates, and only ever stores `true` into a flag, so it cannot
//! race the main loop that clears them.
//!
//! ## Counter wrap-around
//!
//! `counter_ms` is a `u32` and wraps after ~49.7 days.  Modulus due-checks
//! stay phase-correct across the wrap only if every task period divides
//! 2^32; the periods used here (100/200/500/1000 ms) do not, so the first
//! firing after a wrap may come early for some tasks.  This is accepted.

use log::debug;

use crate::app::ports::TickSource;
use crate::error::{ConfigError, InitError};
use crate::events::Latch;

// ═══════════════════════════════════════════════════════════════
//  Schedule
// ═══════════════════════════════════════════════════════════════

/// Validated set of task periods derived from one base tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSchedule<const N: usize> {
    base_ms: u32,
    periods_ms: [u32; N],
}

impl<const N: usize> TaskSchedule<N> {
    /// Build a schedule.  Every period must be a positive multiple of `base_ms`.
    pub fn new(base_ms: u32, periods_ms: [u32; N]) -> Result<Self, ConfigError> {
        if base_ms == 0 {
            return Err(ConfigError::ZeroBasePeriod);
        }
        for (task, &period_ms) in periods_ms.iter().enumerate() {
            if period_ms == 0 {
                return Err(ConfigError::ZeroTaskPeriod { task });
            }
            if period_ms % base_ms != 0 {
                return Err(ConfigError::NotMultiple {
                    task,
                    period_ms,
                    base_ms,
                });
            }
        }
        Ok(Self {
            base_ms,
            periods_ms,
        })
    }

    pub fn base_ms(&self) -> u32 {
        self.base_ms
    }

    pub fn period_ms(&self, task: usize) -> Option<u32> {
        self.periods_ms.get(task).copied()
    }

    /// Base period in microseconds, as the timer wants it.
    pub fn base_us(&self) -> u64 {
        u64::from(self.base_ms) * 1000
    }
}

// ═══════════════════════════════════════════════════════════════
//  Flags
// ═══════════════════════════════════════════════════════════════

/// One due-flag per task.  Raised by the tick callback, taken by the main loop.
#[derive(Debug)]
pub struct TaskFlags<const N: usize> {
    flags: [Latch; N],
}

impl<const N: usize> TaskFlags<N> {
    pub const fn new() -> Self {
        Self {
            flags: [const { Latch::new() }; N],
        }
    }

    #[inline]
    fn raise(&self, task: usize) {
        if let Some(flag) = self.flags.get(task) {
            flag.raise();
        }
    }

    /// Returns `true` exactly once per raise (multiple raises coalesce).
    #[inline]
    pub fn take(&self, task: usize) -> bool {
        self.flags.get(task).is_some_and(Latch::consume)
    }

    pub fn is_due(&self, task: usize) -> bool {
        self.flags.get(task).is_some_and(Latch::is_pending)
    }
}

impl<const N: usize> Default for TaskFlags<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Multiplexer
// ═══════════════════════════════════════════════════════════════

/// Owns the running millisecond counter; lives inside the tick callback.
pub struct TaskMultiplexer<'a, const N: usize> {
    schedule: TaskSchedule<N>,
    counter_ms: u32,
    flags: &'a TaskFlags<N>,
}

impl<'a, const N: usize> TaskMultiplexer<'a, N> {
    pub fn new(schedule: TaskSchedule<N>, flags: &'a TaskFlags<N>) -> Self {
        Self {
            schedule,
            counter_ms: 0,
            flags,
        }
    }

    /// Advance by one base tick and raise every task that is now due.
    /// Called from the timer callback.
    pub fn on_tick(&mut self) {
        self.counter_ms = self.counter_ms.wrapping_add(self.schedule.base_ms);
        for (task, &period_ms) in self.schedule.periods_ms.iter().enumerate() {
            if self.counter_ms % period_ms == 0 {
                self.flags.raise(task);
            }
        }
    }

    /// Milliseconds accumulated so far (wrapping).
    pub fn counter_ms(&self) -> u32 {
        self.counter_ms
    }

    pub fn schedule(&self) -> &TaskSchedule<N> {
        &self.schedule
    }
}

/// Hand the multiplexer to `timer` so every tick drives it.
///
/// The flags must be `'static` because the callback outlives this call.
pub fn arm<T: TickSource, const N: usize>(
    timer: &mut T,
    mut mux: TaskMultiplexer<'static, N>,
) -> Result<(), InitError> {
    let period_us = mux.schedule.base_us();
    debug!("scheduler: arming {} tasks on a {}us tick", N, period_us);
    timer.start(period_us, move || mux.on_tick())
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
