//! Interrupt-safe tap-tempo line.
//!
//! A [`TapLine`] lets an interrupt handler (button, GPIO edge, timer)
//! feed beat taps into the frame loop without sharing mutable state.
//! Synchronization is a critical section, suitable for single-core
//! embedded targets.

use core::cell::Cell;

use critical_section::Mutex;

use crate::PulseInput;

/// Latched tap trigger shared between an ISR and the frame loop.
///
/// The line stays "high" for exactly one sample after a tap, so a
/// pulse-detecting clock sees one rising edge per tap. Taps arriving
/// faster than the frame rate collapse into one.
pub struct TapLine {
    pending: Mutex<Cell<bool>>,
}

impl TapLine {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Record a tap. Safe to call from an interrupt handler.
    pub fn notify(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(true));
    }

    /// Take the pending tap, clearing the latch.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).replace(false))
    }
}

impl Default for TapLine {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseInput for &TapLine {
    fn read(&mut self) -> bool {
        self.take()
    }
}
