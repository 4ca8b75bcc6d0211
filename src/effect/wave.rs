//! Diagonal color wave advancing with the beat.

use super::{Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::wheel;

/// Wheel positions the wave advances per beat.
const WAVE_STEP: f32 = 10.0;

/// Diagonal rainbow wave: each cell's wheel position follows `x + y`
/// plus the beat phase, so the pattern slides one diagonal band per beat.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveEffect;

impl WaveEffect {
    pub const fn new() -> Self {
        Self
    }
}

impl Effect for WaveEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let pos = ((x + y) as f32 + rhythm.phase * WAVE_STEP) % 256.0;
                canvas.set(x, y, wheel(pos as u8));
            }
        }
        Step::Continue
    }
}
