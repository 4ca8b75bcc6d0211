//! Rainbow chase following the beat phase across the grid.

use libm::fabsf;

use super::{Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{scale_color, wheel};

/// Cells over which the chase window falls off to black.
const TRAIL_SPAN: f32 = 8.0;
/// Wheel positions between adjacent columns.
const COLOR_STEP: u32 = 8;

/// A bright window sweeping the grid once per beat over a slowly
/// cycling rainbow pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaseEffect;

impl ChaseEffect {
    pub const fn new() -> Self {
        Self
    }
}

impl Effect for ChaseEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, frame: u32) -> Step {
        let window = rhythm.phase * canvas.width() as f32;

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let distance = fabsf(x as f32 - window);
                let brightness = (1.0 - distance / TRAIL_SPAN).max(0.0);
                let pos = ((x as u32 * COLOR_STEP + frame) % 256) as u8;

                canvas.set(x, y, scale_color(wheel(pos), brightness));
            }
        }
        Step::Continue
    }
}
