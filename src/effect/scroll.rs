//! Rainbow scroll locked to the beat grid.

use embassy_time::Instant;

use super::{Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::wheel;
use crate::rng::SmallRng;

/// Wheel positions between adjacent rows (vertical scroll).
const VERTICAL_COLOR_STEP: f32 = 50.0;
/// Wheel positions between adjacent columns (horizontal scroll).
const HORIZONTAL_COLOR_STEP: f32 = 12.0;
/// Cells per full wheel revolution at speed 1.0.
const CELLS_PER_CYCLE: f32 = 16.0;

/// Scroll axis selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
    /// Pick horizontal or vertical at random each run.
    Randomized,
}

/// Smooth rainbow scroll whose movement combines the running beat count
/// with the intra-beat phase, so motion stays continuous and locked to
/// the beat at the same time.
#[derive(Debug, Clone)]
pub struct ScrollEffect {
    axis: ScrollAxis,
    reverse: bool,
    randomize_direction: bool,
    speed: f32,
    vertical: bool,
    backwards: bool,
    beat_count: u32,
    rng: SmallRng,
}

impl ScrollEffect {
    pub fn new() -> Self {
        Self {
            axis: ScrollAxis::Horizontal,
            reverse: false,
            randomize_direction: false,
            speed: 1.0,
            vertical: false,
            backwards: false,
            beat_count: 0,
            rng: SmallRng::new(0),
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Scroll in the opposite direction.
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Pick the direction at random each run.
    #[must_use]
    pub fn with_random_direction(mut self) -> Self {
        self.randomize_direction = true;
        self
    }

    /// Scroll speed in wheel cycles per beat.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

impl Default for ScrollEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ScrollEffect {
    fn setup(&mut self, _canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.beat_count = 0;

        self.vertical = match self.axis {
            ScrollAxis::Horizontal => false,
            ScrollAxis::Vertical => true,
            ScrollAxis::Randomized => self.rng.next_below(2) == 1,
        };
        self.backwards = if self.randomize_direction {
            self.rng.next_below(2) == 1
        } else {
            self.reverse
        };
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        if rhythm.beat {
            self.beat_count += 1;
        }

        // Whole beats give continuous travel, the phase interpolates
        // between them.
        let travel = (self.beat_count as f32 + rhythm.phase) * self.speed * 256.0
            / CELLS_PER_CYCLE;
        let offset = if self.backwards { -travel } else { travel };

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let steps = if self.vertical {
                    y as f32 * VERTICAL_COLOR_STEP
                } else {
                    x as f32 * HORIZONTAL_COLOR_STEP
                };
                let mut pos = (steps + offset) % 256.0;
                if pos < 0.0 {
                    pos += 256.0;
                }
                canvas.set(x, y, wheel(pos as u8));
            }
        }
        Step::Continue
    }
}
