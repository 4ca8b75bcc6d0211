//! Random fill effects.

use embassy_time::Instant;

use super::{Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::rng::SmallRng;

/// Frames between full-grid color changes.
const CHANGE_INTERVAL: u32 = 5;
/// Frames the finished pattern holds before the pixel fill ends.
const HOLD_FRAMES: u32 = 30;
/// Channel floor so random colors never come out murky.
const CHANNEL_MIN: u32 = 50;

#[allow(clippy::cast_possible_truncation)]
fn random_bright(rng: &mut SmallRng) -> Rgb {
    Rgb {
        r: rng.next_in(CHANNEL_MIN, 255) as u8,
        g: rng.next_in(CHANNEL_MIN, 255) as u8,
        b: rng.next_in(CHANNEL_MIN, 255) as u8,
    }
}

/// Whole grid repainted with a fresh random color every few frames.
/// Runs until the scheduler stops it.
#[derive(Debug, Clone)]
pub struct RandomFillEffect {
    rng: SmallRng,
}

impl RandomFillEffect {
    pub const fn new() -> Self {
        Self {
            rng: SmallRng::new(0),
        }
    }
}

impl Default for RandomFillEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for RandomFillEffect {
    fn setup(&mut self, _canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
    }

    fn update(&mut self, canvas: &mut Canvas<'_>, _rhythm: &Rhythm, frame: u32) -> Step {
        if frame % CHANGE_INTERVAL == 0 {
            canvas.fill(random_bright(&mut self.rng));
        }
        Step::Continue
    }
}

/// Pixels painted one by one in random colors; once the strip is
/// covered the pattern holds briefly, then the effect reports done.
#[derive(Debug, Clone)]
pub struct PixelFillEffect {
    cursor: usize,
    per_frame: usize,
    rng: SmallRng,
}

impl PixelFillEffect {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            per_frame: 1,
            rng: SmallRng::new(0),
        }
    }

    /// Pixels painted per frame; higher is faster.
    #[must_use]
    pub const fn with_per_frame(mut self, per_frame: usize) -> Self {
        self.per_frame = per_frame;
        self
    }
}

impl Default for PixelFillEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for PixelFillEffect {
    fn setup(&mut self, _canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.cursor = 0;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, canvas: &mut Canvas<'_>, _rhythm: &Rhythm, frame: u32) -> Step {
        if self.cursor < canvas.len() {
            for _ in 0..self.per_frame.max(1) {
                if self.cursor >= canvas.len() {
                    break;
                }
                let color = random_bright(&mut self.rng);
                canvas.set_index(self.cursor, color);
                self.cursor += 1;
            }
        } else if frame > canvas.len() as u32 + HOLD_FRAMES {
            return Step::Done;
        }
        Step::Continue
    }
}
