//! Sparkles igniting on the beat and fading out.

use embassy_time::Instant;

use super::{ColorChoice, Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{OFF, Rgb, WHITE};
use crate::math8::scale8;
use crate::rng::SmallRng;

/// Per-frame fade factor (255 = no fade).
const FADE_SCALE: u8 = 217;
/// Channels below this snap to black instead of lingering.
const CUTOFF: u8 = 26;
/// New sparkles per beat.
const DEFAULT_DENSITY: u8 = 8;
/// Wheel advance per beat in wheel mode.
const WHEEL_STEP: u8 = 30;

/// Random pixels light up on each beat and decay exponentially, like
/// stars twinkling. The decay state lives in the frame buffer itself:
/// every frame scales what is already there.
#[derive(Debug, Clone)]
pub struct SparkleEffect {
    choice: ColorChoice,
    density: u8,
    wheel_pos: u8,
    rng: SmallRng,
}

impl SparkleEffect {
    pub fn new() -> Self {
        Self {
            choice: ColorChoice::Fixed(WHITE),
            density: DEFAULT_DENSITY,
            wheel_pos: 0,
            rng: SmallRng::new(0),
        }
    }

    #[must_use]
    pub fn with_color(mut self, choice: ColorChoice) -> Self {
        self.choice = choice;
        self
    }

    /// New sparkles per beat.
    #[must_use]
    pub fn with_density(mut self, density: u8) -> Self {
        self.density = density;
        self
    }
}

impl Default for SparkleEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for SparkleEffect {
    fn setup(&mut self, canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.wheel_pos = 0;
        canvas.clear();
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        if rhythm.beat {
            for _ in 0..self.density {
                let index = self.rng.next_below(canvas.len() as u32) as usize;
                let color = self.choice.pick(self.wheel_pos, &mut self.rng);
                canvas.set_index(index, color);
            }
            if self.choice == ColorChoice::Wheel {
                self.wheel_pos = self.wheel_pos.wrapping_add(WHEEL_STEP);
            }
        }

        for pixel in canvas.pixels_mut() {
            let faded = Rgb {
                r: scale8(pixel.r, FADE_SCALE),
                g: scale8(pixel.g, FADE_SCALE),
                b: scale8(pixel.b, FADE_SCALE),
            };
            *pixel = if faded.r.max(faded.g).max(faded.b) < CUTOFF {
                OFF
            } else {
                faded
            };
        }
        Step::Continue
    }
}
