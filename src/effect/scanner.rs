//! Sweeping scanner bar with a fading tail.

use embassy_time::Instant;
use libm::fabsf;

use super::{ColorChoice, Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{RED, Rgb, scale_color};
use crate::rng::SmallRng;

/// Cells of full brightness around the bar center.
const CENTER_WIDTH: f32 = 2.0;
/// Cells from the center to the end of the tail.
const TAIL_LENGTH: f32 = 6.0;
/// Tail brightness floor; dimmer cells stay dark.
const MIN_BRIGHTNESS: f32 = 0.1;
/// Beats per one-way sweep.
const BEATS_PER_SWEEP: u32 = 2;
/// Wheel advance per sweep in wheel mode.
const WHEEL_STEP: u8 = 20;

/// A bright bar sweeping back and forth across the grid, one direction
/// every two beats, with a quadratic falloff tail.
#[derive(Debug, Clone)]
pub struct ScannerEffect {
    vertical: bool,
    choice: ColorChoice,
    current: Rgb,
    beat_count: u32,
    wheel_pos: u8,
    rng: SmallRng,
}

impl ScannerEffect {
    pub fn new() -> Self {
        Self {
            vertical: false,
            choice: ColorChoice::Fixed(RED),
            current: RED,
            beat_count: 0,
            wheel_pos: 0,
            rng: SmallRng::new(0),
        }
    }

    /// Sweep along the vertical axis instead of the horizontal.
    #[must_use]
    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Color selection; wheel and random modes change color per sweep.
    #[must_use]
    pub fn with_color(mut self, choice: ColorChoice) -> Self {
        self.choice = choice;
        self
    }
}

impl Default for ScannerEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ScannerEffect {
    fn setup(&mut self, _canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.beat_count = 0;
        self.wheel_pos = 0;
        self.current = self.choice.pick(self.wheel_pos, &mut self.rng);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        if rhythm.beat {
            self.beat_count += 1;
            // A sweep completed: reverse direction, refresh the color.
            if self.beat_count % BEATS_PER_SWEEP == 0 {
                self.wheel_pos = self.wheel_pos.wrapping_add(WHEEL_STEP);
                self.current = self.choice.pick(self.wheel_pos, &mut self.rng);
            }
        }

        let span = if self.vertical {
            canvas.height()
        } else {
            canvas.width()
        };
        let max_pos = span.saturating_sub(1) as f32;

        let forward = (self.beat_count / BEATS_PER_SWEEP) % 2 == 0;
        let beats_into_sweep = self.beat_count % BEATS_PER_SWEEP;
        let sweep_phase = (beats_into_sweep as f32 + rhythm.phase) / BEATS_PER_SWEEP as f32;
        let position = if forward {
            sweep_phase * max_pos
        } else {
            (1.0 - sweep_phase) * max_pos
        };

        canvas.clear();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let along = (if self.vertical { y } else { x }) as f32;
                let distance = fabsf(along - position);

                let brightness = if distance < CENTER_WIDTH {
                    1.0
                } else if distance < TAIL_LENGTH {
                    let tail = (distance - CENTER_WIDTH) / (TAIL_LENGTH - CENTER_WIDTH);
                    1.0 - tail * tail * (1.0 - MIN_BRIGHTNESS)
                } else {
                    0.0
                };

                if brightness > MIN_BRIGHTNESS {
                    canvas.set(x, y, scale_color(self.current, brightness));
                }
            }
        }
        Step::Continue
    }
}
