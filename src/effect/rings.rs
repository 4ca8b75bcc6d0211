//! Concentric rings expanding from an origin on each beat.

use embassy_time::Instant;
use heapless::Vec;
use libm::{fabsf, sqrtf};

use super::{ColorChoice, Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{Rgb, WHITE, scale_color};
use crate::rng::SmallRng;

/// Cells of full brightness at the ring edge.
const RING_WIDTH: f32 = 1.5;
/// Cells over which the ring fades behind its edge.
const FADE_BAND: f32 = 3.0;
/// Fade floor; dimmer cells stay dark.
const MIN_BRIGHTNESS: f32 = 0.1;
/// Wheel advance per beat in wheel mode.
const WHEEL_STEP: u8 = 40;

/// Where rings emanate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingOrigin {
    Center,
    /// All four corners at once.
    Corners,
    /// Midpoints of all four edges.
    Edges,
    /// A fresh random point per beat.
    Randomized,
}

/// Ripples expanding from their origin over one beat, like rings on
/// water struck in time with the music.
#[derive(Debug, Clone)]
pub struct RingsEffect {
    origin: RingOrigin,
    choice: ColorChoice,
    current: Rgb,
    origins: Vec<(f32, f32), 4>,
    wheel_pos: u8,
    rng: SmallRng,
}

impl RingsEffect {
    pub fn new() -> Self {
        Self {
            origin: RingOrigin::Center,
            choice: ColorChoice::Fixed(WHITE),
            current: WHITE,
            origins: Vec::new(),
            wheel_pos: 0,
            rng: SmallRng::new(0),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: RingOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Color selection; wheel and random modes change color per beat.
    #[must_use]
    pub fn with_color(mut self, choice: ColorChoice) -> Self {
        self.choice = choice;
        self
    }

    #[allow(clippy::cast_precision_loss)]
    fn place_origins(&mut self, width: usize, height: usize) {
        let w = width as f32;
        let h = height as f32;

        self.origins.clear();
        let _ = match self.origin {
            RingOrigin::Center => self.origins.push((w / 2.0, h / 2.0)),
            RingOrigin::Corners => {
                let _ = self.origins.push((0.0, 0.0));
                let _ = self.origins.push((w - 1.0, 0.0));
                let _ = self.origins.push((0.0, h - 1.0));
                self.origins.push((w - 1.0, h - 1.0))
            }
            RingOrigin::Edges => {
                let _ = self.origins.push((w / 2.0, 0.0));
                let _ = self.origins.push((w / 2.0, h - 1.0));
                let _ = self.origins.push((0.0, h / 2.0));
                self.origins.push((w - 1.0, h / 2.0))
            }
            RingOrigin::Randomized => self
                .origins
                .push((self.rng.next_f32() * w, self.rng.next_f32() * h)),
        };
    }
}

impl Default for RingsEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for RingsEffect {
    fn setup(&mut self, canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.wheel_pos = self.rng.next_u32() as u8;
        self.place_origins(canvas.width(), canvas.height());
        self.current = self.choice.pick(self.wheel_pos, &mut self.rng);
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        if rhythm.beat {
            if self.origin == RingOrigin::Randomized {
                self.place_origins(canvas.width(), canvas.height());
            }
            if matches!(self.choice, ColorChoice::Wheel | ColorChoice::Random) {
                self.wheel_pos = self.wheel_pos.wrapping_add(WHEEL_STEP);
                self.current = self.choice.pick(self.wheel_pos, &mut self.rng);
            }
        }

        let w = canvas.width() as f32;
        let h = canvas.height() as f32;
        // Rings reach the far corner exactly at the end of the beat.
        let radius = rhythm.phase * sqrtf(w * w + h * h);

        canvas.clear();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let mut brightest: f32 = 0.0;

                for &(ox, oy) in &self.origins {
                    let dx = x as f32 - ox;
                    let dy = y as f32 - oy;
                    let from_ring = fabsf(sqrtf(dx * dx + dy * dy) - radius);

                    let brightness = if from_ring < RING_WIDTH {
                        1.0
                    } else if from_ring < RING_WIDTH + FADE_BAND {
                        let fade = (from_ring - RING_WIDTH) / FADE_BAND;
                        1.0 - fade * (1.0 - MIN_BRIGHTNESS)
                    } else {
                        0.0
                    };
                    brightest = brightest.max(brightness);
                }

                if brightest > MIN_BRIGHTNESS {
                    canvas.set(x, y, scale_color(self.current, brightest));
                }
            }
        }
        Step::Continue
    }
}
