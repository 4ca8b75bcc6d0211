//! Whole-grid brightness pulse on the beat.

use embassy_time::Instant;
use libm::sinf;

use super::{ColorChoice, Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{Rgb, WHITE, scale_color, wheel};
use crate::rng::SmallRng;

/// Brightness pulse: a squared half-sine over each beat, so the grid
/// swells to full brightness mid-beat and breathes out by the next.
#[derive(Debug, Clone)]
pub struct PulseEffect {
    choice: ColorChoice,
    current: Rgb,
    rng: SmallRng,
}

impl PulseEffect {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            choice,
            current: WHITE,
            rng: SmallRng::new(0),
        }
    }
}

impl Default for PulseEffect {
    /// Pulses through the color wheel.
    fn default() -> Self {
        Self::new(ColorChoice::Wheel)
    }
}

impl Effect for PulseEffect {
    fn setup(&mut self, _canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.current = self.choice.pick(0, &mut self.rng);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, frame: u32) -> Step {
        if rhythm.beat && self.choice == ColorChoice::Random {
            self.current = self.choice.pick(0, &mut self.rng);
        }

        let color = match self.choice {
            ColorChoice::Wheel => wheel((frame % 256) as u8),
            _ => self.current,
        };

        let half_sine = sinf(rhythm.phase * core::f32::consts::PI);
        canvas.fill(scale_color(color, half_sine * half_sine));

        Step::Continue
    }
}
