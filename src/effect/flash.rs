//! Flash and strobe effects.

use super::{Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{BLUE, GREEN, OFF, RED, Rgb, WHITE, YELLOW, scale_color};

/// Fraction of the beat over which the flash decays.
const FLASH_WINDOW: f32 = 0.1;
/// Fraction of the beat the strobe stays lit.
const STROBE_ON_WINDOW: f32 = 0.2;

const STROBE_COLORS: [Rgb; 4] = [RED, BLUE, GREEN, YELLOW];

/// Sharp flash at each beat onset, decaying to black.
#[derive(Debug, Clone)]
pub struct FlashEffect {
    color: Rgb,
}

impl FlashEffect {
    pub const fn new() -> Self {
        Self { color: WHITE }
    }

    #[must_use]
    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

impl Default for FlashEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for FlashEffect {
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        let brightness = if rhythm.phase < FLASH_WINDOW {
            1.0 - rhythm.phase / FLASH_WINDOW
        } else {
            0.0
        };

        canvas.fill(scale_color(self.color, brightness));
        Step::Continue
    }
}

/// Strobe lit for the start of every beat, rotating through four colors.
#[derive(Debug, Clone, Default)]
pub struct StrobeEffect {
    index: usize,
}

impl StrobeEffect {
    pub const fn new() -> Self {
        Self { index: 0 }
    }
}

impl Effect for StrobeEffect {
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        if rhythm.beat {
            self.index = (self.index + 1) % STROBE_COLORS.len();
        }

        let color = if rhythm.phase < STROBE_ON_WINDOW {
            STROBE_COLORS[self.index]
        } else {
            OFF
        };

        canvas.fill(color);
        Step::Continue
    }
}
