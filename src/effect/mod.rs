//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the [`Effect`] lifecycle: `setup` once,
//! `update` once per frame, `cleanup` once on every exit path.

mod chase;
mod fill;
mod flash;
mod life;
mod pulse;
mod rings;
mod scanner;
mod scroll;
mod sparkle;
mod wave;

use embassy_time::Instant;

pub use chase::ChaseEffect;
pub use fill::{PixelFillEffect, RandomFillEffect};
pub use flash::{FlashEffect, StrobeEffect};
pub use life::LifeEffect;
pub use pulse::PulseEffect;
pub use rings::{RingOrigin, RingsEffect};
pub use scanner::ScannerEffect;
pub use scroll::{ScrollAxis, ScrollEffect};
pub use sparkle::SparkleEffect;
pub use wave::WaveEffect;

use crate::canvas::Canvas;
use crate::clock::{ClockSource, DEFAULT_BPM};
use crate::color::{Rgb, random_color, wheel};
use crate::rng::SmallRng;

/// Per-frame beat snapshot handed to effects.
///
/// This is the beat-awareness capability: effects that care read it,
/// effects that don't simply ignore it. With no clock wired the
/// snapshot is [`silent`](Rhythm::silent) — phase zero, default tempo,
/// never a beat.
#[derive(Debug, Clone, Copy)]
pub struct Rhythm {
    /// Position within the current beat, `0.0..1.0`.
    pub phase: f32,
    /// Current tempo estimate.
    pub bpm: f32,
    /// True on the frame a beat boundary was crossed.
    pub beat: bool,
}

impl Rhythm {
    /// Snapshot of a clock that never beats.
    pub const fn silent() -> Self {
        Self {
            phase: 0.0,
            bpm: DEFAULT_BPM,
            beat: false,
        }
    }

    /// Copy the given clock's state for this frame.
    pub fn from_clock<C: ClockSource>(clock: &C) -> Self {
        Self {
            phase: clock.phase(),
            bpm: clock.bpm(),
            beat: clock.beat_occurred(),
        }
    }

    /// True while the phase sits within `tolerance` of the beat onset.
    pub fn on_beat(&self, tolerance: f32) -> bool {
        self.phase < tolerance
    }
}

impl Default for Rhythm {
    fn default() -> Self {
        Self::silent()
    }
}

/// Signal returned by [`Effect::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep running next frame.
    Continue,
    /// The effect finished on its own.
    Done,
}

/// Lifecycle contract for animation routines.
pub trait Effect {
    /// Initialize per-run state. Called exactly once before the first
    /// `update`; animation state must not rely on constructor values
    /// surviving between runs.
    fn setup(&mut self, _canvas: &mut Canvas<'_>, _now: Instant) {}

    /// Render one frame.
    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, frame: u32) -> Step;

    /// Leave the buffer in the effect's terminal state.
    fn cleanup(&mut self, canvas: &mut Canvas<'_>) {
        canvas.clear();
    }
}

/// How an effect picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// One fixed color.
    Fixed(Rgb),
    /// Walk the color wheel.
    Wheel,
    /// A fresh random named color each time one is needed.
    Random,
}

impl ColorChoice {
    pub(crate) fn pick(self, wheel_pos: u8, rng: &mut SmallRng) -> Rgb {
        match self {
            Self::Fixed(color) => color,
            Self::Wheel => wheel(wheel_pos),
            Self::Random => random_color(rng),
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Whole-grid brightness pulse on the beat
    Pulse(PulseEffect),
    /// White flash decaying over the start of each beat
    Flash(FlashEffect),
    /// Color-rotating strobe
    Strobe(StrobeEffect),
    /// Rainbow scroll locked to the beat grid
    Scroll(ScrollEffect),
    /// Diagonal color wave
    Wave(WaveEffect),
    /// Bright chase window over a rainbow pattern
    Chase(ChaseEffect),
    /// Sparkles igniting on the beat and fading out
    Sparkle(SparkleEffect),
    /// Sweeping scanner bar with a fading tail
    Scanner(ScannerEffect),
    /// Concentric rings expanding per beat
    Rings(RingsEffect),
    /// Game of Life advancing per beat
    Life(LifeEffect),
    /// Periodic random full-grid fill
    RandomFill(RandomFillEffect),
    /// Pixel-by-pixel random fill, self-terminating
    PixelFill(PixelFillEffect),
}

impl EffectSlot {
    /// Initialize the contained effect
    pub fn setup(&mut self, canvas: &mut Canvas<'_>, now: Instant) {
        match self {
            Self::Pulse(effect) => effect.setup(canvas, now),
            Self::Flash(effect) => effect.setup(canvas, now),
            Self::Strobe(effect) => effect.setup(canvas, now),
            Self::Scroll(effect) => effect.setup(canvas, now),
            Self::Wave(effect) => effect.setup(canvas, now),
            Self::Chase(effect) => effect.setup(canvas, now),
            Self::Sparkle(effect) => effect.setup(canvas, now),
            Self::Scanner(effect) => effect.setup(canvas, now),
            Self::Rings(effect) => effect.setup(canvas, now),
            Self::Life(effect) => effect.setup(canvas, now),
            Self::RandomFill(effect) => effect.setup(canvas, now),
            Self::PixelFill(effect) => effect.setup(canvas, now),
        }
    }

    /// Render one frame of the contained effect
    pub fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, frame: u32) -> Step {
        match self {
            Self::Pulse(effect) => effect.update(canvas, rhythm, frame),
            Self::Flash(effect) => effect.update(canvas, rhythm, frame),
            Self::Strobe(effect) => effect.update(canvas, rhythm, frame),
            Self::Scroll(effect) => effect.update(canvas, rhythm, frame),
            Self::Wave(effect) => effect.update(canvas, rhythm, frame),
            Self::Chase(effect) => effect.update(canvas, rhythm, frame),
            Self::Sparkle(effect) => effect.update(canvas, rhythm, frame),
            Self::Scanner(effect) => effect.update(canvas, rhythm, frame),
            Self::Rings(effect) => effect.update(canvas, rhythm, frame),
            Self::Life(effect) => effect.update(canvas, rhythm, frame),
            Self::RandomFill(effect) => effect.update(canvas, rhythm, frame),
            Self::PixelFill(effect) => effect.update(canvas, rhythm, frame),
        }
    }

    /// Run the contained effect's cleanup
    pub fn cleanup(&mut self, canvas: &mut Canvas<'_>) {
        match self {
            Self::Pulse(effect) => effect.cleanup(canvas),
            Self::Flash(effect) => effect.cleanup(canvas),
            Self::Strobe(effect) => effect.cleanup(canvas),
            Self::Scroll(effect) => effect.cleanup(canvas),
            Self::Wave(effect) => effect.cleanup(canvas),
            Self::Chase(effect) => effect.cleanup(canvas),
            Self::Sparkle(effect) => effect.cleanup(canvas),
            Self::Scanner(effect) => effect.cleanup(canvas),
            Self::Rings(effect) => effect.cleanup(canvas),
            Self::Life(effect) => effect.cleanup(canvas),
            Self::RandomFill(effect) => effect.cleanup(canvas),
            Self::PixelFill(effect) => effect.cleanup(canvas),
        }
    }

    /// Name of the contained effect, for diagnostics
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pulse(_) => "pulse",
            Self::Flash(_) => "flash",
            Self::Strobe(_) => "strobe",
            Self::Scroll(_) => "scroll",
            Self::Wave(_) => "wave",
            Self::Chase(_) => "chase",
            Self::Sparkle(_) => "sparkle",
            Self::Scanner(_) => "scanner",
            Self::Rings(_) => "rings",
            Self::Life(_) => "life",
            Self::RandomFill(_) => "random_fill",
            Self::PixelFill(_) => "pixel_fill",
        }
    }
}
