#![no_std]

pub mod canvas;
pub mod clock;
pub mod color;
pub mod effect;
pub mod grid;
pub mod manager;
pub mod math8;
pub mod rng;
pub mod tap;

pub use canvas::Canvas;
pub use clock::{
    ClockSource, DEFAULT_BPM, FixedBpmClock, HardwareBpmClock, ManualClock, NoEcho, NullClock,
};
pub use effect::{ColorChoice, Effect, EffectSlot, Rhythm, Step};
pub use grid::{GridLayout, GridMap};
pub use manager::{
    EffectManager, EffectSpec, FrameResult, QueueFullError, ScheduleError, StopRule,
};
pub use rng::SmallRng;
pub use tap::TapLine;

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The effect manager is generic over this trait and presents one
/// frame per tick through it.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Digital timing input sampled once per clock update.
///
/// Backed by a GPIO line on hardware. The level is polled, not
/// interrupt-driven, so pulses narrower than one frame can be missed.
pub trait PulseInput {
    /// Read the current line level
    fn read(&mut self) -> bool;
}

/// Optional digital output used to echo detected beats.
pub trait PulseOutput {
    /// Drive the line high or low
    fn set(&mut self, high: bool);
}
