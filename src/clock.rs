//! Beat timing sources.
//!
//! A clock turns wall time, manual taps, or a noisy hardware pulse
//! train into three signals effects can rely on: a tempo estimate
//! (BPM), a continuous phase within the current beat, and a one-frame
//! flag marking each beat boundary.

use embassy_time::{Duration, Instant};
use heapless::HistoryBuffer;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{PulseInput, PulseOutput};

/// Fallback tempo used before a timing source has locked on.
pub const DEFAULT_BPM: f32 = 60.0;

// Acceptance window for pulse intervals: 40-240 BPM.
const MIN_PULSE_INTERVAL: f32 = 0.25;
const MAX_PULSE_INTERVAL: f32 = 1.5;
/// Silence longer than this drops back to the default tempo.
const PULSE_TIMEOUT: Duration = Duration::from_secs(3);
const HISTORY_LEN: usize = 8;
/// Intervals needed before the median filter takes over.
const MEDIAN_MIN_SAMPLES: usize = 3;
/// Weight of the previous estimate when blending in a new one.
const BPM_BLEND: f32 = 0.5;
/// Phase holds here while the next beat is late, instead of wrapping.
const LATE_PHASE_HOLD: f32 = 0.95;
const ECHO_PULSE_WIDTH: Duration = Duration::from_millis(50);

/// Common contract for beat timing sources.
///
/// `update` is called exactly once per frame. The getters are plain
/// reads of the state computed by that call, so repeated reads within
/// one frame always agree.
pub trait ClockSource {
    /// Advance the clock by one frame.
    fn update(&mut self, now: Instant);

    /// Position within the current beat, `0.0` at onset to just under `1.0`.
    fn phase(&self) -> f32;

    /// Current tempo estimate.
    fn bpm(&self) -> f32;

    /// True only on the frame whose `update` crossed a beat boundary.
    fn beat_occurred(&self) -> bool;
}

#[allow(clippy::cast_precision_loss)]
fn seconds_between(earlier: Instant, later: Instant) -> f32 {
    later.duration_since(earlier).as_micros() as f32 / 1_000_000.0
}

fn fract(value: f32) -> f32 {
    value - libm::floorf(value)
}

/// Clock that never beats.
///
/// Stands in when no timing source is wired; effects running against it
/// see phase 0 and the default tempo forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClock;

impl ClockSource for NullClock {
    fn update(&mut self, _now: Instant) {}

    fn phase(&self) -> f32 {
        0.0
    }

    fn bpm(&self) -> f32 {
        DEFAULT_BPM
    }

    fn beat_occurred(&self) -> bool {
        false
    }
}

/// Deterministic clock beating at a configured rate.
///
/// The epoch is the first `update` call; the first beat fires one full
/// period later, so a beat count of `n` spans `n` whole periods.
#[derive(Debug, Clone)]
pub struct FixedBpmClock {
    bpm: f32,
    epoch: Option<Instant>,
    last_beat_number: u64,
    phase: f32,
    beat_this_frame: bool,
}

impl FixedBpmClock {
    /// Create a clock at `bpm` beats per minute.
    pub fn new(bpm: f32) -> Self {
        Self {
            bpm: bpm.max(0.001),
            epoch: None,
            last_beat_number: 0,
            phase: 0.0,
            beat_this_frame: false,
        }
    }

    /// Change the tempo; takes effect on the next `update`.
    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = bpm.max(0.001);
    }
}

impl ClockSource for FixedBpmClock {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn update(&mut self, now: Instant) {
        self.beat_this_frame = false;

        let epoch = *self.epoch.get_or_insert(now);
        let beats = seconds_between(epoch, now) * self.bpm / 60.0;
        let beat_number = beats as u64;

        if beat_number > self.last_beat_number {
            self.beat_this_frame = true;
            self.last_beat_number = beat_number;
        }

        // A synthesized clock has no detection jitter, so the phase can
        // wrap cleanly at the boundary.
        self.phase = fract(beats);
    }

    fn phase(&self) -> f32 {
        self.phase
    }

    fn bpm(&self) -> f32 {
        self.bpm
    }

    fn beat_occurred(&self) -> bool {
        self.beat_this_frame
    }
}

/// Clock driven by explicit [`trigger`](ManualClock::trigger) calls.
///
/// Each trigger marks a beat onset; the tempo is derived from the
/// spacing of consecutive triggers. The beat flag raises on the next
/// `update` after a trigger.
#[derive(Debug, Clone)]
pub struct ManualClock {
    bpm: f32,
    last_beat: Option<Instant>,
    pending: bool,
    phase: f32,
    beat_this_frame: bool,
}

impl ManualClock {
    /// Create a clock reporting `default_bpm` until the second trigger.
    pub fn new(default_bpm: f32) -> Self {
        Self {
            bpm: default_bpm.max(0.001),
            last_beat: None,
            pending: false,
            phase: 0.0,
            beat_this_frame: false,
        }
    }

    /// Register a beat at `now`.
    pub fn trigger(&mut self, now: Instant) {
        if let Some(last) = self.last_beat {
            let period = seconds_between(last, now);
            if period > 0.0 {
                self.bpm = 60.0 / period;
            }
        }
        self.last_beat = Some(now);
        self.pending = true;
    }
}

impl ClockSource for ManualClock {
    fn update(&mut self, now: Instant) {
        self.beat_this_frame = self.pending;
        self.pending = false;

        self.phase = match self.last_beat {
            None => 0.0,
            Some(last) => fract(seconds_between(last, now) * self.bpm / 60.0),
        };
    }

    fn phase(&self) -> f32 {
        self.phase
    }

    fn bpm(&self) -> f32 {
        self.bpm
    }

    fn beat_occurred(&self) -> bool {
        self.beat_this_frame
    }
}

/// Placeholder echo line for clocks without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEcho;

impl PulseOutput for NoEcho {
    fn set(&mut self, _high: bool) {}
}

/// Pulse-locked clock fed by a hardware timing line.
///
/// Rising edges are sampled once per frame. Accepted inter-pulse
/// intervals feed a bounded history; the tempo estimate is the median
/// of that history blended into the previous estimate, which rides out
/// single outlier pulses without the lag of a long moving average.
///
/// The phase is locked to the measured pulse times, not the smoothed
/// BPM: it runs from the last accepted pulse over the median period and
/// holds just short of completion when the next beat is late, so
/// animations never visibly snap backwards.
pub struct HardwareBpmClock<I: PulseInput, E: PulseOutput = NoEcho> {
    input: I,
    echo: Option<E>,
    default_bpm: f32,
    bpm: f32,
    phase: f32,
    last_pulse: Option<Instant>,
    last_level: bool,
    beat_this_frame: bool,
    history: HistoryBuffer<f32, HISTORY_LEN>,
    echo_since: Option<Instant>,
}

impl<I: PulseInput> HardwareBpmClock<I, NoEcho> {
    /// Create a clock sampling `input`, reporting `default_bpm` until
    /// pulses arrive.
    pub fn new(input: I, default_bpm: f32) -> Self {
        Self {
            input,
            echo: None,
            default_bpm: default_bpm.max(0.001),
            bpm: default_bpm.max(0.001),
            phase: 0.0,
            last_pulse: None,
            last_level: false,
            beat_this_frame: false,
            history: HistoryBuffer::new(),
            echo_since: None,
        }
    }
}

impl<I: PulseInput, E: PulseOutput> HardwareBpmClock<I, E> {
    /// Attach an output line echoing each accepted beat as a 50 ms pulse.
    pub fn with_echo<E2: PulseOutput>(self, echo: E2) -> HardwareBpmClock<I, E2> {
        HardwareBpmClock {
            input: self.input,
            echo: Some(echo),
            default_bpm: self.default_bpm,
            bpm: self.bpm,
            phase: self.phase,
            last_pulse: self.last_pulse,
            last_level: self.last_level,
            beat_this_frame: self.beat_this_frame,
            history: self.history,
            echo_since: self.echo_since,
        }
    }

    /// Number of intervals currently in the filter history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Time since the last accepted pulse, if one is tracked.
    pub fn time_since_pulse(&self, now: Instant) -> Option<Duration> {
        self.last_pulse.map(|last| now.duration_since(last))
    }

    fn on_pulse(&mut self, now: Instant) {
        self.beat_this_frame = true;

        if let Some(last) = self.last_pulse {
            let interval = seconds_between(last, now);
            if !(MIN_PULSE_INTERVAL..=MAX_PULSE_INTERVAL).contains(&interval) {
                // Noise: leave the tempo and the phase reference untouched.
                #[cfg(feature = "esp32-log")]
                println!("clock: rejected pulse interval {:.3}s", interval);
                self.beat_this_frame = false;
                return;
            }

            self.history.write(interval);
            if self.history.len() >= MEDIAN_MIN_SAMPLES {
                let candidate = 60.0 / median(&self.history);
                self.bpm = self.bpm * BPM_BLEND + candidate * (1.0 - BPM_BLEND);
            } else {
                self.bpm = 60.0 / interval;
            }
        }

        // The phase reference moves only for accepted pulses, so noise
        // cannot drag the beat grid.
        self.last_pulse = Some(now);

        if let Some(echo) = &mut self.echo {
            echo.set(true);
            self.echo_since = Some(now);
        }
    }

    fn reference_period(&self) -> f32 {
        if self.history.len() >= MEDIAN_MIN_SAMPLES {
            median(&self.history)
        } else {
            60.0 / self.bpm
        }
    }
}

impl<I: PulseInput, E: PulseOutput> ClockSource for HardwareBpmClock<I, E> {
    fn update(&mut self, now: Instant) {
        self.beat_this_frame = false;

        let level = self.input.read();
        if level && !self.last_level {
            self.on_pulse(now);
        }
        self.last_level = level;

        // Prolonged silence means we are no longer synced.
        if let Some(last) = self.last_pulse {
            if now.duration_since(last) > PULSE_TIMEOUT {
                #[cfg(feature = "esp32-log")]
                println!("clock: pulse timeout, back to {:.1} BPM", self.default_bpm);
                self.bpm = self.default_bpm;
                self.history.clear();
                self.last_pulse = None;
            }
        }

        // Release the echo line after its fixed pulse width.
        if let (Some(echo), Some(since)) = (&mut self.echo, self.echo_since) {
            if now.duration_since(since) > ECHO_PULSE_WIDTH {
                echo.set(false);
                self.echo_since = None;
            }
        }

        self.phase = match self.last_pulse {
            None => 0.0,
            Some(last) => {
                let t = seconds_between(last, now) / self.reference_period();
                if t >= 1.0 { LATE_PHASE_HOLD } else { t }
            }
        };
    }

    fn phase(&self) -> f32 {
        self.phase
    }

    fn bpm(&self) -> f32 {
        self.bpm
    }

    fn beat_occurred(&self) -> bool {
        self.beat_this_frame
    }
}

fn median(history: &HistoryBuffer<f32, HISTORY_LEN>) -> f32 {
    let mut sorted = [0.0f32; HISTORY_LEN];
    let len = history.len();
    for (slot, value) in sorted.iter_mut().zip(history.oldest_ordered()) {
        *slot = *value;
    }
    let sorted = &mut sorted[..len];
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));

    if len == 0 {
        return 0.0;
    }
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    } else {
        sorted[len / 2]
    }
}
