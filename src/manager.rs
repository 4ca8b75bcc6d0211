//! Effect scheduling and frame pacing.
//!
//! The manager owns the frame buffer, the output driver, the shared
//! clock, and a cyclic queue of effect specifications. Each frame it
//! advances the clock, runs the current effect, presents the buffer,
//! and paces itself to the target frame rate. Every scheduling turn
//! ends with exactly one `cleanup`, whichever way it ends.

use core::convert::Infallible;

use embassy_time::{Duration, Instant, block_for};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::canvas::Canvas;
use crate::clock::ClockSource;
use crate::color::Rgb;
use crate::effect::{EffectSlot, Rhythm, Step};
use crate::grid::GridMap;

/// Default target frame rate.
pub const DEFAULT_FPS: u32 = 30;

/// Stop condition for one queue entry. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Stop once this many beats have passed on the shared clock.
    ///
    /// Under a clock that never beats the count is never reached, so
    /// this degenerates to [`StopRule::UntilDone`].
    Beats(u16),
    /// Stop once this much wall time has passed since the turn's setup.
    Timed(Duration),
    /// Run until the effect reports done.
    UntilDone,
}

/// Immutable queue entry: an effect prototype plus its stop rule.
///
/// The prototype is cloned for every scheduling turn, so each run
/// starts from fresh state.
#[derive(Debug, Clone)]
pub struct EffectSpec {
    slot: EffectSlot,
    stop: StopRule,
}

impl EffectSpec {
    /// Run the effect until it reports done.
    pub fn new(slot: EffectSlot) -> Self {
        Self {
            slot,
            stop: StopRule::UntilDone,
        }
    }

    /// Stop after `beats` beats.
    #[must_use]
    pub fn with_beats(mut self, beats: u16) -> Self {
        self.stop = StopRule::Beats(beats);
        self
    }

    /// Stop after `duration` of wall time.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.stop = StopRule::Timed(duration);
        self
    }

    pub const fn stop_rule(&self) -> StopRule {
        self.stop
    }
}

/// Configuration error reported when scheduling cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// The effect queue is empty.
    EmptyQueue,
}

/// Error returned when the queue is full; carries the spec back.
#[derive(Debug, Clone)]
pub struct QueueFullError(pub EffectSpec);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// State of the effect currently on screen.
struct ActiveRun {
    effect: EffectSlot,
    stop: StopRule,
    started_at: Instant,
    beats_seen: u16,
    frames: u32,
}

impl ActiveRun {
    fn expired(&self, now: Instant) -> bool {
        match self.stop {
            StopRule::Beats(target) => self.beats_seen >= target,
            StopRule::Timed(duration) => now.duration_since(self.started_at) >= duration,
            StopRule::UntilDone => false,
        }
    }
}

/// Cycles a queue of effects against a shared clock.
///
/// `MAX_LEDS` bounds the frame buffer; `MAX_EFFECTS` bounds the queue.
/// Pass [`NullClock`](crate::clock::NullClock) when no timing source
/// is wired.
pub struct EffectManager<C, O, const MAX_LEDS: usize, const MAX_EFFECTS: usize>
where
    C: ClockSource,
    O: OutputDriver,
{
    output: O,
    clock: C,
    grid: GridMap,
    queue: Vec<EffectSpec, MAX_EFFECTS>,
    cursor: usize,
    frame_buffer: [Rgb; MAX_LEDS],
    active: Option<ActiveRun>,
    frame_duration: Duration,
    next_frame: Instant,
}

impl<C, O, const MAX_LEDS: usize, const MAX_EFFECTS: usize>
    EffectManager<C, O, MAX_LEDS, MAX_EFFECTS>
where
    C: ClockSource,
    O: OutputDriver,
{
    /// Create a manager over the given grid, clock, and output driver.
    ///
    /// Uses [`DEFAULT_FPS`] until [`run`](Self::run) sets a rate.
    pub fn new(grid: GridMap, clock: C, output: O) -> Self {
        Self {
            output,
            clock,
            grid,
            queue: Vec::new(),
            cursor: 0,
            frame_buffer: [Rgb::default(); MAX_LEDS],
            active: None,
            frame_duration: Duration::from_micros(1_000_000 / u64::from(DEFAULT_FPS)),
            next_frame: Instant::from_millis(0),
        }
    }

    /// Append a specification. Order is preserved, duplicates allowed.
    pub fn enqueue(&mut self, spec: EffectSpec) -> Result<(), QueueFullError> {
        self.queue.push(spec).map_err(QueueFullError)
    }

    /// Append the same specification several times in a row.
    pub fn enqueue_repeated(
        &mut self,
        spec: &EffectSpec,
        times: usize,
    ) -> Result<(), QueueFullError> {
        for _ in 0..times {
            self.enqueue(spec.clone())?;
        }
        Ok(())
    }

    /// Get a reference to the shared clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get a mutable reference to the shared clock (e.g. for manual
    /// beat triggers).
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Get a reference to the output driver.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output driver.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Queue position of the specification currently scheduled.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Run forever at `fps` frames per second, blocking between frames.
    ///
    /// Returns only if the queue is empty at entry.
    pub fn run(&mut self, fps: u32) -> Result<Infallible, ScheduleError> {
        if self.queue.is_empty() {
            return Err(ScheduleError::EmptyQueue);
        }
        self.frame_duration = Duration::from_micros(1_000_000 / u64::from(fps.max(1)));

        loop {
            let result = self.tick(Instant::now())?;
            block_for(result.sleep_duration);
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This is the testable core of the scheduler; [`run`](Self::run)
    /// is a thin pacing loop around it. The caller is responsible for
    /// waiting until `next_deadline` before calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> Result<FrameResult, ScheduleError> {
        if self.queue.is_empty() {
            return Err(ScheduleError::EmptyQueue);
        }

        // Close out a run whose stop rule expired since the last frame,
        // then make sure a run is active.
        if self.active.as_ref().is_some_and(|run| run.expired(now)) {
            self.finish_active();
        }
        if self.active.is_none() {
            self.start_next(now);
        }

        // One clock update per frame, then an immutable snapshot: every
        // read an effect makes this frame agrees with every other.
        self.clock.update(now);
        let rhythm = Rhythm::from_clock(&self.clock);

        let led_count = self.grid.led_count().min(MAX_LEDS);
        let mut done = false;

        {
            let Self {
                active,
                frame_buffer,
                grid,
                output,
                ..
            } = self;

            if let Some(run) = active.as_mut() {
                if rhythm.beat {
                    if let StopRule::Beats(_target) = run.stop {
                        run.beats_seen += 1;
                        #[cfg(feature = "esp32-log")]
                        println!(
                            "manager: beat {}/{} at {:.1} BPM",
                            run.beats_seen, _target, rhythm.bpm
                        );
                    }
                }

                let mut canvas = Canvas::new(&mut frame_buffer[..led_count], grid);
                let step = run.effect.update(&mut canvas, &rhythm, run.frames);
                run.frames += 1;

                output.write(&frame_buffer[..led_count]);
                done = step == Step::Done;
            }
        }

        if done {
            self.finish_active();
        }

        Ok(self.pace(now))
    }

    /// Instantiate and set up the effect at the cursor.
    fn start_next(&mut self, now: Instant) {
        let led_count = self.grid.led_count().min(MAX_LEDS);
        let Self {
            active,
            frame_buffer,
            grid,
            queue,
            cursor,
            ..
        } = self;

        let Some(spec) = queue.get(*cursor) else {
            return;
        };
        let mut effect = spec.slot.clone();

        #[cfg(feature = "esp32-log")]
        println!("manager: running {} ({:?})", effect.name(), spec.stop);

        let mut canvas = Canvas::new(&mut frame_buffer[..led_count], grid);
        effect.setup(&mut canvas, now);

        *active = Some(ActiveRun {
            effect,
            stop: spec.stop,
            started_at: now,
            beats_seen: 0,
            frames: 0,
        });
    }

    /// Clean up the active run and advance the cursor cyclically.
    ///
    /// The terminal buffer state is presented so the strip matches
    /// whatever cleanup left behind.
    fn finish_active(&mut self) {
        let led_count = self.grid.led_count().min(MAX_LEDS);
        let Self {
            active,
            frame_buffer,
            grid,
            output,
            queue,
            cursor,
            ..
        } = self;

        if let Some(mut run) = active.take() {
            let mut canvas = Canvas::new(&mut frame_buffer[..led_count], grid);
            run.effect.cleanup(&mut canvas);
            output.write(&frame_buffer[..led_count]);

            *cursor = (*cursor + 1) % queue.len();
        }
    }

    /// Track the frame deadline and compute how long to sleep.
    fn pace(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to
        // now. This prevents catch-up bursts after long stalls.
        let max_drift_us = self.frame_duration.as_micros() * 2;
        if now.as_micros() > self.next_frame.as_micros() + max_drift_us {
            self.next_frame = now;
        }

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame.as_micros() > now.as_micros() {
            Duration::from_micros(self.next_frame.as_micros() - now.as_micros())
        } else {
            Duration::from_micros(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }
}
