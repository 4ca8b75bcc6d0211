mod tests {
    use core::cell::Cell;

    use beatgrid::clock::{
        ClockSource, DEFAULT_BPM, FixedBpmClock, HardwareBpmClock, ManualClock, NullClock,
    };
    use beatgrid::{Duration, Instant, PulseInput, PulseOutput};

    struct Line {
        level: Cell<bool>,
    }

    impl Line {
        fn new() -> Self {
            Self {
                level: Cell::new(false),
            }
        }

        fn set(&self, high: bool) {
            self.level.set(high);
        }
    }

    impl PulseInput for &Line {
        fn read(&mut self) -> bool {
            self.level.get()
        }
    }

    struct EchoLine {
        level: Cell<bool>,
    }

    impl PulseOutput for &EchoLine {
        fn set(&mut self, high: bool) {
            self.level.set(high);
        }
    }

    fn ms(t: u64) -> Instant {
        Instant::from_millis(t)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    /// Raise the line for one frame, then release it on the next.
    fn pulse(clock: &mut HardwareBpmClock<&Line, impl PulseOutput>, line: &Line, at: u64) {
        line.set(true);
        clock.update(ms(at));
        line.set(false);
        clock.update(ms(at + 1));
    }

    #[test]
    fn null_clock_never_beats() {
        let mut clock = NullClock;
        for t in 0..100 {
            clock.update(ms(t * 33));
            assert!(!clock.beat_occurred());
            assert!(approx(clock.phase(), 0.0));
        }
        assert!(approx(clock.bpm(), DEFAULT_BPM));
    }

    #[test]
    fn fixed_clock_phase_before_and_after_boundary() {
        // 120 BPM: one beat every 500 ms, epoch at the first update.
        let mut clock = FixedBpmClock::new(120.0);
        clock.update(ms(0));
        assert!(!clock.beat_occurred());

        clock.update(ms(490));
        assert!(approx(clock.phase(), 0.98));
        assert!(!clock.beat_occurred());

        clock.update(ms(510));
        assert!(clock.beat_occurred());
        assert!(approx(clock.phase(), 0.02));

        clock.update(ms(520));
        assert!(!clock.beat_occurred());
    }

    #[test]
    fn fixed_clock_four_beats_in_two_seconds() {
        let mut clock = FixedBpmClock::new(120.0);
        let mut beats = 0;
        for t in (0..=2000).step_by(10) {
            clock.update(ms(t));
            if clock.beat_occurred() {
                beats += 1;
            }
        }
        assert_eq!(beats, 4);
    }

    #[test]
    fn fixed_clock_phase_is_idempotent_within_frame() {
        let mut clock = FixedBpmClock::new(90.0);
        clock.update(ms(0));
        clock.update(ms(333));
        let first = clock.phase();
        assert_eq!(clock.phase(), first);
        assert_eq!(clock.phase(), first);
    }

    #[test]
    fn manual_clock_converges_to_trigger_rate() {
        let mut clock = ManualClock::new(60.0);
        clock.trigger(ms(0));
        clock.trigger(ms(500));
        clock.trigger(ms(1000));
        assert!(approx(clock.bpm(), 120.0));

        clock.update(ms(1250));
        assert!(approx(clock.phase(), 0.5));
    }

    #[test]
    fn manual_clock_beat_raises_on_next_update_only() {
        let mut clock = ManualClock::new(60.0);
        clock.trigger(ms(100));
        clock.update(ms(110));
        assert!(clock.beat_occurred());
        clock.update(ms(120));
        assert!(!clock.beat_occurred());
    }

    #[test]
    fn hardware_first_pulse_beats_without_changing_bpm() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 100.0);

        line.set(true);
        clock.update(ms(0));
        assert!(clock.beat_occurred());
        assert!(approx(clock.bpm(), 100.0));
    }

    #[test]
    fn hardware_locks_to_pulse_train() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 60.0);

        for t in [0, 500, 1000, 1500] {
            pulse(&mut clock, &line, t);
        }
        assert!(approx(clock.bpm(), 120.0));
        assert_eq!(clock.history_len(), 3);
    }

    #[test]
    fn hardware_blends_median_into_previous_estimate() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 60.0);

        // Three 0.5 s intervals lock onto 120 BPM.
        for t in [0, 500, 1000, 1500] {
            pulse(&mut clock, &line, t);
        }
        // Three 0.75 s intervals drag the median to 0.625 s (96 BPM);
        // the estimate lands halfway: 0.5*120 + 0.5*96.
        for t in [2250, 3000, 3750] {
            pulse(&mut clock, &line, t);
        }
        assert!(approx(clock.bpm(), 108.0));
    }

    #[test]
    fn hardware_rejects_out_of_range_interval() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 60.0);

        for t in [0, 500, 1000] {
            pulse(&mut clock, &line, t);
        }
        assert!(approx(clock.bpm(), 120.0));

        // 100 ms is outside the 40-240 BPM window: no beat, no state change.
        line.set(true);
        clock.update(ms(1100));
        assert!(!clock.beat_occurred());
        assert!(approx(clock.bpm(), 120.0));
        assert_eq!(
            clock.time_since_pulse(ms(1100)),
            Some(Duration::from_millis(100))
        );
        line.set(false);
        clock.update(ms(1101));

        // The next valid pulse measures from the last accepted one.
        line.set(true);
        clock.update(ms(1500));
        assert!(clock.beat_occurred());
        assert_eq!(clock.history_len(), 3);
    }

    #[test]
    fn hardware_timeout_resets_to_default() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 60.0);

        for t in [0, 300, 600, 900] {
            pulse(&mut clock, &line, t);
        }
        assert!(approx(clock.bpm(), 200.0));
        assert_eq!(clock.history_len(), 3);

        // Four seconds of silence: back to the default, history gone.
        clock.update(ms(4900));
        assert!(approx(clock.bpm(), 60.0));
        assert_eq!(clock.history_len(), 0);
        assert_eq!(clock.time_since_pulse(ms(4900)), None);
        assert!(approx(clock.phase(), 0.0));
    }

    #[test]
    fn hardware_phase_holds_short_of_wrap_when_late() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 60.0);

        pulse(&mut clock, &line, 0);
        pulse(&mut clock, &line, 500);
        assert!(approx(clock.bpm(), 120.0));

        clock.update(ms(750));
        assert!(approx(clock.phase(), 0.5));

        // The expected beat at 1000 ms never arrives: the phase sticks
        // near completion instead of wrapping.
        clock.update(ms(1100));
        assert!(approx(clock.phase(), 0.95));
        clock.update(ms(2000));
        assert!(approx(clock.phase(), 0.95));
    }

    #[test]
    fn hardware_echoes_accepted_beats_for_50ms() {
        let line = Line::new();
        let echo = EchoLine {
            level: Cell::new(false),
        };
        let mut clock = HardwareBpmClock::new(&line, 60.0).with_echo(&echo);

        line.set(true);
        clock.update(ms(0));
        assert!(echo.level.get());
        line.set(false);

        clock.update(ms(30));
        assert!(echo.level.get());
        clock.update(ms(60));
        assert!(!echo.level.get());
    }

    #[test]
    fn tap_line_drives_pulse_clock() {
        use beatgrid::TapLine;

        let taps = TapLine::new();
        let mut clock = HardwareBpmClock::new(&taps, 60.0);

        taps.notify();
        clock.update(ms(0));
        assert!(clock.beat_occurred());

        // The latch clears after one sample.
        clock.update(ms(100));
        assert!(!clock.beat_occurred());

        taps.notify();
        clock.update(ms(500));
        assert!(clock.beat_occurred());
        assert!(approx(clock.bpm(), 120.0));
    }

    #[test]
    fn hardware_beat_flag_lasts_one_frame() {
        let line = Line::new();
        let mut clock = HardwareBpmClock::new(&line, 60.0);

        line.set(true);
        clock.update(ms(0));
        assert!(clock.beat_occurred());

        // Line still high: no new edge, no new beat.
        clock.update(ms(33));
        assert!(!clock.beat_occurred());

        line.set(false);
        clock.update(ms(66));
        assert!(!clock.beat_occurred());
    }
}
