mod tests {
    use beatgrid::effect::{FlashEffect, PixelFillEffect, WaveEffect};
    use beatgrid::{
        Duration, EffectManager, EffectSlot, EffectSpec, FixedBpmClock, GridLayout, GridMap,
        Instant, NullClock, OutputDriver, Rgb, ScheduleError,
    };

    #[derive(Default)]
    struct TestDriver {
        frames: Vec<Vec<Rgb>>,
    }

    impl OutputDriver for TestDriver {
        fn write(&mut self, colors: &[Rgb]) {
            self.frames.push(colors.to_vec());
        }
    }

    fn ms(t: u64) -> Instant {
        Instant::from_millis(t)
    }

    fn grid_4x2() -> GridMap {
        GridMap::new(4, 2, GridLayout::RowMajor)
    }

    fn all_off(frame: &[Rgb]) -> bool {
        frame.iter().all(|color| *color == Rgb::new(0, 0, 0))
    }

    #[test]
    fn empty_queue_refuses_to_start() {
        let mut manager = EffectManager::<NullClock, TestDriver, 16, 4>::new(
            grid_4x2(),
            NullClock,
            TestDriver::default(),
        );
        assert!(matches!(manager.run(30), Err(ScheduleError::EmptyQueue)));
        assert!(matches!(
            manager.tick(ms(0)),
            Err(ScheduleError::EmptyQueue)
        ));
        assert!(manager.output().frames.is_empty());
    }

    #[test]
    fn full_queue_returns_the_spec() {
        let mut manager = EffectManager::<NullClock, TestDriver, 16, 1>::new(
            grid_4x2(),
            NullClock,
            TestDriver::default(),
        );
        assert!(
            manager
                .enqueue(EffectSpec::new(EffectSlot::Wave(WaveEffect::new())))
                .is_ok()
        );
        assert!(
            manager
                .enqueue(EffectSpec::new(EffectSlot::Wave(WaveEffect::new())))
                .is_err()
        );
    }

    #[test]
    fn beat_count_stops_after_four_beats() {
        // 120 BPM: beats land at 0.5, 1.0, 1.5 and 2.0 s. The turn ends
        // on the first frame after the fourth beat.
        let mut manager = EffectManager::<FixedBpmClock, TestDriver, 16, 4>::new(
            grid_4x2(),
            FixedBpmClock::new(120.0),
            TestDriver::default(),
        );
        manager
            .enqueue(EffectSpec::new(EffectSlot::Wave(WaveEffect::new())).with_beats(4))
            .unwrap();
        manager
            .enqueue(EffectSpec::new(EffectSlot::Flash(FlashEffect::new())))
            .unwrap();

        let mut advanced_at = None;
        for t in (0..=2100u64).step_by(10) {
            manager.tick(ms(t)).unwrap();
            if advanced_at.is_none() && manager.cursor() == 1 {
                advanced_at = Some(t);
            }
        }
        assert_eq!(advanced_at, Some(2010));
        assert_eq!(manager.cursor(), 1);

        // Ticks 0..=2000 wrote one frame each; the transition tick wrote
        // the cleanup frame (cleared) and then the next effect's first.
        let frames = &manager.output().frames;
        assert!(all_off(&frames[201]));
        assert!(!all_off(&frames[202]));
    }

    #[test]
    fn duration_stop_cycles_the_queue() {
        let mut manager = EffectManager::<NullClock, TestDriver, 16, 4>::new(
            grid_4x2(),
            NullClock,
            TestDriver::default(),
        );
        let spec = EffectSpec::new(EffectSlot::Wave(WaveEffect::new()));
        manager
            .enqueue(spec.clone().with_duration(Duration::from_millis(1000)))
            .unwrap();
        manager
            .enqueue(spec.with_duration(Duration::from_millis(500)))
            .unwrap();

        let mut transitions = Vec::new();
        let mut cursor = 0;
        for t in (0..=1500u64).step_by(100) {
            manager.tick(ms(t)).unwrap();
            if manager.cursor() != cursor {
                cursor = manager.cursor();
                transitions.push((t, cursor));
            }
        }
        // First spec ends after 1.0 s, second after a further 0.5 s,
        // wrapping back to the head of the queue.
        assert_eq!(transitions, vec![(1000, 1), (1500, 0)]);
    }

    #[test]
    fn self_terminating_effect_advances_queue() {
        let grid = GridMap::new(2, 2, GridLayout::RowMajor);
        let mut manager = EffectManager::<NullClock, TestDriver, 16, 4>::new(
            grid,
            NullClock,
            TestDriver::default(),
        );
        manager
            .enqueue(EffectSpec::new(EffectSlot::PixelFill(PixelFillEffect::new())))
            .unwrap();
        manager
            .enqueue(EffectSpec::new(EffectSlot::Flash(FlashEffect::new())))
            .unwrap();

        // Four pixels plus a 30 frame hold: done on the frame after.
        for i in 0..35u64 {
            manager.tick(ms(i * 10)).unwrap();
            assert_eq!(manager.cursor(), 0);
        }
        manager.tick(ms(350)).unwrap();
        assert_eq!(manager.cursor(), 1);

        // Cleanup presented a cleared frame before the next turn began.
        let frames = &manager.output().frames;
        assert!(all_off(&frames[frames.len() - 1]));
    }

    #[test]
    fn beat_rule_without_beats_degenerates_to_until_done() {
        // A never-beating clock can't satisfy a beat count; the effect's
        // own completion still ends the turn.
        let grid = GridMap::new(2, 2, GridLayout::RowMajor);
        let mut manager = EffectManager::<NullClock, TestDriver, 16, 4>::new(
            grid,
            NullClock,
            TestDriver::default(),
        );
        manager
            .enqueue(
                EffectSpec::new(EffectSlot::PixelFill(PixelFillEffect::new())).with_beats(4),
            )
            .unwrap();

        for i in 0..=35u64 {
            manager.tick(ms(i * 10)).unwrap();
        }
        // Single-entry queue: the cursor wraps back onto the same spec.
        assert_eq!(manager.cursor(), 0);
        {
            let frames = &manager.output().frames;
            assert!(all_off(&frames[frames.len() - 1]));
        }

        // The next turn starts from fresh state: one painted pixel.
        manager.tick(ms(360)).unwrap();
        let frames = &manager.output().frames;
        let lit = frames[frames.len() - 1]
            .iter()
            .filter(|color| **color != Rgb::new(0, 0, 0))
            .count();
        assert_eq!(lit, 1);
    }
}
