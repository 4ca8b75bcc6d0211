mod tests {
    use beatgrid::color::{
        BLUE, GREEN, NAMED, RED, Rgb, lerp_color, random_color, scale_color, wheel,
    };
    use beatgrid::rng::SmallRng;

    #[test]
    fn test_wheel_sector_endpoints() {
        assert_eq!(wheel(0), RED);
        assert_eq!(wheel(85), GREEN);
        assert_eq!(wheel(170), BLUE);
    }

    #[test]
    fn test_wheel_mixes_two_channels() {
        let mid = wheel(42);
        assert_eq!(mid.b, 0);
        assert!(mid.r > 0 && mid.g > 0);
    }

    #[test]
    fn test_scale_color_half() {
        let scaled = scale_color(Rgb::new(200, 100, 0), 0.5);
        assert_eq!(scaled, Rgb::new(100, 50, 0));
    }

    #[test]
    fn test_scale_color_extremes() {
        let color = Rgb::new(10, 200, 31);
        assert_eq!(scale_color(color, 1.0), color);
        assert_eq!(scale_color(color, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_lerp_color_endpoints() {
        let a = Rgb::new(0, 10, 250);
        let b = Rgb::new(255, 0, 5);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
    }

    #[test]
    fn test_random_color_picks_named() {
        let mut rng = SmallRng::new(7);
        for _ in 0..32 {
            let color = random_color(&mut rng);
            assert!(NAMED.contains(&color));
        }
    }
}
