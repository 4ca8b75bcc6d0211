//! Named colors shared by the built-in effects.

use super::Rgb;
use crate::rng::SmallRng;

pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const YELLOW: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 0,
};
pub const ORANGE: Rgb = Rgb {
    r: 255,
    g: 128,
    b: 0,
};
pub const PURPLE: Rgb = Rgb {
    r: 128,
    g: 0,
    b: 255,
};
pub const MAGENTA: Rgb = Rgb {
    r: 255,
    g: 0,
    b: 128,
};
pub const CYAN: Rgb = Rgb {
    r: 0,
    g: 255,
    b: 255,
};

/// The saturated named colors, in a fixed order.
///
/// White and black are excluded so a random pick always reads as a color.
pub const NAMED: [Rgb; 8] = [RED, GREEN, BLUE, YELLOW, ORANGE, PURPLE, MAGENTA, CYAN];

/// Pick one of the saturated named colors.
pub fn random_color(rng: &mut SmallRng) -> Rgb {
    NAMED[rng.next_below(NAMED.len() as u32) as usize]
}
