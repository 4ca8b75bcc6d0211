use super::Rgb;
use crate::math8::{blend8, scale8};

/// Rainbow color from a position on a 0-255 color wheel.
///
/// Classic three-sector wheel: red→green, green→blue, blue→red.
pub const fn wheel(pos: u8) -> Rgb {
    if pos < 85 {
        Rgb {
            r: 255 - pos * 3,
            g: pos * 3,
            b: 0,
        }
    } else if pos < 170 {
        let pos = pos - 85;
        Rgb {
            r: 0,
            g: 255 - pos * 3,
            b: pos * 3,
        }
    } else {
        let pos = pos - 170;
        Rgb {
            r: pos * 3,
            g: 0,
            b: 255 - pos * 3,
        }
    }
}

/// Scale a color by a brightness factor in `[0.0, 1.0]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_color(color: Rgb, brightness: f32) -> Rgb {
    let scale = (brightness.clamp(0.0, 1.0) * 255.0) as u8;
    Rgb {
        r: scale8(color.r, scale),
        g: scale8(color.g, scale),
        b: scale8(color.b, scale),
    }
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Linear interpolation between two colors, `t` in `[0.0, 1.0]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    blend_colors(a, b, (t.clamp(0.0, 1.0) * 255.0) as u8)
}
