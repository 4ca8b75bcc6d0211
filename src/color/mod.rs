mod palette;
mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use palette::{
    BLUE, CYAN, GREEN, MAGENTA, NAMED, OFF, ORANGE, PURPLE, RED, WHITE, YELLOW, random_color,
};
pub use utils::{blend_colors, lerp_color, scale_color, wheel};

pub type Rgb = RGB8;
pub type Hsv = HSV;
