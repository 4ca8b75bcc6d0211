//! Conway's Game of Life advancing one generation per beat.

use embassy_time::Instant;

use super::{Effect, Rhythm, Step};
use crate::canvas::Canvas;
use crate::color::{NAMED, OFF, Rgb, wheel};
use crate::math8::scale8;
use crate::rng::SmallRng;

// Board capacity; larger grids are clipped.
const MAX_COLS: usize = 64;
const MAX_ROWS: usize = 32;

/// Beats a dead or unchanging board survives before reseeding.
const STUCK_RESEED_BEATS: u32 = 15;
/// Dead-cell brightness, roughly 1/7 of full.
const BACKGROUND_DIM: u8 = 36;
/// Wheel advance per reseed in wheel mode.
const WHEEL_STEP: u8 = 40;
/// Opposite side of the color wheel, for the background.
const COMPLEMENT_OFFSET: u8 = 128;
// Seed density range for fresh boards.
const MIN_DENSITY: f32 = 0.35;
const DENSITY_SPREAD: f32 = 0.10;

/// Toroidal bitboard, one `u64` per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Board {
    rows: [u64; MAX_ROWS],
}

impl Board {
    const fn empty() -> Self {
        Self {
            rows: [0; MAX_ROWS],
        }
    }

    fn get(&self, x: usize, y: usize) -> bool {
        (self.rows[y] >> x) & 1 == 1
    }

    fn set(&mut self, x: usize, y: usize) {
        self.rows[y] |= 1 << x;
    }

    fn count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// One generation: survive on 2-3 neighbors, spawn on exactly 3.
    /// Edges wrap.
    fn step(&self, cols: usize, rows: usize) -> Self {
        let mut next = Self::empty();
        for y in 0..rows {
            for x in 0..cols {
                let mut neighbors = 0;
                // `cols - 1` acts as -1 under the modulus.
                for dy in [rows - 1, 0, 1] {
                    for dx in [cols - 1, 0, 1] {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        if self.get((x + dx) % cols, (y + dy) % rows) {
                            neighbors += 1;
                        }
                    }
                }
                if neighbors == 3 || (self.get(x, y) && neighbors == 2) {
                    next.set(x, y);
                }
            }
        }
        next
    }
}

/// Game of Life stepping once per beat.
///
/// A board that dies out or stops changing is reseeded after
/// [`STUCK_RESEED_BEATS`], each time with a new color pair: live cells
/// bright, dead cells a dim complementary backdrop.
#[derive(Debug, Clone)]
pub struct LifeEffect {
    rainbow: bool,
    cols: usize,
    rows: usize,
    board: Board,
    prev: Option<Board>,
    stuck: u32,
    alive_color: Rgb,
    dead_color: Rgb,
    wheel_pos: u8,
    rng: SmallRng,
}

impl LifeEffect {
    pub fn new() -> Self {
        Self {
            rainbow: false,
            cols: 0,
            rows: 0,
            board: Board::empty(),
            prev: None,
            stuck: 0,
            alive_color: OFF,
            dead_color: OFF,
            wheel_pos: 0,
            rng: SmallRng::new(0),
        }
    }

    /// Walk the color wheel on each reseed instead of picking from the
    /// named palette.
    #[must_use]
    pub fn rainbow(mut self) -> Self {
        self.rainbow = true;
        self
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn reseed(&mut self) {
        self.board = Board::empty();

        if self.rainbow {
            self.alive_color = wheel(self.wheel_pos);
            let base = wheel(self.wheel_pos.wrapping_add(COMPLEMENT_OFFSET));
            self.dead_color = dim(base);
            self.wheel_pos = self.wheel_pos.wrapping_add(WHEEL_STEP);
        } else {
            let alive = self.rng.next_below(NAMED.len() as u32) as usize;
            // Background takes a different named color, dimmed.
            let offset = 1 + self.rng.next_below(NAMED.len() as u32 - 1) as usize;
            self.alive_color = NAMED[alive];
            self.dead_color = dim(NAMED[(alive + offset) % NAMED.len()]);
        }

        let density = MIN_DENSITY + self.rng.next_f32() * DENSITY_SPREAD;
        let seeds = ((self.cols * self.rows) as f32 * density) as u32;
        for _ in 0..seeds {
            let x = self.rng.next_below(self.cols as u32) as usize;
            let y = self.rng.next_below(self.rows as u32) as usize;
            self.board.set(x, y);
        }

        self.stuck = 0;
    }
}

fn dim(color: Rgb) -> Rgb {
    Rgb {
        r: scale8(color.r, BACKGROUND_DIM),
        g: scale8(color.g, BACKGROUND_DIM),
        b: scale8(color.b, BACKGROUND_DIM),
    }
}

impl Default for LifeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for LifeEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn setup(&mut self, canvas: &mut Canvas<'_>, now: Instant) {
        self.rng = SmallRng::new(now.as_ticks());
        self.cols = canvas.width().clamp(1, MAX_COLS);
        self.rows = canvas.height().clamp(1, MAX_ROWS);
        self.prev = None;
        self.wheel_pos = if self.rainbow {
            self.rng.next_u32() as u8
        } else {
            0
        };
        self.reseed();
    }

    fn update(&mut self, canvas: &mut Canvas<'_>, rhythm: &Rhythm, _frame: u32) -> Step {
        // The simulation advances on beats only; drawing happens every
        // frame so reseeds and color changes land immediately.
        if rhythm.beat {
            let dead = self.board.count() == 0;
            let unchanged = self.prev == Some(self.board);

            if dead || unchanged {
                self.stuck += 1;
                if self.stuck > STUCK_RESEED_BEATS {
                    self.reseed();
                }
            } else {
                self.stuck = 0;
            }

            self.prev = Some(self.board);
            self.board = self.board.step(self.cols, self.rows);
        }

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                let alive = x < self.cols && y < self.rows && self.board.get(x, y);
                let color = if alive {
                    self.alive_color
                } else {
                    self.dead_color
                };
                canvas.set(x, y, color);
            }
        }
        Step::Continue
    }
}
