//! Coordinate mapping between grid space and LED strip indices.
//!
//! Matrices are rarely wired row by row; the mapping from `(x, y)` to a
//! strip index depends on the physical wiring. Effects draw in grid
//! space and let the map resolve indices.

/// Physical wiring pattern of a LED matrix.
#[derive(Debug, Clone, Copy)]
pub enum GridLayout {
    /// Row-major wiring: `index = y * width + x`.
    RowMajor,
    /// Serpentine wiring: even rows run left to right, odd rows reversed.
    Serpentine,
    /// Hand-wired layout described by a row-major table of strip indices.
    ///
    /// The table holds one entry per grid cell; entries may exceed
    /// `width * height` when the strip carries unmapped LEDs.
    Lookup(&'static [u16]),
}

/// Immutable grid-to-strip coordinate map.
#[derive(Debug, Clone, Copy)]
pub struct GridMap {
    width: usize,
    height: usize,
    layout: GridLayout,
    leds: usize,
}

impl GridMap {
    /// Create a map for a `width` x `height` matrix with the given wiring.
    ///
    /// For [`GridLayout::Lookup`], the strip length is derived from the
    /// largest index in the table, so gaps in the wiring stay addressable.
    pub fn new(width: usize, height: usize, layout: GridLayout) -> Self {
        let leds = match layout {
            GridLayout::RowMajor | GridLayout::Serpentine => width * height,
            GridLayout::Lookup(table) => table
                .iter()
                .map(|&id| id as usize + 1)
                .max()
                .unwrap_or(0),
        };
        Self {
            width,
            height,
            layout,
            leds,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of LEDs on the strip this map addresses.
    pub const fn led_count(&self) -> usize {
        self.leds
    }

    /// Map grid coordinates to a strip index.
    ///
    /// Returns `None` for coordinates outside the grid or cells missing
    /// from a lookup table.
    pub fn to_index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.layout {
            GridLayout::RowMajor => Some(y * self.width + x),
            GridLayout::Serpentine => {
                if y % 2 == 0 {
                    Some(y * self.width + x)
                } else {
                    Some(y * self.width + (self.width - 1 - x))
                }
            }
            GridLayout::Lookup(table) => {
                table.get(y * self.width + x).map(|&id| id as usize)
            }
        }
    }
}
