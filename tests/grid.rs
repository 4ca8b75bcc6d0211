mod tests {
    use beatgrid::grid::{GridLayout, GridMap};

    #[test]
    fn test_row_major_mapping() {
        let grid = GridMap::new(4, 3, GridLayout::RowMajor);
        assert_eq!(grid.to_index(0, 0), Some(0));
        assert_eq!(grid.to_index(3, 0), Some(3));
        assert_eq!(grid.to_index(1, 2), Some(9));
        assert_eq!(grid.led_count(), 12);
    }

    #[test]
    fn test_serpentine_reverses_odd_rows() {
        let grid = GridMap::new(4, 2, GridLayout::Serpentine);
        assert_eq!(grid.to_index(0, 0), Some(0));
        assert_eq!(grid.to_index(3, 0), Some(3));
        // Odd row runs right to left.
        assert_eq!(grid.to_index(0, 1), Some(7));
        assert_eq!(grid.to_index(3, 1), Some(4));
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = GridMap::new(4, 3, GridLayout::RowMajor);
        assert_eq!(grid.to_index(4, 0), None);
        assert_eq!(grid.to_index(0, 3), None);
    }

    #[test]
    fn test_lookup_table_mapping() {
        static TABLE: [u16; 4] = [3, 2, 1, 0];
        let grid = GridMap::new(2, 2, GridLayout::Lookup(&TABLE));
        assert_eq!(grid.to_index(0, 0), Some(3));
        assert_eq!(grid.to_index(1, 1), Some(0));
        assert_eq!(grid.led_count(), 4);
    }

    #[test]
    fn test_lookup_table_with_unmapped_leds() {
        // A strip can carry LEDs no grid cell points at.
        static TABLE: [u16; 2] = [5, 9];
        let grid = GridMap::new(2, 1, GridLayout::Lookup(&TABLE));
        assert_eq!(grid.to_index(1, 0), Some(9));
        assert_eq!(grid.led_count(), 10);
    }
}
