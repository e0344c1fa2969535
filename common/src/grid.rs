/// Per-pixel wall occupancy.
///
/// Stored flat in row-major order, `cells[y * width + x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Builds a grid from rows of text, `#` marking an occupied cell.
    ///
    /// Rows shorter than the longest one are padded with empty cells.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set(x, y, true);
                }
            }
        }

        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: bool) {
        let idx = self.index(x, y);
        self.cells[idx] = value;
    }

    #[inline]
    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// Occupied cells as `(x, y)`, row-major.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell)
            .map(|(idx, _)| (idx % self.width, idx / self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::OccupancyGrid;

    #[test]
    fn ascii_layout_is_row_major() {
        let grid = OccupancyGrid::from_ascii(&["#..", "..#"]);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert!(grid.get(0, 0));
        assert!(grid.get(2, 1));
        assert!(!grid.get(2, 0));
        assert_eq!(grid.index(2, 1), 5);
        assert_eq!(grid.occupied(), 2);
        assert_eq!(grid.iter_occupied().collect::<Vec<_>>(), [(0, 0), (2, 1)]);
    }

    #[test]
    fn ragged_rows_are_padded() {
        let grid = OccupancyGrid::from_ascii(&["#", "###"]);
        assert_eq!(grid.width(), 3);
        assert!(!grid.get(1, 0));
        assert!(grid.get(2, 1));
    }

    #[test]
    fn empty() {
        let grid = OccupancyGrid::new(0, 0);
        assert_eq!(grid.occupied(), 0);
        assert_eq!(grid.iter_occupied().count(), 0);
    }
}
