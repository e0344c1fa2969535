use crate::OccupancyGrid;
use rkyv::Archive;
use serde::{Deserialize, Serialize};

/// Center of a rectangle in pixel coordinates.
///
/// Half-integer whenever the rectangle spans an even number of pixels on that axis.
#[derive(
    Archive, Clone, Copy, Debug, PartialEq, Serialize, Deserialize, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

/// Size of a rectangle in whole pixels.
#[derive(
    Archive, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Extent {
    pub x: u32,
    pub y: u32,
}

#[derive(
    Archive, Clone, Copy, Debug, PartialEq, Serialize, Deserialize, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Rect {
    pub position: Center,
    pub scale: Extent,
}

impl Rect {
    /// Rectangle covering columns `x0..x0 + width` and rows `y0..y0 + height`.
    pub fn from_block(x0: u32, y0: u32, width: u32, height: u32) -> Self {
        Self {
            position: Center {
                x: f64::from(x0) + f64::from(width) / 2.0 - 0.5,
                y: f64::from(y0) + f64::from(height) / 2.0 - 0.5,
            },
            scale: Extent {
                x: width,
                y: height,
            },
        }
    }

    /// Top-left covered cell.
    pub fn origin(&self) -> (u32, u32) {
        let x = self.position.x + 0.5 - f64::from(self.scale.x) / 2.0;
        let y = self.position.y + 0.5 - f64::from(self.scale.y) / 2.0;
        (x.round() as u32, y.round() as u32)
    }

    /// Every covered cell as `(x, y)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, y0) = self.origin();
        let Extent { x: width, y: height } = self.scale;
        (y0..y0 + height).flat_map(move |y| (x0..x0 + width).map(move |x| (x, y)))
    }
}

struct Scan<'a> {
    grid: &'a OccupancyGrid,
    visited: Vec<bool>,
}

impl Scan<'_> {
    #[inline]
    fn is_free(&self, x: usize, y: usize) -> bool {
        let idx = self.grid.index(x, y);
        self.grid.cells()[idx] && !self.visited[idx]
    }

    fn row_is_free(&self, y: usize, columns: std::ops::Range<usize>) -> bool {
        columns.into_iter().all(|x| self.is_free(x, y))
    }

    fn mark(&mut self, x0: usize, y0: usize, width: usize, height: usize) {
        for y in y0..y0 + height {
            let start = self.grid.index(x0, y);
            self.visited[start..start + width].fill(true);
        }
    }
}

/// Merges the occupied cells of `grid` into non-overlapping rectangles.
///
/// Greedy: scanning row-major, each unvisited occupied cell starts a horizontal
/// run which is then grown downward for as long as the rows below are fully
/// occupied and unvisited across the same columns. Scanning resumes right after
/// the run. The result covers the grid exactly but is not minimal.
pub fn compress(grid: &OccupancyGrid) -> Vec<Rect> {
    let (width, height) = (grid.width(), grid.height());
    let mut scan = Scan {
        grid,
        visited: vec![false; width * height],
    };

    let mut rects = Vec::new();
    for y in 0..height {
        let mut x = 0;
        while x < width {
            if !scan.is_free(x, y) {
                x += 1;
                continue;
            }

            let start_x = x;
            while x < width && scan.is_free(x, y) {
                x += 1;
            }

            let mut block_height = 0;
            while y + block_height < height && scan.row_is_free(y + block_height, start_x..x) {
                block_height += 1;
            }

            scan.mark(start_x, y, x - start_x, block_height);
            rects.push(Rect::from_block(
                start_x as u32,
                y as u32,
                (x - start_x) as u32,
                block_height as u32,
            ));
        }
    }

    debug!(
        cells = grid.occupied(),
        rects = rects.len(),
        "compressed wall mask"
    );

    rects
}
