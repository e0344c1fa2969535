use crate::{OccupancyGrid, Pixel, PixelClass, Point};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("expected {expected} pixels for a {width}x{height} bitmap, got {actual}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Everything the classifier pulls out of one bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    pub grid: OccupancyGrid,
    pub walls: Vec<Point>,
    pub player: Option<Point>,
    pub goal: Option<Point>,
}

/// Scans a row-major RGBA bitmap.
///
/// Duplicate player or goal pixels overwrite each other in scan order, so the
/// last one wins.
pub fn classify<I>(width: u32, height: u32, pixels: I) -> Result<Classified, ClassifyError>
where
    I: IntoIterator<Item = Pixel>,
{
    let expected = width as usize * height as usize;
    let mut grid = OccupancyGrid::new(width as usize, height as usize);
    let mut walls = Vec::new();
    let mut player = None;
    let mut goal = None;

    let mut count = 0;
    for (idx, pixel) in pixels.into_iter().enumerate() {
        count += 1;
        if idx >= expected {
            continue;
        }

        let Some(class) = pixel.class() else {
            continue;
        };

        let x = idx % width as usize;
        let y = idx / width as usize;
        let point = Point::new(x as u32, y as u32);

        match class {
            PixelClass::Wall => {
                grid.set(x, y, true);
                walls.push(point);
            }
            PixelClass::Player => player = Some(point),
            PixelClass::Goal => goal = Some(point),
        }
    }

    if count != expected {
        return Err(ClassifyError::PixelCountMismatch {
            width,
            height,
            expected,
            actual: count,
        });
    }

    Ok(Classified {
        grid,
        walls,
        player,
        goal,
    })
}
