//! Turns color-coded level images into wall, spawn and goal data.
//!
//! Blue pixels are walls, red is the player spawn and green is the goal. Walls
//! are kept both as raw points and merged into rectangles for collision.

#[macro_use]
extern crate tracing;

mod classify;
mod compress;
mod grid;
mod level;
mod pixel;

pub use self::{
    classify::{Classified, ClassifyError, classify},
    compress::{ArchivedCenter, ArchivedExtent, ArchivedRect, Center, Extent, Rect, compress},
    grid::OccupancyGrid,
    level::{
        ArchivedBundledLevel, ArchivedLevel, ArchivedLevelBundle, ArchivedMarker, ArchivedPoint,
        ArchivedWall, BundledLevel, CoverError, Level, LevelBundle, Marker, Point, Wall,
    },
    pixel::{Pixel, PixelClass},
};
