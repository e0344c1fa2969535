use crate::{ClassifyError, Pixel, Rect, classify, compress};
use rkyv::Archive;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(
    Archive,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(
    Archive, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Wall {
    pub position: Point,
}

/// Player spawn or goal.
#[derive(
    Archive, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Marker {
    pub position: Point,
}

/// Everything generated from one level image.
///
/// Field order and names are the JSON layout existing level data uses.
#[derive(
    Archive, Clone, Debug, Default, PartialEq, Serialize, Deserialize, rkyv::Serialize, rkyv::Deserialize,
)]
pub struct Level {
    pub walls: Vec<Wall>,
    #[serde(rename = "optimizedWalls")]
    pub optimized_walls: Vec<Rect>,
    pub player: Option<Marker>,
    pub goal: Option<Marker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoverError {
    #[error("cell ({x}, {y}) is covered by more than one rectangle")]
    Overlap { x: u32, y: u32 },
    #[error("wall at ({x}, {y}) is not covered by any rectangle")]
    Uncovered { x: u32, y: u32 },
    #[error("cell ({x}, {y}) is covered but is not a wall")]
    Spurious { x: u32, y: u32 },
}

impl Level {
    /// Classifies a row-major RGBA bitmap and compresses its walls.
    pub fn from_pixels<I>(width: u32, height: u32, pixels: I) -> Result<Self, ClassifyError>
    where
        I: IntoIterator<Item = Pixel>,
    {
        let classified = classify(width, height, pixels)?;
        let optimized_walls = compress(&classified.grid);

        Ok(Self {
            walls: classified
                .walls
                .into_iter()
                .map(|position| Wall { position })
                .collect(),
            optimized_walls,
            player: classified.player.map(|position| Marker { position }),
            goal: classified.goal.map(|position| Marker { position }),
        })
    }

    /// Checks that the rectangles cover exactly the raw walls, each cell once.
    pub fn verify_cover(&self) -> Result<(), CoverError> {
        let walls: HashSet<Point> = self.walls.iter().map(|wall| wall.position).collect();

        let mut covered = HashSet::with_capacity(walls.len());
        for rect in &self.optimized_walls {
            for (x, y) in rect.cells() {
                let point = Point::new(x, y);
                if !walls.contains(&point) {
                    return Err(CoverError::Spurious { x, y });
                }
                if !covered.insert(point) {
                    return Err(CoverError::Overlap { x, y });
                }
            }
        }

        // report the first miss in scan order
        if let Some(wall) = self
            .walls
            .iter()
            .find(|wall| !covered.contains(&wall.position))
        {
            let Point { x, y } = wall.position;
            return Err(CoverError::Uncovered { x, y });
        }

        Ok(())
    }
}

/// A named level plus the size of the image it came from.
#[derive(Archive, Clone, Debug, PartialEq, rkyv::Serialize, rkyv::Deserialize)]
pub struct BundledLevel {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub level: Level,
}

/// Many levels packed into one archive.
#[derive(Archive, Clone, Debug, Default, PartialEq, rkyv::Serialize, rkyv::Deserialize)]
pub struct LevelBundle {
    pub levels: Vec<BundledLevel>,
}

#[cfg(test)]
mod tests {
    use super::{CoverError, Level, Marker, Point, Wall};
    use crate::{Pixel, Rect};

    const WALL: Pixel = Pixel::new(0, 0, 255, 255);
    const PLAYER: Pixel = Pixel::new(255, 0, 0, 255);
    const GOAL: Pixel = Pixel::new(0, 255, 0, 255);
    const EMPTY: Pixel = Pixel::TRANSPARENT;

    fn walls(points: &[(u32, u32)]) -> Vec<Wall> {
        points
            .iter()
            .map(|&(x, y)| Wall {
                position: Point::new(x, y),
            })
            .collect()
    }

    #[test]
    fn all_wall_bitmap() {
        let level = Level::from_pixels(3, 2, vec![WALL; 6]).unwrap();
        assert_eq!(level.walls.len(), 6);
        assert_eq!(level.optimized_walls, [Rect::from_block(0, 0, 3, 2)]);
        assert_eq!(level.player, None);
        assert_eq!(level.goal, None);
        level.verify_cover().unwrap();
    }

    #[test]
    fn empty_bitmap() {
        let level = Level::from_pixels(4, 4, vec![EMPTY; 16]).unwrap();
        assert_eq!(level, Level::default());
    }

    #[test]
    fn markers_and_walls() {
        #[rustfmt::skip]
        let pixels = vec![
            WALL,   WALL,  PLAYER,
            EMPTY,  EMPTY, EMPTY,
            GOAL,   WALL,  WALL,
        ];

        let level = Level::from_pixels(3, 3, pixels).unwrap();
        assert_eq!(
            level.walls,
            walls(&[(0, 0), (1, 0), (1, 2), (2, 2)])
        );
        assert_eq!(
            level.optimized_walls,
            [Rect::from_block(0, 0, 2, 1), Rect::from_block(1, 2, 2, 1)]
        );
        assert_eq!(
            level.player,
            Some(Marker {
                position: Point::new(2, 0)
            })
        );
        assert_eq!(
            level.goal,
            Some(Marker {
                position: Point::new(0, 2)
            })
        );
    }

    #[test]
    fn json_layout() {
        let mut pixels = vec![EMPTY; 4];
        pixels[0] = WALL;
        pixels[1] = WALL;
        pixels[3] = PLAYER;
        let level = Level::from_pixels(2, 2, pixels).unwrap();

        let json = serde_json::to_string_pretty(&level).unwrap();
        let expected = r#"{
  "walls": [
    {
      "position": {
        "x": 0,
        "y": 0
      }
    },
    {
      "position": {
        "x": 1,
        "y": 0
      }
    }
  ],
  "optimizedWalls": [
    {
      "position": {
        "x": 0.5,
        "y": 0.0
      },
      "scale": {
        "x": 2,
        "y": 1
      }
    }
  ],
  "player": {
    "position": {
      "x": 1,
      "y": 1
    }
  },
  "goal": null
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn empty_json_lists() {
        let json = serde_json::to_string_pretty(&Level::default()).unwrap();
        assert_eq!(
            json,
            "{\n  \"walls\": [],\n  \"optimizedWalls\": [],\n  \"player\": null,\n  \"goal\": null\n}"
        );
    }

    #[test]
    fn json_reads_back() {
        let level = Level::from_pixels(2, 1, vec![WALL, GOAL]).unwrap();
        let json = serde_json::to_vec_pretty(&level).unwrap();
        let parsed: Level = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, level);
    }

    #[test]
    fn cover_errors() {
        let mut level = Level {
            walls: walls(&[(0, 0), (1, 0)]),
            optimized_walls: vec![Rect::from_block(0, 0, 1, 1)],
            ..Level::default()
        };
        assert_eq!(
            level.verify_cover(),
            Err(CoverError::Uncovered { x: 1, y: 0 })
        );

        level.optimized_walls = vec![Rect::from_block(0, 0, 2, 1), Rect::from_block(1, 0, 1, 1)];
        assert_eq!(level.verify_cover(), Err(CoverError::Overlap { x: 1, y: 0 }));

        level.optimized_walls = vec![Rect::from_block(0, 0, 2, 2)];
        assert_eq!(level.verify_cover(), Err(CoverError::Spurious { x: 0, y: 1 }));

        level.optimized_walls = vec![Rect::from_block(0, 0, 2, 1)];
        assert_eq!(level.verify_cover(), Ok(()));
    }

    #[test]
    fn deterministic() {
        let pixels: Vec<Pixel> = (0..64u32)
            .map(|i| if i % 3 == 0 || i % 7 == 0 { WALL } else { EMPTY })
            .collect();
        let first = Level::from_pixels(8, 8, pixels.clone()).unwrap();
        let second = Level::from_pixels(8, 8, pixels).unwrap();
        assert_eq!(
            serde_json::to_vec_pretty(&first).unwrap(),
            serde_json::to_vec_pretty(&second).unwrap()
        );
        first.verify_cover().unwrap();
    }

    #[test]
    fn bundle_archives() {
        let level = Level::from_pixels(2, 1, vec![WALL, PLAYER]).unwrap();
        let bundle = super::LevelBundle {
            levels: vec![super::BundledLevel {
                name: "level1".into(),
                width: 2,
                height: 1,
                level,
            }],
        };

        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&bundle).unwrap();
        let archived =
            rkyv::access::<super::ArchivedLevelBundle, rkyv::rancor::Error>(&bytes).unwrap();
        assert_eq!(archived.levels.len(), 1);
        assert_eq!(archived.levels[0].name.as_str(), "level1");

        let restored =
            rkyv::deserialize::<super::LevelBundle, rkyv::rancor::Error>(archived).unwrap();
        assert_eq!(restored, bundle);
    }
}
