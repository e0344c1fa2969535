#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// What a single pixel contributes to a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelClass {
    Wall,
    Player,
    Goal,
}

const HIGH: u8 = 200;
const LOW: u8 = 100;

impl Pixel {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self.a > 0 && self.b > HIGH && self.r < LOW && self.g < LOW
    }

    #[inline]
    pub fn is_player(self) -> bool {
        self.a > 0 && self.r > HIGH && self.g < LOW && self.b < LOW
    }

    #[inline]
    pub fn is_goal(self) -> bool {
        self.a > 0 && self.g > HIGH && self.r < LOW && self.b < LOW
    }

    /// Classifies the pixel. Checked in order: fully transparent black, wall,
    /// player, goal. Anything else is dropped.
    pub fn class(self) -> Option<PixelClass> {
        if self == Self::TRANSPARENT {
            None
        } else if self.is_wall() {
            Some(PixelClass::Wall)
        } else if self.is_player() {
            Some(PixelClass::Player)
        } else if self.is_goal() {
            Some(PixelClass::Goal)
        } else {
            None
        }
    }
}

impl From<[u8; 4]> for Pixel {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}
