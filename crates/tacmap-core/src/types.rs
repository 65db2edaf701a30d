//! Fundamental geometric and display types.

use serde::{Deserialize, Serialize};

/// 3D position in world space (map units).
/// x = East, y = North, z = Up (elevation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared horizontal distance to another point (elevation ignored).
    pub fn distance_sq_2d(&self, other: &WorldPos) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }
}

/// One cell of the fixed-resolution logical radar grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if `other` lies within the 3x3 neighborhood centered on self.
    pub fn is_adjacent(&self, other: &GridCell) -> bool {
        (other.x - self.x).abs() <= 1 && (other.y - self.y).abs() <= 1
    }
}

/// A pixel position, either screen-absolute or widget-relative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned world-space bounding box of the current map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    pub lo: WorldPos,
    pub hi: WorldPos,
}

impl MapExtent {
    pub fn new(lo: WorldPos, hi: WorldPos) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f32 {
        self.hi.x - self.lo.x
    }

    pub fn height(&self) -> f32 {
        self.hi.y - self.lo.y
    }
}

/// RGBA display color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Subtract `scale` of each color channel, clamping at zero.
    /// Alpha is preserved.
    pub fn darkened(&self, scale: f32) -> Rgba {
        let dim = |c: u8| c.saturating_sub((c as f32 * scale) as u8);
        Rgba {
            r: dim(self.r),
            g: dim(self.g),
            b: dim(self.b),
            a: self.a,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

/// Handle identifying a player in the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);
