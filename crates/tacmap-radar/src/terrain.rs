//! Terrain query seam.
//!
//! The radar never owns terrain data; it samples whatever the
//! simulation's terrain system provides through this trait.

use tacmap_core::types::MapExtent;

/// Terrain queries the radar needs: map bounds, ground height, and the
/// underwater test used by the elevation averaging sweep.
pub trait TerrainSource {
    /// World-space bounding box of the current map.
    fn extent(&self) -> MapExtent;

    /// Ground elevation at a world (x, y).
    fn ground_height(&self, x: f32, y: f32) -> f32;

    /// If (x, y) is underwater, `Some((water_surface_z, ground_z))`.
    fn water_at(&self, x: f32, y: f32) -> Option<(f32, f32)>;
}

/// Flat terrain over a given extent. Handy default and test double.
#[derive(Debug, Clone)]
pub struct FlatTerrain {
    pub extent: MapExtent,
    pub ground_z: f32,
}

impl FlatTerrain {
    pub fn new(extent: MapExtent) -> Self {
        Self {
            extent,
            ground_z: 0.0,
        }
    }
}

impl TerrainSource for FlatTerrain {
    fn extent(&self) -> MapExtent {
        self.extent
    }

    fn ground_height(&self, _x: f32, _y: f32) -> f32 {
        self.ground_z
    }

    fn water_at(&self, _x: f32, _y: f32) -> Option<(f32, f32)> {
        None
    }
}
