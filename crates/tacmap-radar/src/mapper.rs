//! World / logical-grid / pixel coordinate conversion.
//!
//! The radar works in a fixed 128x128 logical grid. Maps are rarely
//! square, so the grid is letterboxed into the on-screen widget to
//! preserve the map aspect ratio; hit-testing inverts exactly the same
//! geometry the renderer uses.

use glam::Vec2;
use tracing::debug;

use tacmap_core::constants::{ELEVATION_SAMPLE_STRIDE, GRID_HEIGHT, GRID_WIDTH};
use tacmap_core::types::{GridCell, MapExtent, PixelPos, WorldPos};

use crate::terrain::TerrainSource;

/// Screen placement of the radar widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadarWindow {
    /// Screen position of the widget's top-left corner.
    pub screen_pos: PixelPos,
    /// Widget size in pixels.
    pub size: PixelPos,
}

/// Per-map coordinate frame: world extent, cell sample deltas, and the
/// sparsely-sampled elevation averages. Rebuilt once per map load and
/// read-only between loads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper {
    extent: MapExtent,
    x_sample: f32,
    y_sample: f32,
    terrain_average_z: f32,
    water_average_z: f32,
}

impl CoordinateMapper {
    /// Rebuild the frame for a newly loaded map.
    pub fn new_map(&mut self, terrain: &dyn TerrainSource) {
        self.extent = terrain.extent();
        self.x_sample = self.extent.width() / GRID_WIDTH as f32;
        self.y_sample = self.extent.height() / GRID_HEIGHT as f32;
        self.sample_elevations(terrain);
        debug!(
            width = self.extent.width(),
            height = self.extent.height(),
            "radar map frame rebuilt"
        );
    }

    /// Strided sweep over the terrain classifying each sample point as
    /// underwater or dry and averaging the ground elevation of each class.
    pub fn sample_elevations(&mut self, terrain: &dyn TerrainSource) {
        let mut terrain_total = 0.0f32;
        let mut water_total = 0.0f32;
        let mut terrain_samples = 0u32;
        let mut water_samples = 0u32;

        let mut y = 0;
        while y < GRID_HEIGHT {
            let world_y = self.extent.lo.y + y as f32 * self.y_sample;
            let mut x = 0;
            while x < GRID_WIDTH {
                let world_x = self.extent.lo.x + x as f32 * self.x_sample;
                if let Some((_water_z, ground_z)) = terrain.water_at(world_x, world_y) {
                    water_total += ground_z;
                    water_samples += 1;
                } else {
                    terrain_total += terrain.ground_height(world_x, world_y);
                    terrain_samples += 1;
                }
                x += ELEVATION_SAMPLE_STRIDE;
            }
            y += ELEVATION_SAMPLE_STRIDE;
        }

        // A map can be all land or all water; floor the counts so the
        // missing class just averages to zero.
        self.terrain_average_z = terrain_total / terrain_samples.max(1) as f32;
        self.water_average_z = water_total / water_samples.max(1) as f32;
    }

    pub fn extent(&self) -> MapExtent {
        self.extent
    }

    pub fn terrain_average_z(&self) -> f32 {
        self.terrain_average_z
    }

    pub fn water_average_z(&self) -> f32 {
        self.water_average_z
    }

    /// Translate a world point to a logical grid cell.
    ///
    /// Always succeeds: points outside the map extent clamp to the
    /// boundary cells rather than reporting failure.
    pub fn world_to_radar(&self, world: &WorldPos) -> GridCell {
        let x = ((world.x - self.extent.lo.x) / self.x_sample) as i32;
        let y = ((world.y - self.extent.lo.y) / self.y_sample) as i32;
        GridCell {
            x: x.clamp(0, GRID_WIDTH - 1),
            y: y.clamp(0, GRID_HEIGHT - 1),
        }
    }

    /// Translate a grid cell to a world point at elevation zero.
    /// Out-of-range cells are clamped into the grid first.
    pub fn radar_to_world_2d(&self, cell: &GridCell) -> WorldPos {
        let x = cell.x.clamp(0, GRID_WIDTH - 1);
        let y = cell.y.clamp(0, GRID_HEIGHT - 1);
        WorldPos {
            x: self.extent.lo.x + x as f32 * self.x_sample,
            y: self.extent.lo.y + y as f32 * self.y_sample,
            z: 0.0,
        }
    }

    /// Translate a grid cell to a world point on the terrain surface.
    pub fn radar_to_world(&self, cell: &GridCell, terrain: &dyn TerrainSource) -> WorldPos {
        let mut world = self.radar_to_world_2d(cell);
        world.z = terrain.ground_height(world.x, world.y);
        world
    }

    /// Compute the widget-local subrect the map occupies when drawn with
    /// its aspect ratio preserved: the constrained axis is centered and
    /// the other fills the viewport. Pure geometry, idempotent for
    /// identical inputs.
    pub fn find_draw_positions(&self, start: PixelPos, size: PixelPos) -> (PixelPos, PixelPos) {
        let ratio = Vec2::new(
            self.extent.width() / size.x as f32,
            self.extent.height() / size.y as f32,
        );

        let (ul, lr) = if ratio.x >= ratio.y {
            // Wide map: x fills the viewport, y is centered.
            let scaled = Vec2::new(self.extent.width(), self.extent.height()) / ratio.x;
            let ul_y = ((size.y as f32 - scaled.y) / 2.0) as i32;
            (
                PixelPos::new(0, ul_y),
                PixelPos::new(scaled.x as i32, size.y - ul_y),
            )
        } else {
            // Tall map: y fills the viewport, x is centered.
            let scaled = Vec2::new(self.extent.width(), self.extent.height()) / ratio.y;
            let ul_x = ((size.x as f32 - scaled.x) / 2.0) as i32;
            (
                PixelPos::new(ul_x, 0),
                PixelPos::new(size.x - ul_x, scaled.y as i32),
            )
        };

        (
            PixelPos::new(ul.x + start.x, ul.y + start.y),
            PixelPos::new(lr.x + start.x, lr.y + start.y),
        )
    }

    /// Translate a widget-local pixel to a logical grid cell, or `None`
    /// if the pixel falls in the letterbox margins.
    ///
    /// The unconstrained axis needs a two-step remap: pixel to the
    /// fraction of an as-if-square widget, then fraction to grid cell.
    /// This must stay in lockstep with `find_draw_positions` or
    /// hit-testing drifts away from what is drawn. Y is inverted so
    /// +y in the world is up on the radar.
    pub fn local_pixel_to_radar(&self, pixel: &PixelPos, window_size: PixelPos) -> Option<GridCell> {
        let (ul, lr) = self.find_draw_positions(PixelPos::new(0, 0), window_size);
        let scaled_width = lr.x - ul.x;
        let scaled_height = lr.y - ul.y;
        if scaled_width <= 0 || scaled_height <= 0 {
            return None;
        }

        if pixel.x < ul.x || pixel.x > lr.x || pixel.y < ul.y || pixel.y > lr.y {
            return None;
        }

        let (x, y) = if scaled_width >= scaled_height {
            // X is stretched edge to edge: direct conversion to cells.
            let x = (pixel.x - ul.x) * GRID_WIDTH / scaled_width;

            // Y was letterboxed: remap to the as-if-square widget first.
            let y_square =
                (((pixel.y - ul.y) as f32 / scaled_height as f32) * window_size.y as f32) as i32;
            let y = (window_size.y - y_square) * GRID_HEIGHT / window_size.y;
            (x, y)
        } else {
            // X was letterboxed: remap to the as-if-square widget first.
            let x_square =
                (((pixel.x - ul.x) as f32 / scaled_width as f32) * window_size.x as f32) as i32;
            let x = x_square * GRID_WIDTH / window_size.x;

            // Y is stretched edge to edge: direct conversion, inverted.
            let y = (window_size.y - pixel.y) * GRID_HEIGHT / window_size.y;
            (x, y)
        };

        Some(GridCell {
            x: x.clamp(0, GRID_WIDTH - 1),
            y: y.clamp(0, GRID_HEIGHT - 1),
        })
    }

    /// Translate an absolute screen pixel to a world position on the
    /// terrain, or `None` if the pixel misses the letterboxed map image.
    pub fn screen_pixel_to_world(
        &self,
        pixel: &PixelPos,
        window: &RadarWindow,
        terrain: &dyn TerrainSource,
    ) -> Option<WorldPos> {
        let local = PixelPos::new(pixel.x - window.screen_pos.x, pixel.y - window.screen_pos.y);
        let cell = self.local_pixel_to_radar(&local, window.size)?;
        Some(self.radar_to_world(&cell, terrain))
    }
}
