//! Hit-testing: which tracked entity sits under a radar pixel.

use hecs::{Entity, World};

use tacmap_core::components::Position;
use tacmap_core::types::{GridCell, PixelPos};

use crate::mapper::CoordinateMapper;
use crate::registry::{TrackRegistry, TrackedEntry};

/// Find the tracked entity under a widget-local pixel, if any.
///
/// The local list is searched before the general list, and each list in
/// priority order, so locally controlled and higher-priority entities
/// win ties. A hit is any entity whose live position maps into the 3x3
/// cell neighborhood of the queried cell.
pub fn object_under_radar_pixel(
    pixel: &PixelPos,
    window_size: PixelPos,
    world: &World,
    registry: &TrackRegistry,
    mapper: &CoordinateMapper,
) -> Option<Entity> {
    let cell = mapper.local_pixel_to_radar(pixel, window_size)?;

    search_list(registry.local(), &cell, world, mapper)
        .or_else(|| search_list(registry.general(), &cell, world, mapper))
}

fn search_list(
    entries: &[TrackedEntry],
    cell: &GridCell,
    world: &World,
    mapper: &CoordinateMapper,
) -> Option<Entity> {
    entries
        .iter()
        .filter_map(|entry| {
            // Entities the simulation already destroyed have no position
            // to test; they are skipped, not hits.
            let position = world.get::<&Position>(entry.entity).ok()?;
            Some((entry.entity, mapper.world_to_radar(&position.0)))
        })
        .find(|(_, entity_cell)| cell.is_adjacent(entity_cell))
        .map(|(entity, _)| entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacmap_core::components::{Allegiance, IndicatorColor, PlayerColors, RadarSignature};
    use tacmap_core::enums::RadarPriority;
    use tacmap_core::types::{MapExtent, PlayerId, Rgba, WorldPos};

    use crate::terrain::FlatTerrain;

    fn setup() -> (World, TrackRegistry, CoordinateMapper, PlayerColors) {
        let terrain = FlatTerrain::new(MapExtent::new(
            WorldPos::new(0.0, 0.0, 0.0),
            WorldPos::new(1000.0, 1000.0, 0.0),
        ));
        let mut mapper = CoordinateMapper::default();
        mapper.new_map(&terrain);
        (World::new(), TrackRegistry::new(), mapper, PlayerColors::new())
    }

    fn spawn_at(
        world: &mut World,
        pos: WorldPos,
        priority: RadarPriority,
        locally_controlled: bool,
    ) -> Entity {
        world.spawn((
            Position(pos),
            RadarSignature { priority },
            Allegiance {
                player: PlayerId(0),
                locally_controlled,
            },
            IndicatorColor(Rgba::WHITE),
        ))
    }

    /// Widget-local pixel whose grid cell is the one `world_pos` maps to,
    /// for a square map in a square 128px widget (identity-ish mapping
    /// with inverted y).
    fn pixel_over(mapper: &CoordinateMapper, world_pos: &WorldPos) -> PixelPos {
        let cell = mapper.world_to_radar(world_pos);
        PixelPos::new(cell.x, 127 - cell.y)
    }

    #[test]
    fn test_hit_on_exact_cell() {
        let (mut world, mut registry, mapper, colors) = setup();
        let size = PixelPos::new(128, 128);

        let pos = WorldPos::new(500.0, 500.0, 0.0);
        let e = spawn_at(&mut world, pos, RadarPriority::Unit, false);
        registry.add_object(&world, &colors, e);

        let hit = object_under_radar_pixel(&pixel_over(&mapper, &pos), size, &world, &registry, &mapper);
        assert_eq!(hit, Some(e));
    }

    #[test]
    fn test_miss_far_from_any_entity() {
        let (mut world, mut registry, mapper, colors) = setup();
        let size = PixelPos::new(128, 128);

        let e = spawn_at(
            &mut world,
            WorldPos::new(900.0, 900.0, 0.0),
            RadarPriority::Unit,
            false,
        );
        registry.add_object(&world, &colors, e);

        let hit = object_under_radar_pixel(
            &pixel_over(&mapper, &WorldPos::new(100.0, 100.0, 0.0)),
            size,
            &world,
            &registry,
            &mapper,
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_neighborhood_tolerance() {
        let (mut world, mut registry, mapper, colors) = setup();
        let size = PixelPos::new(128, 128);

        let pos = WorldPos::new(500.0, 500.0, 0.0);
        let e = spawn_at(&mut world, pos, RadarPriority::Unit, false);
        registry.add_object(&world, &colors, e);

        // One cell off still hits; two cells off misses.
        let cell = mapper.world_to_radar(&pos);
        let near = PixelPos::new(cell.x + 1, 127 - (cell.y - 1));
        assert_eq!(
            object_under_radar_pixel(&near, size, &world, &registry, &mapper),
            Some(e)
        );
        let off = PixelPos::new(cell.x + 2, 127 - cell.y);
        assert_eq!(
            object_under_radar_pixel(&off, size, &world, &registry, &mapper),
            None
        );
    }

    #[test]
    fn test_local_list_wins_over_general() {
        let (mut world, mut registry, mapper, colors) = setup();
        let size = PixelPos::new(128, 128);

        let pos = WorldPos::new(300.0, 300.0, 0.0);
        let enemy = spawn_at(&mut world, pos, RadarPriority::LocalUnitOnly, false);
        let mine = spawn_at(&mut world, pos, RadarPriority::Unit, true);
        registry.add_object(&world, &colors, enemy);
        registry.add_object(&world, &colors, mine);

        let hit = object_under_radar_pixel(&pixel_over(&mapper, &pos), size, &world, &registry, &mapper);
        assert_eq!(hit, Some(mine), "local list is searched first");
    }

    #[test]
    fn test_despawned_entity_is_skipped() {
        let (mut world, mut registry, mapper, colors) = setup();
        let size = PixelPos::new(128, 128);

        let pos = WorldPos::new(500.0, 500.0, 0.0);
        let stale = spawn_at(&mut world, pos, RadarPriority::Unit, false);
        let live = spawn_at(&mut world, pos, RadarPriority::Unit, false);
        registry.add_object(&world, &colors, stale);
        registry.add_object(&world, &colors, live);

        // Simulation despawns without telling the radar first.
        world.despawn(stale).unwrap();

        let hit = object_under_radar_pixel(&pixel_over(&mapper, &pos), size, &world, &registry, &mapper);
        assert_eq!(hit, Some(live));
    }
}
