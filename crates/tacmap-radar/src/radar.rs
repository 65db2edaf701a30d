//! The radar facade: owns the registry, event log, and coordinate
//! frame, and runs the per-frame lifecycle.
//!
//! One `Radar` value is held by whatever owns the simulation loop.
//! `new_map` initializes it for a map, `update` runs once per logic
//! frame before any same-frame event queries, `reset` tears it down.

use hecs::{Entity, World};
use tracing::debug;

use tacmap_core::components::{Allegiance, PlayerColors, Position};
use tacmap_core::constants::TERRAIN_REFRESH_DELAY_FRAMES;
use tacmap_core::enums::PulseKind;
use tacmap_core::types::{GridCell, PixelPos, Rgba, WorldPos};

use crate::events::{EventLog, Pulse};
use crate::mapper::{CoordinateMapper, RadarWindow};
use crate::query;
use crate::registry::TrackRegistry;
use crate::terrain::TerrainSource;

/// The minimap/radar subsystem.
#[derive(Debug, Default)]
pub struct Radar {
    pub(crate) registry: TrackRegistry,
    pub(crate) events: EventLog,
    pub(crate) mapper: CoordinateMapper,
    window: RadarWindow,
    pub(crate) hidden: bool,
    pub(crate) force_on: bool,
    /// Frame a terrain refresh was queued at, if one is pending.
    pending_terrain_refresh: Option<u64>,
}

impl Radar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize for a newly loaded map: full reset, then rebuild the
    /// coordinate frame and remember the widget placement.
    pub fn new_map(&mut self, terrain: &dyn TerrainSource, window: RadarWindow) {
        self.reset();
        self.window = window;
        self.mapper.new_map(terrain);
    }

    /// Drop all tracked entities and events and stop forcing the radar on.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.events.clear();
        self.force_on = false;
        self.pending_terrain_refresh = None;
    }

    /// Per-frame update: expire pulses, then apply a queued terrain
    /// refresh once it has aged past the delay.
    pub fn update(&mut self, now: u64, terrain: &dyn TerrainSource) {
        self.events.update(now);

        if let Some(queued_at) = self.pending_terrain_refresh {
            if now.saturating_sub(queued_at) > TERRAIN_REFRESH_DELAY_FRAMES {
                self.refresh_terrain(terrain);
            }
        }
    }

    /// Re-run the terrain elevation sweep immediately.
    pub fn refresh_terrain(&mut self, terrain: &dyn TerrainSource) {
        self.mapper.sample_elevations(terrain);
        self.pending_terrain_refresh = None;
        debug!("radar terrain refreshed");
    }

    /// Queue a terrain refresh instead of paying for one immediately.
    ///
    /// Re-queueing simply overwrites the pending frame: callers that
    /// spam terrain changes collapse into a single deferred refresh.
    pub fn queue_terrain_refresh(&mut self, now: u64) {
        self.pending_terrain_refresh = Some(now);
    }

    // --- registry ---

    pub fn add_object(&mut self, world: &World, colors: &PlayerColors, entity: Entity) {
        self.registry.add_object(world, colors, entity);
    }

    pub fn remove_object(&mut self, entity: Entity) {
        self.registry.remove_object(entity);
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    // --- events ---

    pub fn create_event(&mut self, world: WorldPos, kind: PulseKind, ttl_secs: f32, now: u64) {
        self.events.create_event(&self.mapper, world, kind, ttl_secs, now);
    }

    pub fn create_player_event(
        &mut self,
        player_color: Rgba,
        world: WorldPos,
        kind: PulseKind,
        ttl_secs: f32,
        now: u64,
    ) {
        self.events
            .create_player_event(&self.mapper, player_color, world, kind, ttl_secs, now);
    }

    /// Throttled event creation; returns whether a pulse was created.
    pub fn try_event(&mut self, kind: PulseKind, world: WorldPos, now: u64) -> bool {
        self.events.try_event(&self.mapper, kind, world, now)
    }

    /// Throttled under-attack alert for a damaged entity. Damage lands
    /// every frame during a fight, so this rides `try_event`'s
    /// spatiotemporal throttle. Returns whether a pulse was created so
    /// the caller can drive its own feedback.
    pub fn try_under_attack_event(&mut self, world: &World, entity: Entity, now: u64) -> bool {
        let Ok(position) = world.get::<&Position>(entity) else {
            return false;
        };
        let pos = position.0;
        drop(position);
        self.try_event(PulseKind::UnderAttack, pos, now)
    }

    /// Infiltration alert (hijack, hack, defection). Only warns about
    /// infiltrations against the local player; unthrottled, since these
    /// are rare and always worth a ping. Returns whether a pulse was
    /// created.
    pub fn try_infiltration_event(&mut self, world: &World, entity: Entity, now: u64) -> bool {
        let locally_controlled = world
            .get::<&Allegiance>(entity)
            .map(|a| a.locally_controlled)
            .unwrap_or(false);
        if !locally_controlled {
            return false;
        }
        let Ok(position) = world.get::<&Position>(entity) else {
            return false;
        };
        let pos = position.0;
        drop(position);
        self.create_event(
            pos,
            PulseKind::Infiltration,
            tacmap_core::constants::PULSE_DEFAULT_TTL_SECS,
            now,
        );
        true
    }

    /// Location of the most recent non-ambient alert, for the
    /// jump-to-last-alert command.
    pub fn last_event_location(&self) -> Option<WorldPos> {
        self.events.last_event_location()
    }

    pub fn pulses(&self) -> &[Pulse] {
        self.events.pulses()
    }

    pub fn mark_feedback_played(&mut self, slot: usize) {
        self.events.mark_feedback_played(slot);
    }

    // --- coordinates and hit-testing ---

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn window(&self) -> RadarWindow {
        self.window
    }

    pub fn world_to_radar(&self, world: &WorldPos) -> GridCell {
        self.mapper.world_to_radar(world)
    }

    pub fn radar_to_world(&self, cell: &GridCell, terrain: &dyn TerrainSource) -> WorldPos {
        self.mapper.radar_to_world(cell, terrain)
    }

    /// Screen pixel to world position through the letterboxed widget.
    pub fn screen_pixel_to_world(
        &self,
        pixel: &PixelPos,
        terrain: &dyn TerrainSource,
    ) -> Option<WorldPos> {
        self.mapper.screen_pixel_to_world(pixel, &self.window, terrain)
    }

    /// Tracked entity under a widget-local pixel, if any.
    pub fn object_under_radar_pixel(&self, pixel: &PixelPos, world: &World) -> Option<Entity> {
        query::object_under_radar_pixel(pixel, self.window.size, world, &self.registry, &self.mapper)
    }

    // --- display flags ---

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Whether the radar is forced on regardless of the player owning a
    /// functioning radar structure.
    pub fn is_force_on(&self) -> bool {
        self.force_on
    }

    pub fn set_force_on(&mut self, force_on: bool) {
        self.force_on = force_on;
    }
}
