//! Priority-ordered registry of entities shown on the radar.
//!
//! Two lists: one for locally controlled entities, one for everything
//! else. Each is kept sorted by non-decreasing priority tier, and a new
//! entry is inserted at the front of its tier's run. A back-reference
//! map records which list holds each tracked entity, so membership is a
//! bijection for as long as an entity is tracked.

use std::collections::HashMap;

use hecs::{Entity, World};

use tacmap_core::components::{
    Allegiance, Disguise, GarrisonTint, IndicatorColor, PlayerColors, Position, RadarSignature,
    StealthStatus,
};
use tacmap_core::enums::RadarPriority;
use tacmap_core::types::Rgba;

/// Which of the two registry lists holds an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackList {
    Local,
    General,
}

/// One tracked entity: a non-owning handle, its tier, and the display
/// color frozen at insertion time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedEntry {
    pub entity: Entity,
    pub priority: RadarPriority,
    pub color: Rgba,
}

impl TrackedEntry {
    /// True while the entity is stealthed away from the local observer.
    /// Such entries stay tracked; renderers just skip drawing the blip.
    pub fn is_temporarily_hidden(&self, world: &World) -> bool {
        world
            .get::<&StealthStatus>(self.entity)
            .map(|s| s.invisible_to_local)
            .unwrap_or(false)
    }
}

/// The radar's registry of displayed entities.
#[derive(Debug, Default)]
pub struct TrackRegistry {
    local: Vec<TrackedEntry>,
    general: Vec<TrackedEntry>,
    /// Entity -> holding list. The Rust rendition of the entity's
    /// back-pointer to its radar data.
    membership: HashMap<Entity, TrackList>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the radar.
    ///
    /// Entities whose priority is the `NotOnRadar` sentinel (or that
    /// lack a signature or position entirely) are ignored. The display
    /// color is the entity's indicator color unless a disguise or a
    /// stealth-garrisoned container presents another player's color to
    /// the local observer.
    pub fn add_object(&mut self, world: &World, colors: &PlayerColors, entity: Entity) {
        let Ok(signature) = world.get::<&RadarSignature>(entity) else {
            return;
        };
        let priority = signature.priority;
        if !priority.is_visible() {
            return;
        }
        if world.get::<&Position>(entity).is_err() {
            return;
        }

        debug_assert!(
            !self.membership.contains_key(&entity),
            "entity {entity:?} added to the radar twice"
        );

        let color = self.resolve_color(world, colors, entity);

        let locally_controlled = world
            .get::<&Allegiance>(entity)
            .map(|a| a.locally_controlled)
            .unwrap_or(false);
        let list = if locally_controlled {
            TrackList::Local
        } else {
            TrackList::General
        };

        let entry = TrackedEntry {
            entity,
            priority,
            color,
        };
        let entries = self.list_mut(list);

        // Ordered insert: skip strictly lower tiers, then lead our own
        // tier's run.
        let at = entries
            .iter()
            .position(|e| e.priority >= priority)
            .unwrap_or(entries.len());
        entries.insert(at, entry);
        self.membership.insert(entity, list);
    }

    /// Remove an entity from whichever list holds it.
    ///
    /// Silent no-op for entities that were never tracked. A recorded
    /// membership without a matching list entry is a programmer error.
    pub fn remove_object(&mut self, entity: Entity) {
        let Some(list) = self.membership.remove(&entity) else {
            return;
        };

        let entries = self.list_mut(list);
        if let Some(at) = entries.iter().position(|e| e.entity == entity) {
            entries.remove(at);
        } else {
            debug_assert!(false, "entity {entity:?} tracked but absent from its list");
        }
    }

    /// Whether an entity is currently on the radar.
    pub fn contains(&self, entity: Entity) -> bool {
        self.membership.contains_key(&entity)
    }

    /// Locally controlled entries in priority order.
    pub fn local(&self) -> &[TrackedEntry] {
        &self.local
    }

    /// All other entries in priority order.
    pub fn general(&self) -> &[TrackedEntry] {
        &self.general
    }

    pub fn len(&self) -> usize {
        self.membership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Drop every entry and back-reference.
    pub fn clear(&mut self) {
        self.local.clear();
        self.general.clear();
        self.membership.clear();
    }

    /// Rebuild a list wholesale from snapshot records. Colors come from
    /// the snapshot verbatim; they are never recomputed on load.
    pub(crate) fn restore_list(&mut self, list: TrackList, entries: Vec<TrackedEntry>) {
        for entry in &entries {
            self.membership.insert(entry.entity, list);
        }
        *self.list_mut(list) = entries;
    }

    fn list_mut(&mut self, list: TrackList) -> &mut Vec<TrackedEntry> {
        match list {
            TrackList::Local => &mut self.local,
            TrackList::General => &mut self.general,
        }
    }

    /// Radar display is local-only state, so the apparent owner as seen
    /// by the local observer wins over the true indicator color.
    fn resolve_color(&self, world: &World, colors: &PlayerColors, entity: Entity) -> Rgba {
        let apparent = world
            .get::<&Disguise>(entity)
            .ok()
            .and_then(|d| d.apparent_player)
            .or_else(|| {
                world
                    .get::<&GarrisonTint>(entity)
                    .ok()
                    .and_then(|g| g.apparent_player)
            });

        if let Some(color) = apparent.and_then(|player| colors.get(player)) {
            return color;
        }

        world
            .get::<&IndicatorColor>(entity)
            .map(|c| c.0)
            .unwrap_or_default()
    }
}
