//! ECS components the radar reads from simulation entities.
//!
//! Components are plain data structs with no methods. The radar only
//! queries them; ownership and mutation belong to the simulation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::RadarPriority;
use crate::types::{PlayerId, Rgba, WorldPos};

/// Live world position of an entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position(pub WorldPos);

/// How (and whether) an entity shows up on the radar.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RadarSignature {
    pub priority: RadarPriority,
}

/// Ownership and control of an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Allegiance {
    pub player: PlayerId,
    /// True for entities controlled by the local observer.
    pub locally_controlled: bool,
}

/// Per-entity indicator color (the default radar color).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IndicatorColor(pub Rgba);

/// A unit disguised as one belonging to another player.
///
/// `apparent_player` is the owner the local observer perceives, already
/// `None` when the local observer sees through the disguise.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Disguise {
    pub apparent_player: Option<PlayerId>,
}

/// A container whose stealthed occupants recolor it for the local observer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GarrisonTint {
    pub apparent_player: Option<PlayerId>,
}

/// Drawn-state stealth query. Renderers skip tracks that are currently
/// invisible to the local observer; the registry keeps them regardless.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StealthStatus {
    pub invisible_to_local: bool,
}

/// Player color lookup resolved against `apparent_player` overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerColors {
    colors: HashMap<PlayerId, Rgba>,
}

impl PlayerColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: PlayerId, color: Rgba) {
        self.colors.insert(player, color);
    }

    pub fn get(&self, player: PlayerId) -> Option<Rgba> {
        self.colors.get(&player).copied()
    }
}
