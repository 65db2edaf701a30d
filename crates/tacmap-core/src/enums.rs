//! Enumeration types used by the radar subsystem.

use serde::{Deserialize, Serialize};

/// Display priority tier for an entity on the radar.
///
/// Lists are kept sorted by non-decreasing tier; hit-testing scans from
/// the head, so lower tiers match first.
/// `NotOnRadar` is the sentinel for entities that never appear.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RadarPriority {
    #[default]
    NotOnRadar,
    Structure,
    Unit,
    LocalUnitOnly,
}

impl RadarPriority {
    /// Whether entities of this tier show up on the radar at all.
    pub fn is_visible(&self) -> bool {
        !matches!(self, RadarPriority::NotOnRadar)
    }
}

/// Kind of short-lived animated alert marker ("pulse") on the radar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PulseKind {
    Construction,
    Upgrade,
    UnderAttack,
    Information,
    /// Ambient beacon blip. Never recorded as the "last alert".
    BeaconPulse,
    Infiltration,
    BattlePlan,
    StealthDiscovered,
    StealthNeutralized,
    /// Invisible marker used to drive animations without drawing.
    /// Also what empty pulse slots default to.
    #[default]
    Fake,
}

impl PulseKind {
    /// Ambient subtypes never update the jump-to-last-alert index.
    pub fn is_ambient(&self) -> bool {
        matches!(self, PulseKind::BeaconPulse)
    }
}
