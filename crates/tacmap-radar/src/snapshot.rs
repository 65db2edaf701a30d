//! Versioned save/restore of the radar state.
//!
//! The snapshot stores both track lists by entity identity plus the
//! color frozen at insertion time (colors are restored verbatim, never
//! recomputed), the full pulse array with its write cursor and
//! last-alert index, and the display flags. Restore is strict: a
//! version or capacity mismatch, a non-empty destination registry, or
//! an entity that no longer resolves in the world all signal a
//! corrupted save or a sequencing bug and abort the load.

use std::collections::HashSet;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tacmap_core::constants::MAX_PULSES;
use tacmap_core::enums::RadarPriority;
use tacmap_core::types::Rgba;

use crate::events::Pulse;
use crate::radar::Radar;
use crate::registry::{TrackList, TrackedEntry};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One tracked entity as persisted: identity bits plus stored color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackRecord {
    pub entity_bits: u64,
    pub priority: RadarPriority,
    pub color: Rgba,
}

/// Complete persisted radar state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarSnapshot {
    pub version: u32,
    pub hidden: bool,
    pub force_on: bool,
    pub local_tracks: Vec<TrackRecord>,
    pub general_tracks: Vec<TrackRecord>,
    pub pulses: Vec<Pulse>,
    pub next_slot: usize,
    pub last_event: Option<usize>,
}

/// Fatal restore failures.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported radar snapshot version {0}, expected {SNAPSHOT_VERSION}")]
    VersionMismatch(u32),

    #[error("snapshot holds {0} pulse slots, expected {MAX_PULSES}")]
    PulseCapacityMismatch(usize),

    #[error("pulse slot index {0} is out of range")]
    CursorOutOfRange(usize),

    #[error("destination track lists must be empty before restore")]
    ListsNotEmpty,

    #[error("snapshot lists entity {0:#x} more than once")]
    DuplicateTrack(u64),

    #[error("snapshot references entity {0:#x} that does not resolve in the world")]
    UnresolvedEntity(u64),
}

impl Radar {
    /// Capture the current radar state.
    pub fn snapshot(&self) -> RadarSnapshot {
        RadarSnapshot {
            version: SNAPSHOT_VERSION,
            hidden: self.hidden,
            force_on: self.force_on,
            local_tracks: record_list(self.registry.local()),
            general_tracks: record_list(self.registry.general()),
            pulses: self.events.pulses().to_vec(),
            next_slot: self.events.next_slot(),
            last_event: self.events.last_event_slot(),
        }
    }

    /// Restore a previously captured snapshot.
    ///
    /// The registry must be empty (objects are restored as part of the
    /// save, not re-registered by the simulation), and every persisted
    /// entity identity must resolve to a live entity in `world`.
    pub fn restore(&mut self, snapshot: &RadarSnapshot, world: &World) -> Result<(), SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch(snapshot.version));
        }
        if snapshot.pulses.len() != MAX_PULSES {
            return Err(SnapshotError::PulseCapacityMismatch(snapshot.pulses.len()));
        }
        if snapshot.next_slot >= MAX_PULSES {
            return Err(SnapshotError::CursorOutOfRange(snapshot.next_slot));
        }
        // The last-alert index feeds straight into pulse slot lookups;
        // an out-of-range one means the save is corrupted.
        if let Some(slot) = snapshot.last_event {
            if slot >= MAX_PULSES {
                return Err(SnapshotError::CursorOutOfRange(slot));
            }
        }
        if !self.registry.is_empty() {
            return Err(SnapshotError::ListsNotEmpty);
        }

        // Restore rebuilds the membership bijection, so an entity
        // appearing twice across the persisted lists is fatal too.
        let mut seen = HashSet::new();
        for record in snapshot
            .local_tracks
            .iter()
            .chain(snapshot.general_tracks.iter())
        {
            if !seen.insert(record.entity_bits) {
                return Err(SnapshotError::DuplicateTrack(record.entity_bits));
            }
        }

        let local = resolve_list(&snapshot.local_tracks, world)?;
        let general = resolve_list(&snapshot.general_tracks, world)?;

        self.registry.restore_list(TrackList::Local, local);
        self.registry.restore_list(TrackList::General, general);
        self.events
            .restore(snapshot.pulses.clone(), snapshot.next_slot, snapshot.last_event);
        self.hidden = snapshot.hidden;
        self.force_on = snapshot.force_on;

        debug!(
            local = snapshot.local_tracks.len(),
            general = snapshot.general_tracks.len(),
            "radar snapshot restored"
        );
        Ok(())
    }
}

fn record_list(entries: &[TrackedEntry]) -> Vec<TrackRecord> {
    entries
        .iter()
        .map(|e| TrackRecord {
            entity_bits: e.entity.to_bits().get(),
            priority: e.priority,
            color: e.color,
        })
        .collect()
}

fn resolve_list(records: &[TrackRecord], world: &World) -> Result<Vec<TrackedEntry>, SnapshotError> {
    records
        .iter()
        .map(|record| {
            let entity = Entity::from_bits(record.entity_bits)
                .filter(|e| world.contains(*e))
                .ok_or(SnapshotError::UnresolvedEntity(record.entity_bits))?;
            Ok(TrackedEntry {
                entity,
                priority: record.priority,
                color: record.color,
            })
        })
        .collect()
}
