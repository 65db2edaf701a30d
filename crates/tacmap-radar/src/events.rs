//! Timed alert markers ("pulses") on the radar.
//!
//! Pulses live in a fixed-capacity ring buffer. The write cursor wraps
//! unconditionally, so a burst of alerts silently overwrites the oldest
//! slots whether or not they were still active. Expired pulses are only
//! flagged inactive; their data stays inspectable until overwritten.

use serde::{Deserialize, Serialize};
use tracing::warn;

use tacmap_core::constants::{
    LOGIC_FRAMES_PER_SECOND, MAX_PULSES, PLAYER_PULSE_DARK_SCALE, PULSE_DEFAULT_TTL_SECS,
    PULSE_FADE_LEAD_SECS, PULSE_SUPPRESS_DIST_SQ, PULSE_SUPPRESS_FRAMES,
};
use tacmap_core::enums::PulseKind;
use tacmap_core::types::{GridCell, Rgba, WorldPos};

use crate::mapper::CoordinateMapper;

/// Static per-kind pulse color pairs (primary, secondary).
const PULSE_COLORS: &[(PulseKind, Rgba, Rgba)] = &[
    (
        PulseKind::Construction,
        Rgba::new(128, 128, 255, 255),
        Rgba::new(128, 255, 255, 255),
    ),
    (
        PulseKind::Upgrade,
        Rgba::new(128, 0, 64, 255),
        Rgba::new(255, 185, 220, 255),
    ),
    (
        PulseKind::UnderAttack,
        Rgba::new(255, 0, 0, 255),
        Rgba::new(255, 128, 128, 255),
    ),
    (
        PulseKind::Information,
        Rgba::new(255, 255, 0, 255),
        Rgba::new(255, 255, 128, 255),
    ),
    (
        PulseKind::BeaconPulse,
        Rgba::new(255, 255, 0, 255),
        Rgba::new(255, 255, 128, 255),
    ),
    (
        PulseKind::Infiltration,
        Rgba::new(0, 255, 255, 255),
        Rgba::new(128, 255, 255, 255),
    ),
    (
        PulseKind::BattlePlan,
        Rgba::new(255, 255, 255, 255),
        Rgba::new(255, 255, 255, 255),
    ),
    (
        PulseKind::StealthDiscovered,
        Rgba::new(0, 255, 0, 255),
        Rgba::new(0, 128, 0, 255),
    ),
    (
        PulseKind::StealthNeutralized,
        Rgba::new(0, 255, 0, 255),
        Rgba::new(0, 128, 0, 255),
    ),
    (
        PulseKind::Fake,
        Rgba::new(0, 0, 0, 0),
        Rgba::new(0, 0, 0, 0),
    ),
];

/// One animated alert marker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pulse {
    pub kind: PulseKind,
    pub active: bool,
    /// False only for ring slots never written to.
    pub occupied: bool,
    pub create_frame: u64,
    pub die_frame: u64,
    /// Frame the marker starts fading toward its die frame.
    pub fade_frame: u64,
    pub color1: Rgba,
    pub color2: Rgba,
    pub world: WorldPos,
    /// Grid location cached at creation time.
    pub grid: GridCell,
    /// Set by the feedback layer once it has reacted to this pulse.
    pub feedback_played: bool,
}

/// Fixed-capacity log of timed alert markers.
#[derive(Debug, Clone)]
pub struct EventLog {
    pulses: Vec<Pulse>,
    next_slot: usize,
    /// Slot of the most recent non-ambient pulse, for jump-to-last-alert.
    last_event: Option<usize>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            pulses: vec![Pulse::default(); MAX_PULSES],
            next_slot: 0,
            last_event: None,
        }
    }

    /// Create a pulse with the static color pair for its kind.
    ///
    /// A kind missing from the color table is recoverable: log it and
    /// fall back to opaque white.
    pub fn create_event(
        &mut self,
        mapper: &CoordinateMapper,
        world: WorldPos,
        kind: PulseKind,
        ttl_secs: f32,
        now: u64,
    ) {
        let (color1, color2) = match PULSE_COLORS.iter().find(|(k, _, _)| *k == kind) {
            Some((_, c1, c2)) => (*c1, *c2),
            None => {
                warn!(?kind, "pulse kind missing from color table, using default");
                (Rgba::WHITE, Rgba::WHITE)
            }
        };
        self.write_pulse(mapper, world, kind, ttl_secs, now, color1, color2);
    }

    /// Create a pulse colored by the owning player instead of the static
    /// table: primary = player color, secondary = a darkened variant.
    pub fn create_player_event(
        &mut self,
        mapper: &CoordinateMapper,
        player_color: Rgba,
        world: WorldPos,
        kind: PulseKind,
        ttl_secs: f32,
        now: u64,
    ) {
        let color2 = player_color.darkened(PLAYER_PULSE_DARK_SCALE);
        self.write_pulse(mapper, world, kind, ttl_secs, now, player_color, color2);
    }

    /// Throttled creation: suppressed if a same-kind pulse was created
    /// close by (squared 2D distance under the threshold) less than the
    /// suppression window ago. Returns whether a pulse was created.
    pub fn try_event(
        &mut self,
        mapper: &CoordinateMapper,
        kind: PulseKind,
        world: WorldPos,
        now: u64,
    ) -> bool {
        for pulse in &self.pulses {
            if !pulse.occupied || pulse.kind != kind {
                continue;
            }
            if pulse.world.distance_sq_2d(&world) <= PULSE_SUPPRESS_DIST_SQ
                && now.saturating_sub(pulse.create_frame) < PULSE_SUPPRESS_FRAMES
            {
                return false;
            }
        }

        self.create_event(mapper, world, kind, PULSE_DEFAULT_TTL_SECS, now);
        true
    }

    /// Deactivate every pulse whose die frame has passed. Slots are not
    /// recycled here; overwriting is the only physical removal.
    pub fn update(&mut self, now: u64) {
        for pulse in &mut self.pulses {
            if pulse.active && now > pulse.die_frame {
                pulse.active = false;
            }
        }
    }

    /// World location of the most recent non-ambient pulse, if any was
    /// ever created.
    pub fn last_event_location(&self) -> Option<WorldPos> {
        self.last_event.map(|slot| self.pulses[slot].world)
    }

    /// All slots, including inactive ones, for rendering and feedback.
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Record that the feedback layer already reacted to a slot.
    pub fn mark_feedback_played(&mut self, slot: usize) {
        if let Some(pulse) = self.pulses.get_mut(slot) {
            pulse.feedback_played = true;
        }
    }

    /// Zero every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.pulses.fill(Pulse::default());
        self.next_slot = 0;
        self.last_event = None;
    }

    pub(crate) fn next_slot(&self) -> usize {
        self.next_slot
    }

    pub(crate) fn last_event_slot(&self) -> Option<usize> {
        self.last_event
    }

    pub(crate) fn restore(
        &mut self,
        pulses: Vec<Pulse>,
        next_slot: usize,
        last_event: Option<usize>,
    ) {
        self.pulses = pulses;
        self.next_slot = next_slot;
        self.last_event = last_event;
    }

    fn write_pulse(
        &mut self,
        mapper: &CoordinateMapper,
        world: WorldPos,
        kind: PulseKind,
        ttl_secs: f32,
        now: u64,
        color1: Rgba,
        color2: Rgba,
    ) {
        let die_frame = now + (LOGIC_FRAMES_PER_SECOND as f32 * ttl_secs) as u64;
        let fade_frame =
            die_frame.saturating_sub((LOGIC_FRAMES_PER_SECOND as f32 * PULSE_FADE_LEAD_SECS) as u64);

        // The next slot is claimed unconditionally; whatever lived there
        // before is gone, active or not.
        self.pulses[self.next_slot] = Pulse {
            kind,
            active: true,
            occupied: true,
            create_frame: now,
            die_frame,
            fade_frame,
            color1,
            color2,
            world,
            grid: mapper.world_to_radar(&world),
            feedback_played: false,
        };

        // Ambient blips are not worth jumping to.
        if !kind.is_ambient() {
            self.last_event = Some(self.next_slot);
        }

        self.next_slot = (self.next_slot + 1) % MAX_PULSES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacmap_core::types::MapExtent;

    use crate::terrain::FlatTerrain;

    fn mapper() -> CoordinateMapper {
        let terrain = FlatTerrain::new(MapExtent::new(
            WorldPos::new(0.0, 0.0, 0.0),
            WorldPos::new(1000.0, 1000.0, 0.0),
        ));
        let mut mapper = CoordinateMapper::default();
        mapper.new_map(&terrain);
        mapper
    }

    const FPS: u64 = LOGIC_FRAMES_PER_SECOND;

    #[test]
    fn test_create_event_stamps_frames() {
        let mapper = mapper();
        let mut log = EventLog::new();
        log.create_event(
            &mapper,
            WorldPos::new(500.0, 500.0, 0.0),
            PulseKind::UnderAttack,
            4.0,
            100,
        );

        let pulse = &log.pulses()[0];
        assert!(pulse.active);
        assert_eq!(pulse.kind, PulseKind::UnderAttack);
        assert_eq!(pulse.create_frame, 100);
        assert_eq!(pulse.die_frame, 100 + FPS * 4);
        assert_eq!(pulse.fade_frame, pulse.die_frame - FPS / 2);
        assert_eq!(pulse.grid, mapper.world_to_radar(&pulse.world));
        assert!(!pulse.feedback_played);
        assert_eq!(pulse.color1, Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_create_player_event_derives_colors() {
        let mapper = mapper();
        let mut log = EventLog::new();
        let team = Rgba::new(200, 100, 40, 255);
        log.create_player_event(
            &mapper,
            team,
            WorldPos::new(10.0, 10.0, 0.0),
            PulseKind::Information,
            2.0,
            1,
        );

        let pulse = &log.pulses()[0];
        assert_eq!(pulse.color1, team);
        assert_eq!(pulse.color2, team.darkened(0.75));
    }

    #[test]
    fn test_update_deactivates_past_die_frame() {
        let mapper = mapper();
        let mut log = EventLog::new();
        log.create_event(&mapper, WorldPos::default(), PulseKind::Information, 2.0, 10);
        let die = log.pulses()[0].die_frame;

        log.update(die);
        assert!(log.pulses()[0].active, "not expired at its die frame");

        log.update(die + 1);
        assert!(!log.pulses()[0].active, "expired past its die frame");

        // Deactivation is a flag flip, not a removal.
        assert_eq!(log.pulses()[0].kind, PulseKind::Information);
        assert_eq!(log.pulses()[0].create_frame, 10);
    }

    #[test]
    fn test_ring_buffer_wraps_regardless_of_active() {
        let mapper = mapper();
        let mut log = EventLog::new();

        for i in 0..MAX_PULSES {
            log.create_event(
                &mapper,
                WorldPos::new(i as f32, 0.0, 0.0),
                PulseKind::Information,
                1000.0,
                50,
            );
        }
        assert!(log.pulses()[0].active, "slot 0 still active before wrap");
        assert_eq!(log.pulses()[0].world.x, 0.0);

        // Creation N+1 claims slot 0 even though its pulse is active.
        log.create_event(
            &mapper,
            WorldPos::new(999.0, 0.0, 0.0),
            PulseKind::UnderAttack,
            1.0,
            60,
        );
        assert_eq!(log.pulses().len(), MAX_PULSES);
        assert_eq!(log.pulses()[0].world.x, 999.0);
        assert_eq!(log.pulses()[0].kind, PulseKind::UnderAttack);
    }

    #[test]
    fn test_try_event_suppresses_near_and_recent() {
        let mapper = mapper();
        let mut log = EventLog::new();
        let spot = WorldPos::new(400.0, 400.0, 0.0);

        assert!(log.try_event(&mapper, PulseKind::UnderAttack, spot, FPS));
        // Same spot 2 seconds later: suppressed.
        assert!(!log.try_event(&mapper, PulseKind::UnderAttack, spot, FPS * 3));
        // 11 seconds after the first: allowed again.
        assert!(log.try_event(&mapper, PulseKind::UnderAttack, spot, FPS * 12));
    }

    #[test]
    fn test_try_event_distance_threshold() {
        let mapper = mapper();
        let mut log = EventLog::new();
        let spot = WorldPos::new(100.0, 100.0, 0.0);

        assert!(log.try_event(&mapper, PulseKind::UnderAttack, spot, FPS));

        // 249 units away on one axis: within the threshold, suppressed.
        let near = WorldPos::new(349.0, 100.0, 0.0);
        assert!(!log.try_event(&mapper, PulseKind::UnderAttack, near, FPS * 2));

        // 251 on each axis: squared Euclidean distance exceeds 250^2.
        let far = WorldPos::new(351.0, 351.0, 0.0);
        assert!(log.try_event(&mapper, PulseKind::UnderAttack, far, FPS * 2));
    }

    #[test]
    fn test_try_event_ignores_other_kinds() {
        let mapper = mapper();
        let mut log = EventLog::new();
        let spot = WorldPos::new(100.0, 100.0, 0.0);

        assert!(log.try_event(&mapper, PulseKind::UnderAttack, spot, FPS));
        assert!(log.try_event(&mapper, PulseKind::Infiltration, spot, FPS + 1));
    }

    #[test]
    fn test_try_event_throttles_pulse_created_at_frame_zero() {
        let mapper = mapper();
        let mut log = EventLog::new();
        let spot = WorldPos::new(100.0, 100.0, 0.0);

        // A pulse stamped with frame 0 is a real pulse, not a vacant
        // slot; it must still suppress same-kind neighbors.
        assert!(log.try_event(&mapper, PulseKind::UnderAttack, spot, 0));
        assert!(!log.try_event(&mapper, PulseKind::UnderAttack, spot, FPS));
    }

    #[test]
    fn test_last_event_location_skips_ambient() {
        let mapper = mapper();
        let mut log = EventLog::new();
        assert!(log.last_event_location().is_none());

        let attack = WorldPos::new(700.0, 200.0, 0.0);
        log.create_event(&mapper, attack, PulseKind::UnderAttack, 2.0, 10);
        assert_eq!(log.last_event_location(), Some(attack));

        // A beacon blip afterwards does not steal the index.
        log.create_event(
            &mapper,
            WorldPos::new(1.0, 1.0, 0.0),
            PulseKind::BeaconPulse,
            2.0,
            20,
        );
        assert_eq!(log.last_event_location(), Some(attack));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mapper = mapper();
        let mut log = EventLog::new();
        log.create_event(&mapper, WorldPos::default(), PulseKind::Upgrade, 2.0, 10);
        log.clear();

        assert!(log.last_event_location().is_none());
        assert_eq!(log.next_slot(), 0);
        assert!(log.pulses().iter().all(|p| !p.active && !p.occupied));
    }

    #[test]
    fn test_mark_feedback_played() {
        let mapper = mapper();
        let mut log = EventLog::new();
        log.create_event(&mapper, WorldPos::default(), PulseKind::UnderAttack, 2.0, 10);

        assert!(!log.pulses()[0].feedback_played);
        log.mark_feedback_played(0);
        assert!(log.pulses()[0].feedback_played);
    }
}
