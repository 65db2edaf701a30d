//! Minimap/radar subsystem for TACMAP.
//!
//! Maintains a priority-ordered registry of entities visible on the
//! minimap, converts between world coordinates, the fixed 128x128
//! logical grid, and letterboxed on-screen pixels, and runs a
//! fixed-capacity log of short-lived animated alert markers with
//! spatiotemporal throttling. Rendering, audio feedback, fog-of-war
//! and terrain storage stay outside; this crate only talks to them
//! through the seams in `terrain` and the component queries.

pub mod events;
pub mod mapper;
pub mod query;
pub mod radar;
pub mod registry;
pub mod snapshot;
pub mod terrain;

pub use tacmap_core as core;

pub use events::{EventLog, Pulse};
pub use mapper::{CoordinateMapper, RadarWindow};
pub use radar::Radar;
pub use registry::{TrackRegistry, TrackedEntry};
pub use snapshot::{RadarSnapshot, SnapshotError};
pub use terrain::TerrainSource;
