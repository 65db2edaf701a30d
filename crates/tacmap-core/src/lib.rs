//! Core types and definitions for the TACMAP minimap/radar subsystem.
//!
//! This crate defines the vocabulary shared across the radar crates:
//! geometric types, display enums, the hecs components the radar reads
//! from simulation entities, and tuning constants. It has no dependency
//! on any runtime framework.

pub mod components;
pub mod constants;
pub mod enums;
pub mod types;
