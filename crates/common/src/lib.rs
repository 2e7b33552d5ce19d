//! Shared types for the scene map engine: the raw world description read from
//! an external provider, and identifiers used across crates.
//!
//! # Invariants
//! - Records are read-only input; nothing in the engine mutates them after load.
//! - Absent (`null`) scenes and transition lists are representable, not rejected.

pub mod types;

pub use types::{RecordError, SceneRecord, TransitionRecord, TraversalId, WorldDescription};
