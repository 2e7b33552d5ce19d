//! Developer Tooling: scene graph inspector and reachability reports.
//!
//! # Invariants
//! - Tools only read the graph; they never rebuild or mutate it.

pub mod inspector;

pub use inspector::{DoorInfo, GraphInspector, GraphSummary, Reachability, SceneInfo};
