//! Scene Map Kernel: builds a scene graph from a raw world description and
//! walks it breadth-first, handing each scene to an async visitor.
//!
//! # Invariants
//! - Every node has at least one resolved connection.
//! - A built graph is never mutated; traversals only borrow it.
//! - Each traversal owns its remaining / pending / visited state.
//! - At most one visit is in flight per traversal.

pub mod builder;
pub mod graph;
pub mod map;
pub mod traversal;

pub use builder::{BuildError, BuildStats, GraphBuilder};
pub use graph::{Graph, Node};
pub use map::{TraversalReport, WalkError, WorldMap, WorldSource};
pub use traversal::{
    CancelFlag, FnVisitor, SeedPolicy, TraversalConfig, TraversalStatus, Traverser, VisitStep,
    Visited, Visitor, visit_fn,
};
