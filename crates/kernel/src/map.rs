use scenemap_common::{TraversalId, WorldDescription};

use crate::builder::{BuildError, GraphBuilder};
use crate::graph::Graph;
use crate::traversal::{TraversalConfig, TraversalStatus, Traverser, Visitor};

/// External provider of the raw world description.
pub trait WorldSource {
    fn world_description(&self) -> WorldDescription;
}

impl WorldSource for WorldDescription {
    fn world_description(&self) -> WorldDescription {
        self.clone()
    }
}

/// Errors from [`WorldMap::start_traversal`].
#[derive(Debug, thiserror::Error)]
pub enum WalkError<E> {
    #[error("graph build failed: {0}")]
    Build(#[from] BuildError),
    #[error("visitor failed: {0}")]
    Visit(E),
}

/// Outcome of a finished traversal, detached from the graph borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalReport {
    pub id: TraversalId,
    pub status: TraversalStatus,
    /// Visitor invocations, repeat visits included.
    pub steps: usize,
    /// Visited scene names in completion order.
    pub visited: Vec<String>,
}

/// Owns a world source and the graph built from it.
///
/// The graph is built at most once until [`reset_graph`](Self::reset_graph)
/// is called; there is no automatic invalidation when the source changes.
pub struct WorldMap<S> {
    source: S,
    graph: Option<Graph>,
}

impl<S: WorldSource> WorldMap<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            graph: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The built graph, if any.
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.graph.is_some()
    }

    /// Build the graph from the source unless it is already built.
    ///
    /// A built graph with zero scenes still counts as built.
    pub fn build_graph(&mut self) -> Result<&Graph, BuildError> {
        let graph = match self.graph.take() {
            Some(graph) => graph,
            None => {
                let world = self.source.world_description();
                GraphBuilder::new().build(&world)?
            }
        };
        Ok(&*self.graph.insert(graph))
    }

    /// Drop the built graph. The next build re-reads the source.
    pub fn reset_graph(&mut self) {
        if self.graph.take().is_some() {
            tracing::debug!("scene graph reset");
        }
    }

    /// Build the graph if needed, then walk it from `start`.
    pub async fn start_traversal<V: Visitor>(
        &mut self,
        start: &str,
        visitor: &mut V,
        config: TraversalConfig,
    ) -> Result<TraversalReport, WalkError<V::Error>> {
        let graph = self.build_graph()?;
        let mut traverser = Traverser::with_config(graph, config);
        let status = traverser
            .traverse(start, visitor)
            .await
            .map_err(WalkError::Visit)?;
        Ok(TraversalReport {
            id: traverser.id(),
            status,
            steps: traverser.steps(),
            visited: traverser.visited().ids().map(str::to_string).collect(),
        })
    }
}
