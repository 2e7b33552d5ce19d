use indexmap::IndexMap;
use scenemap_common::TraversalId;
use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Instrument;

use crate::graph::{Graph, Node};

/// How the start scene is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// The start scene stays in the remaining set after it is queued, so a
    /// neighbour linking back to it queues it a second time and the visitor
    /// sees it twice.
    #[default]
    Legacy,
    /// The start scene is claimed like any other scene when queued. Every
    /// reachable scene is visited exactly once.
    ClaimSeed,
}

/// Traversal configuration.
#[derive(Debug, Clone, Default)]
pub struct TraversalConfig {
    pub seed_policy: SeedPolicy,
}

impl TraversalConfig {
    /// Configuration that visits every reachable scene exactly once.
    pub fn claim_seed() -> Self {
        Self {
            seed_policy: SeedPolicy::ClaimSeed,
        }
    }
}

/// Lifecycle of a [`Traverser`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalStatus {
    NotStarted,
    Running,
    /// The frontier drained.
    Completed,
    /// The start scene is not in the graph. No visits happened.
    Aborted,
    /// A [`CancelFlag`] was raised between visits.
    Cancelled,
    /// The visitor returned an error.
    Failed,
}

impl TraversalStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::NotStarted | Self::Running)
    }
}

/// Shared cancellation signal for a running traversal.
///
/// Checked once per iteration, right before the visitor is invoked. A visit
/// already in flight runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Scenes whose visit has completed, in completion order.
#[derive(Debug, Clone, Default)]
pub struct Visited<'g> {
    nodes: IndexMap<&'g str, &'g Node>,
}

impl<'g> Visited<'g> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&'g Node> {
        self.nodes.get(id).copied()
    }

    /// Scene names in the order their first visit completed.
    pub fn ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'g Node> + '_ {
        self.nodes.values().copied()
    }

    fn insert(&mut self, node: &'g Node) {
        self.nodes.insert(node.id(), node);
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// Everything a visitor is handed for one traversal step.
#[derive(Debug, Clone, Copy)]
pub struct VisitStep<'a> {
    /// Scene being visited.
    pub current: &'a Node,
    /// Scene dequeued on the previous step, in global traversal order. This
    /// is not necessarily the scene that discovered `current`, nor even one
    /// of its neighbours.
    pub previous_visited: Option<&'a Node>,
    /// Scenes whose visit already completed. `current` is added after this
    /// step returns.
    pub visited: &'a Visited<'a>,
    pub graph: &'a Graph,
    /// 1-based step counter.
    pub step: usize,
}

/// Work run once per visited scene.
///
/// The traverser awaits the returned future before it touches the frontier
/// again, so a visit may take as long as it needs. Implementations can use
/// `async fn visit`.
pub trait Visitor {
    type Error;

    fn visit(&mut self, step: VisitStep<'_>) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Adapts a synchronous closure into a [`Visitor`]. See [`visit_fn`].
pub struct FnVisitor<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

/// Wrap a synchronous closure as a visitor whose every visit completes
/// immediately.
pub fn visit_fn<F, E>(f: F) -> FnVisitor<F, E>
where
    F: FnMut(VisitStep<'_>) -> Result<(), E>,
{
    FnVisitor {
        f,
        _error: PhantomData,
    }
}

impl<F, E> Visitor for FnVisitor<F, E>
where
    F: FnMut(VisitStep<'_>) -> Result<(), E>,
{
    type Error = E;

    fn visit(&mut self, step: VisitStep<'_>) -> impl Future<Output = Result<(), E>> {
        std::future::ready((self.f)(step))
    }
}

/// Breadth-first walk over a [`Graph`] from one start scene.
///
/// Owns its own remaining / pending / visited state, so several traversers
/// may walk the same graph concurrently. Each run yields to the executor
/// exactly once per step, while the visitor runs.
///
/// # Invariants
/// - A scene moves remaining -> pending -> visited and never back.
/// - Only neighbour discovery claims scenes from `remaining`; under
///   [`SeedPolicy::Legacy`] the start scene is the one exception to
///   "queued at most once".
#[derive(Debug)]
pub struct Traverser<'g> {
    id: TraversalId,
    graph: &'g Graph,
    config: TraversalConfig,
    remaining: BTreeMap<&'g str, &'g Node>,
    visited: Visited<'g>,
    pending: VecDeque<&'g Node>,
    status: TraversalStatus,
    steps: usize,
    cancel: CancelFlag,
}

impl<'g> Traverser<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self::with_config(graph, TraversalConfig::default())
    }

    pub fn with_config(graph: &'g Graph, config: TraversalConfig) -> Self {
        Self {
            id: TraversalId::new(),
            graph,
            config,
            remaining: BTreeMap::new(),
            visited: Visited::default(),
            pending: VecDeque::new(),
            status: TraversalStatus::NotStarted,
            steps: 0,
            cancel: CancelFlag::new(),
        }
    }

    pub fn id(&self) -> TraversalId {
        self.id
    }

    pub fn status(&self) -> TraversalStatus {
        self.status
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    pub fn visited(&self) -> &Visited<'g> {
        &self.visited
    }

    /// Number of visitor invocations in the current or last run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_remaining(&self, id: &str) -> bool {
        self.remaining.contains_key(id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queued scene names, front first.
    pub fn pending_ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.pending.iter().map(|n| n.id())
    }

    /// Handle that stops this traverser before its next visit. Starting a
    /// new run lowers the flag again.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Walk the graph breadth-first from `start`, awaiting `visitor` once per
    /// dequeued scene.
    ///
    /// A missing start scene is logged and reported as
    /// [`TraversalStatus::Aborted`]. A visitor error stops the walk and is
    /// returned unchanged.
    pub async fn traverse<V: Visitor>(
        &mut self,
        start: &str,
        visitor: &mut V,
    ) -> Result<TraversalStatus, V::Error> {
        let span = tracing::info_span!("traverse", id = %self.id, start);
        self.run(start, visitor).instrument(span).await
    }

    async fn run<V: Visitor>(
        &mut self,
        start: &str,
        visitor: &mut V,
    ) -> Result<TraversalStatus, V::Error> {
        self.reset();
        let graph = self.graph;

        let Some(seed) = graph.get(start) else {
            tracing::error!(start, "start scene not found in graph");
            self.status = TraversalStatus::Aborted;
            return Ok(self.status);
        };

        self.status = TraversalStatus::Running;
        if self.config.seed_policy == SeedPolicy::ClaimSeed {
            self.remaining.remove(seed.id());
        }
        self.pending.push_back(seed);

        let mut previous: Option<&'g Node> = None;
        while let Some(current) = self.pending.pop_front() {
            if self.cancel.is_cancelled() {
                self.pending.push_front(current);
                tracing::info!(visited = self.visited.len(), "traversal cancelled");
                self.status = TraversalStatus::Cancelled;
                return Ok(self.status);
            }

            self.steps += 1;
            tracing::debug!(
                step = self.steps,
                scene = current.id(),
                previous = previous.map(Node::id),
                "visiting scene"
            );
            let step = VisitStep {
                current,
                previous_visited: previous,
                visited: &self.visited,
                graph,
                step: self.steps,
            };
            if let Err(err) = visitor.visit(step).await {
                tracing::debug!(scene = current.id(), "visitor failed");
                self.status = TraversalStatus::Failed;
                return Err(err);
            }

            self.enqueue_neighbors(current);
            self.visited.insert(current);
            previous = Some(current);
        }

        tracing::debug!(visited = self.visited.len(), steps = self.steps, "traversal complete");
        self.status = TraversalStatus::Completed;
        Ok(self.status)
    }

    fn reset(&mut self) {
        let graph = self.graph;
        self.remaining = graph.iter().map(|n| (n.id(), n)).collect();
        self.visited.clear();
        self.pending.clear();
        self.steps = 0;
        self.status = TraversalStatus::NotStarted;
        self.cancel.clear();
    }

    fn enqueue_neighbors(&mut self, node: &'g Node) {
        for destination in node.destination_ids() {
            if let Some(next) = self.remaining.remove(destination) {
                tracing::trace!(scene = destination, from = node.id(), "scheduling scene");
                self.pending.push_back(next);
            }
        }
    }
}
