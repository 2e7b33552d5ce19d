use scenemap_kernel::{Graph, TraversalConfig, Traverser, VisitStep, visit_fn};
use std::collections::BTreeSet;
use std::convert::Infallible;

/// Scene graph inspector for developer tooling.
///
/// Provides read-only queries against a built graph for debugging and for
/// checking how much of a world a walk can reach.
pub struct GraphInspector;

impl GraphInspector {
    /// Produce a summary of the graph.
    pub fn summary(graph: &Graph) -> GraphSummary {
        let doors = graph.iter().map(|n| n.transitions().len()).sum();
        let dead_ends = graph
            .iter()
            .flat_map(|n| n.destination_ids())
            .filter(|id| !graph.contains(id))
            .count();
        GraphSummary {
            scene_count: graph.len(),
            connection_count: graph.connection_count(),
            door_count: doors,
            dead_end_count: dead_ends,
        }
    }

    /// Describe one scene and where each of its doors leads.
    pub fn inspect_scene(graph: &Graph, id: &str) -> Option<SceneInfo> {
        graph.get(id).map(|node| SceneInfo {
            id: node.id().to_string(),
            doors: node
                .transitions()
                .iter()
                .map(|t| DoorInfo {
                    door: t.door_name.clone(),
                    destination: t.destination_scene_name.clone(),
                    resolved: node.connection(&t.door_name).is_some(),
                    in_graph: graph.contains(&t.destination_scene_name),
                })
                .collect(),
        })
    }

    /// List all scene names in the graph.
    pub fn list_scenes(graph: &Graph) -> Vec<String> {
        graph.ids().map(str::to_string).collect()
    }

    /// Scenes reachable from `start`, in breadth-first order. Empty if
    /// `start` is not in the graph.
    pub fn reachable_from(graph: &Graph, start: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut traverser = Traverser::with_config(graph, TraversalConfig::claim_seed());
        let mut visitor = visit_fn(|step: VisitStep<'_>| {
            order.push(step.current.id().to_string());
            Ok::<_, Infallible>(())
        });
        if let Err(never) = pollster::block_on(traverser.traverse(start, &mut visitor)) {
            match never {}
        }
        order
    }

    /// Scenes a walk from `start` never reaches, in name order.
    pub fn unreachable_from(graph: &Graph, start: &str) -> Vec<String> {
        Self::reachability(graph, start).unreachable
    }

    /// Split the graph into reached and unreached scenes with a single walk
    /// from `start`.
    pub fn reachability(graph: &Graph, start: &str) -> Reachability {
        let reachable = Self::reachable_from(graph, start);
        let reached: BTreeSet<&str> = reachable.iter().map(String::as_str).collect();
        let unreachable = graph
            .ids()
            .filter(|id| !reached.contains(id))
            .map(str::to_string)
            .collect();
        Reachability {
            reachable,
            unreachable,
        }
    }
}

/// Result of [`GraphInspector::reachability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    /// Breadth-first order.
    pub reachable: Vec<String>,
    /// Name order.
    pub unreachable: Vec<String>,
}

/// Summary of a scene graph for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSummary {
    pub scene_count: usize,
    pub connection_count: usize,
    /// All doors of all scenes, resolved or not.
    pub door_count: usize,
    /// Resolved connections whose destination has no node of its own.
    pub dead_end_count: usize,
}

impl std::fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph: scenes={} connections={} doors={} dead_ends={}",
            self.scene_count, self.connection_count, self.door_count, self.dead_end_count
        )
    }
}

/// One door of an inspected scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorInfo {
    pub door: String,
    pub destination: String,
    /// The door produced a connection at build time.
    pub resolved: bool,
    /// The destination is a node in the graph.
    pub in_graph: bool,
}

/// Detailed info about a single scene.
#[derive(Debug, Clone)]
pub struct SceneInfo {
    pub id: String,
    pub doors: Vec<DoorInfo>,
}

impl std::fmt::Display for SceneInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scene [{}] doors={}", self.id, self.doors.len())?;
        for d in &self.doors {
            let mark = match (d.resolved, d.in_graph) {
                (true, true) => "",
                (true, false) => " (dead end)",
                (false, _) => " (unresolved)",
            };
            write!(f, "\n  {} -> {}{}", d.door, d.destination, mark)?;
        }
        Ok(())
    }
}
