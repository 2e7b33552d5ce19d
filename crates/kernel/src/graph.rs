use indexmap::IndexMap;
use scenemap_common::{SceneRecord, TransitionRecord};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A validated scene with its resolved outgoing connections.
///
/// Connections map a door name to the *scene record* behind it, not to
/// another `Node`. Node-to-node links go through the owning [`Graph`], keyed
/// by scene name. Connection order follows the input transition order.
#[derive(Debug, Clone)]
pub struct Node {
    scene: Arc<SceneRecord>,
    connections: IndexMap<String, Arc<SceneRecord>>,
}

impl Node {
    pub(crate) fn new(scene: Arc<SceneRecord>, connections: IndexMap<String, Arc<SceneRecord>>) -> Self {
        debug_assert!(!connections.is_empty(), "nodes always carry connections");
        Self { scene, connections }
    }

    /// Scene identifier.
    pub fn id(&self) -> &str {
        &self.scene.scene_name
    }

    /// The scene record this node was built from.
    pub fn scene(&self) -> &SceneRecord {
        &self.scene
    }

    /// Resolved connections, door name to destination scene, in input order.
    pub fn connections(&self) -> &IndexMap<String, Arc<SceneRecord>> {
        &self.connections
    }

    /// Destination behind a door, if the door resolved.
    pub fn connection(&self, door_name: &str) -> Option<&SceneRecord> {
        self.connections.get(door_name).map(Arc::as_ref)
    }

    /// Destination scene names, one per resolved door.
    pub fn destination_ids(&self) -> impl Iterator<Item = &str> {
        self.connections.values().map(|s| s.scene_name.as_str())
    }

    /// Every transition of the underlying scene, resolved or not.
    pub fn transitions(&self) -> &[TransitionRecord] {
        self.scene.transitions()
    }

    pub fn transition_names(&self) -> Vec<&str> {
        self.transitions().iter().map(|t| t.door_name.as_str()).collect()
    }

    pub fn transitions_with_name_containing(&self, filter: &str) -> Vec<&TransitionRecord> {
        self.transitions()
            .iter()
            .filter(|t| t.door_name.contains(filter))
            .collect()
    }

    pub fn transitions_with_name_not_containing(&self, filter: &str) -> Vec<&TransitionRecord> {
        self.transitions()
            .iter()
            .filter(|t| !t.door_name.contains(filter))
            .collect()
    }

    pub fn transition_names_containing(&self, filter: &str) -> Vec<&str> {
        self.transition_names()
            .into_iter()
            .filter(|n| n.contains(filter))
            .collect()
    }

    pub fn transition_names_not_containing(&self, filter: &str) -> Vec<&str> {
        self.transition_names()
            .into_iter()
            .filter(|n| !n.contains(filter))
            .collect()
    }

    /// First transition whose door name matches exactly.
    pub fn transition_with_name(&self, door_name: &str) -> Option<&TransitionRecord> {
        self.transitions().iter().find(|t| t.door_name == door_name)
    }

    /// Neighbouring nodes in connection order.
    ///
    /// A destination that resolved at build time but was itself dropped from
    /// the graph (no valid connections of its own) has no node and is skipped.
    pub fn neighbors<'g>(&self, graph: &'g Graph) -> Vec<&'g Node> {
        self.destination_ids().filter_map(|id| graph.get(id)).collect()
    }

    pub fn neighbors_named_containing<'g>(&self, graph: &'g Graph, filter: &str) -> Vec<&'g Node> {
        self.neighbors(graph)
            .into_iter()
            .filter(|n| n.id().contains(filter))
            .collect()
    }

    pub fn neighbors_named_not_containing<'g>(&self, graph: &'g Graph, filter: &str) -> Vec<&'g Node> {
        self.neighbors(graph)
            .into_iter()
            .filter(|n| !n.id().contains(filter))
            .collect()
    }
}

/// Scene graph: scene name to [`Node`].
///
/// Produced once by [`GraphBuilder`](crate::GraphBuilder) and read-only
/// afterwards, so any number of traversals may borrow it at the same time.
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in scene-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Total resolved connections across all nodes.
    pub fn connection_count(&self) -> usize {
        self.nodes.values().map(|n| n.connections.len()).sum()
    }

    /// Insert a node. Returns `false`, leaving the graph untouched, if the
    /// identifier is already taken.
    pub(crate) fn insert(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(node.id()) {
            return false;
        }
        self.nodes.insert(node.id().to_string(), node);
        true
    }
}
