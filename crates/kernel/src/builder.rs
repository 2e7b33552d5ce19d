use indexmap::IndexMap;
use scenemap_common::{SceneRecord, WorldDescription};
use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::{Graph, Node};

/// Errors from graph construction.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Two scene records with the same name both produced a node. The input
    /// cannot be reconciled, so no graph is returned.
    #[error("duplicate scene {id:?} at world index {index}")]
    DuplicateScene { id: String, index: usize },
}

/// Counters from the last build, for instrumentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Entries in the world description, absent ones included.
    pub records: usize,
    pub nodes_built: usize,
    /// Entries that produced no node: absent, missing transitions, or no
    /// resolvable connection.
    pub scenes_skipped: usize,
    /// Transitions whose destination scene does not exist.
    pub transitions_skipped: usize,
    /// Doors that replaced an earlier door of the same name with a
    /// different destination.
    pub doors_overwritten: usize,
}

/// Turns a raw [`WorldDescription`] into a [`Graph`].
///
/// Malformed input is skipped with a warning, one unit at a time: an absent
/// record or a missing transition list drops the scene, an unknown
/// destination drops the transition, and a scene left without connections
/// is dropped last. Only a duplicate scene name aborts the build.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    stats: BuildStats,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics from the last call to [`build`](Self::build).
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn build(&mut self, world: &WorldDescription) -> Result<Graph, BuildError> {
        let _span = tracing::info_span!("build_graph", records = world.len()).entered();
        self.stats = BuildStats {
            records: world.len(),
            ..BuildStats::default()
        };

        let records: Vec<Option<Arc<SceneRecord>>> = world
            .scenes
            .iter()
            .map(|s| s.clone().map(Arc::new))
            .collect();

        // First record wins when names repeat.
        let mut by_name: HashMap<&str, &Arc<SceneRecord>> = HashMap::new();
        for record in records.iter().flatten() {
            by_name.entry(record.scene_name.as_str()).or_insert(record);
        }

        let mut graph = Graph::new();
        for (index, entry) in records.iter().enumerate() {
            let Some(scene) = entry else {
                tracing::warn!(index, "world entry is null, skipping");
                self.stats.scenes_skipped += 1;
                continue;
            };
            let Some(transitions) = scene.transitions.as_ref() else {
                tracing::warn!(index, scene = %scene.scene_name, "transitions are null, skipping");
                self.stats.scenes_skipped += 1;
                continue;
            };

            let mut connections: IndexMap<String, Arc<SceneRecord>> = IndexMap::new();
            for transition in transitions {
                let Some(&destination) = by_name.get(transition.destination_scene_name.as_str())
                else {
                    tracing::warn!(
                        scene = %scene.scene_name,
                        door = %transition.door_name,
                        destination = %transition.destination_scene_name,
                        "skipping connection to unknown scene"
                    );
                    self.stats.transitions_skipped += 1;
                    continue;
                };
                let replaced = connections.insert(transition.door_name.clone(), Arc::clone(destination));
                if let Some(old) = replaced.filter(|old| old.scene_name != destination.scene_name) {
                    tracing::warn!(
                        scene = %scene.scene_name,
                        door = %transition.door_name,
                        old = %old.scene_name,
                        new = %destination.scene_name,
                        "duplicate door overwrites earlier connection"
                    );
                    self.stats.doors_overwritten += 1;
                }
            }

            if connections.is_empty() {
                tracing::warn!(scene = %scene.scene_name, "scene has no valid connections, skipping");
                self.stats.scenes_skipped += 1;
                continue;
            }

            if !graph.insert(Node::new(Arc::clone(scene), connections)) {
                return Err(BuildError::DuplicateScene {
                    id: scene.scene_name.clone(),
                    index,
                });
            }
            self.stats.nodes_built += 1;
        }

        tracing::debug!(
            nodes = graph.len(),
            skipped = self.stats.scenes_skipped,
            "graph built"
        );
        Ok(graph)
    }
}
