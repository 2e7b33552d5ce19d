use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Unique identifier for one traversal run, used to tell concurrent walks
/// apart in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraversalId(pub Uuid);

impl TraversalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TraversalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraversalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A door-like connector leading out of a scene.
///
/// `door_name` is not guaranteed unique within a scene and
/// `destination_scene_name` may name a scene that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub door_name: String,
    pub destination_scene_name: String,
}

impl TransitionRecord {
    pub fn new(door_name: impl Into<String>, destination_scene_name: impl Into<String>) -> Self {
        Self {
            door_name: door_name.into(),
            destination_scene_name: destination_scene_name.into(),
        }
    }
}

/// A scene as described by the world provider.
///
/// `transitions` is `None` when the provider supplied no transition list at
/// all, which is distinct from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub scene_name: String,
    #[serde(default)]
    pub transitions: Option<Vec<TransitionRecord>>,
}

impl SceneRecord {
    pub fn new(scene_name: impl Into<String>, transitions: Vec<TransitionRecord>) -> Self {
        Self {
            scene_name: scene_name.into(),
            transitions: Some(transitions),
        }
    }

    /// A scene whose transition list is missing.
    pub fn without_transitions(scene_name: impl Into<String>) -> Self {
        Self {
            scene_name: scene_name.into(),
            transitions: None,
        }
    }

    /// Transitions as a slice; a missing list reads as empty.
    pub fn transitions(&self) -> &[TransitionRecord] {
        self.transitions.as_deref().unwrap_or_default()
    }
}

/// Errors from loading a world description.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported world file extension: {0:?}")]
    UnsupportedFormat(String),
}

/// Ordered collection of scene records, as handed over by the world provider.
///
/// Entries may be `None`; the graph builder skips them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDescription {
    pub scenes: Vec<Option<SceneRecord>>,
}

impl WorldDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scene record.
    pub fn push(&mut self, scene: SceneRecord) {
        self.scenes.push(Some(scene));
    }

    /// Append an absent entry.
    pub fn push_missing(&mut self) {
        self.scenes.push(None);
    }

    /// Number of entries, absent ones included.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// First present record with the given name.
    pub fn find(&self, scene_name: &str) -> Option<&SceneRecord> {
        self.scenes
            .iter()
            .flatten()
            .find(|s| s.scene_name == scene_name)
    }

    pub fn from_json_str(s: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, RecordError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            other => Err(RecordError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

impl FromIterator<SceneRecord> for WorldDescription {
    fn from_iter<I: IntoIterator<Item = SceneRecord>>(iter: I) -> Self {
        Self {
            scenes: iter.into_iter().map(Some).collect(),
        }
    }
}
