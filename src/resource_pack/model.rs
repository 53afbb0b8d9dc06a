//! Model document parsing.
//!
//! Only `parent` and `textures` are interpreted. Every other field
//! (elements, display, gui_light, ...) is carried through untouched so
//! that documents can be rewritten in place.

use super::location::{is_texture_variable, ResourceLocation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A model from models/**/*.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    /// Parent model to inherit from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Texture variable definitions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub textures: BTreeMap<String, String>,

    /// Fields this tool does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelDocument {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the parsed parent location.
    pub fn parent_location(&self) -> Option<ResourceLocation> {
        self.parent.as_deref().map(ResourceLocation::parse)
    }

    /// Texture entries that name a path rather than a `#variable`.
    pub fn texture_paths(&self) -> impl Iterator<Item = (&str, ResourceLocation)> {
        self.textures
            .iter()
            .filter(|(_, value)| !is_texture_variable(value))
            .map(|(key, value)| (key.as_str(), ResourceLocation::parse(value)))
    }
}
