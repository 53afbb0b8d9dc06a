//! Resource locations and folder-prefix conventions.

use std::fmt;

/// Namespace assumed for references written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Folder prefixes that mark a block model or block texture.
pub const BLOCK_PREFIXES: [&str; 2] = ["block/", "blocks/"];

/// Folder prefixes that mark an item model or item texture.
pub const ITEM_PREFIXES: [&str; 2] = ["item/", "items/"];

/// A namespaced reference such as `minecraft:item/bow`.
///
/// `item/bow` and `minecraft:item/bow` parse to equal values, which is what
/// deduplication and mapping lookups rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    /// Create a location from its parts.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parse a reference, defaulting the namespace to `minecraft`.
    ///
    /// Only the first `:` separates namespace from path.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, reference),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The same namespace with a different path.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self::new(self.namespace.clone(), path)
    }

    /// Path with a leading block folder removed, if it has one.
    pub fn block_relative(&self) -> Option<&str> {
        strip_any_prefix(&self.path, &BLOCK_PREFIXES)
    }

    /// Path with a leading item folder removed, if it has one.
    pub fn item_relative(&self) -> Option<&str> {
        strip_any_prefix(&self.path, &ITEM_PREFIXES)
    }

    /// Whether the path lives in a block folder.
    pub fn is_block(&self) -> bool {
        self.block_relative().is_some()
    }

    /// Whether this is an engine-provided parent like `builtin/generated`.
    pub fn is_builtin(&self) -> bool {
        self.path.starts_with("builtin/")
    }

    /// The equivalent location in the item folder (`block/x` -> `item/x`).
    pub fn to_item_folder(&self) -> Option<Self> {
        self.block_relative()
            .map(|rest| self.with_path(format!("item/{}", rest)))
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Whether a texture value is a `#variable` reference rather than a path.
pub fn is_texture_variable(value: &str) -> bool {
    value.starts_with('#')
}

fn strip_any_prefix<'a>(path: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| path.strip_prefix(prefix))
}
