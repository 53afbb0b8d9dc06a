//! Run-scoped state shared by the migration passes.

use super::MigrationReport;
use crate::resource_pack::ResourceLocation;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// State owned by a single migration run.
#[derive(Debug, Default)]
pub struct MigrationContext {
    /// Model files whose textures were already rewritten this run.
    processed_models: HashSet<PathBuf>,
    /// Counters accumulated across passes.
    pub report: MigrationReport,
}

impl MigrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, model_file: &Path) -> bool {
        self.processed_models.contains(model_file)
    }

    /// Mark a model file as processed. Returns `false` if it already was.
    pub fn mark_processed(&mut self, model_file: &Path) -> bool {
        self.processed_models.insert(model_file.to_path_buf())
    }

    pub fn processed_count(&self) -> usize {
        self.processed_models.len()
    }
}

/// Block models mirrored into the item folder while migrating one item.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlockToItemMapping {
    entries: HashMap<ResourceLocation, ResourceLocation>,
}

impl BlockToItemMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, block: ResourceLocation, item: ResourceLocation) {
        self.entries.insert(block, item);
    }

    pub fn get(&self, block: &ResourceLocation) -> Option<&ResourceLocation> {
        self.entries.get(block)
    }

    /// Look up a reference as written in a document, namespaced or bare.
    pub fn lookup(&self, reference: &str) -> Option<&ResourceLocation> {
        self.get(&ResourceLocation::parse(reference))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_lookup_normalizes_namespace() {
        let mut mapping = BlockToItemMapping::new();
        mapping.record(
            ResourceLocation::parse("block/lamp"),
            ResourceLocation::parse("item/lamp"),
        );

        assert_eq!(mapping.len(), 1);
        assert_eq!(
            mapping.lookup("minecraft:block/lamp").map(|l| l.to_string()),
            Some("minecraft:item/lamp".to_string())
        );
        assert!(mapping.lookup("block/lamp").is_some());
        assert!(mapping.lookup("other:block/lamp").is_none());
    }

    #[test]
    fn test_processed_models() {
        let mut context = MigrationContext::new();
        let path = Path::new("/pack/assets/minecraft/models/item/a.json");
        assert!(!context.is_processed(path));
        assert!(context.mark_processed(path));
        assert!(!context.mark_processed(path));
        assert!(context.is_processed(path));
        assert_eq!(context.processed_count(), 1);
    }
}
