//! Whole-pack migration.
//!
//! A run converts legacy item definitions, relocates block textures, and
//! then relocates item models and textures, in that order. Only a missing
//! pack root fails the run; everything else is logged per file and counted.

pub mod block_textures;
pub mod context;
pub mod item_models;

pub use context::{BlockToItemMapping, MigrationContext};
pub use item_models::ItemModelPass;

use crate::convert::convert_directory;
use crate::error::{MigrateError, Result};
use crate::fetch::{ClientJarSource, NoTextureSource, TextureSource, DEFAULT_CLIENT_VERSION};
use crate::resource_pack::layout::json_files;
use crate::resource_pack::PackLayout;
use std::path::{Path, PathBuf};
use tracing::info;

/// Migration configuration.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Convert models/item overrides into items/*.json.
    pub convert_items: bool,
    /// Move textures used by block models into textures/block.
    pub relocate_block_textures: bool,
    /// Mirror block models used by items and move their textures into textures/item.
    pub relocate_item_textures: bool,
    /// Pull missing vanilla textures from the client jar.
    pub fetch_missing_textures: bool,
    /// Game version whose client jar is downloaded.
    pub client_version: String,
    /// Use this jar instead of downloading one.
    pub client_jar: Option<PathBuf>,
    /// Where downloaded jars are cached.
    pub cache_dir: Option<PathBuf>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            convert_items: true,
            relocate_block_textures: true,
            relocate_item_textures: true,
            fetch_missing_textures: true,
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            client_jar: None,
            cache_dir: None,
        }
    }
}

impl MigrationConfig {
    /// Only convert item definitions; leave textures and models alone.
    pub fn conversion_only() -> Self {
        Self {
            relocate_block_textures: false,
            relocate_item_textures: false,
            fetch_missing_textures: false,
            ..Self::default()
        }
    }

    /// Never touch the network or a client jar.
    pub fn offline(mut self) -> Self {
        self.fetch_missing_textures = false;
        self
    }

    pub fn with_client_jar<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.client_jar = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_client_version(mut self, version: &str) -> Self {
        self.client_version = version.to_string();
        self
    }

    pub fn with_cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// The texture source this configuration asks for.
    pub fn texture_source(&self) -> Box<dyn TextureSource> {
        if !self.fetch_missing_textures {
            return Box::new(NoTextureSource);
        }
        match &self.client_jar {
            Some(jar) => Box::new(ClientJarSource::local(jar)),
            None => Box::new(ClientJarSource::download(
                &self.client_version,
                self.cache_dir.clone(),
            )),
        }
    }
}

/// Counters describing what a run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Legacy definitions written to items/ and deleted.
    pub items_converted: usize,
    /// Legacy files with nothing to convert.
    pub items_skipped: usize,
    /// Block models whose texture entries were rewritten.
    pub block_models_modified: usize,
    /// Texture and animation files copied inside the pack.
    pub textures_copied: usize,
    /// Textures written from the fallback source.
    pub textures_fetched: usize,
    /// Block models copied into models/item.
    pub models_mirrored: usize,
    /// Models whose block textures were pointed at item textures.
    pub item_models_rewritten: usize,
    /// Item documents whose model references were updated.
    pub item_documents_updated: usize,
    /// Per-file failures that were logged and skipped.
    pub errors: usize,
}

/// Migrates one resource pack directory in place.
pub struct Migrator {
    layout: PackLayout,
    config: MigrationConfig,
    textures: Box<dyn TextureSource>,
}

impl Migrator {
    /// Create a migrator with default configuration.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_config(root, MigrationConfig::default())
    }

    /// Create a migrator with custom configuration.
    pub fn with_config<P: AsRef<Path>>(root: P, config: MigrationConfig) -> Self {
        let textures = config.texture_source();
        Self {
            layout: PackLayout::new(root),
            config,
            textures,
        }
    }

    /// Replace the fallback texture source.
    pub fn with_texture_source(mut self, textures: Box<dyn TextureSource>) -> Self {
        self.textures = textures;
        self
    }

    pub fn layout(&self) -> &PackLayout {
        &self.layout
    }

    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Run every enabled pass over the pack.
    pub fn run(&self) -> Result<MigrationReport> {
        let root = self.layout.root();
        if !root.is_dir() {
            return Err(MigrateError::InputNotFound(root.to_path_buf()));
        }

        let mut context = MigrationContext::new();

        if self.config.convert_items {
            convert_directory(&self.layout, &mut context.report);
        }

        if self.config.relocate_block_textures {
            let block_models = json_files(&self.layout.block_models_dir());
            block_textures::relocate_block_textures(&self.layout, &block_models, &mut context);
        }

        if self.config.relocate_item_textures {
            ItemModelPass::new(&self.layout, self.textures.as_ref(), &mut context).run();
        }

        let report = context.report;
        info!(
            "Migration finished: {} converted, {} block models, {} item models, {} documents updated, {} copied, {} fetched, {} errors",
            report.items_converted,
            report.block_models_modified,
            report.item_models_rewritten,
            report.item_documents_updated,
            report.textures_copied,
            report.textures_fetched,
            report.errors
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::layout::{read_json, write_json};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, value: Value) {
        write_json(&root.join(relative), &value).unwrap();
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let migrator = Migrator::with_config(dir.path().join("nope"), MigrationConfig::default().offline());
        assert!(matches!(migrator.run(), Err(MigrateError::InputNotFound(_))));
    }

    #[test]
    fn test_empty_pack_succeeds() {
        let dir = TempDir::new().unwrap();
        let report = Migrator::with_config(dir.path(), MigrationConfig::default().offline())
            .run()
            .unwrap();
        assert_eq!(report, MigrationReport::default());
    }

    #[test]
    fn test_full_run() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        write(root, "assets/minecraft/models/item/stick.json", json!({
            "parent": "item/handheld",
            "textures": {"layer0": "item/stick"},
            "overrides": [
                {"predicate": {"custom_model_data": 1}, "model": "block/magic_lamp"},
                {"predicate": {"custom_model_data": 2}, "model": "item/wand"}
            ]
        }));
        write(root, "assets/minecraft/models/item/wand.json", json!({
            "parent": "item/handheld",
            "textures": {"layer0": "block/gold_block"}
        }));
        write(root, "assets/minecraft/models/block/magic_lamp.json", json!({
            "parent": "block/cube_all",
            "textures": {"all": "item/lamp_glow"}
        }));
        std::fs::create_dir_all(root.join("assets/minecraft/textures/item")).unwrap();
        std::fs::write(root.join("assets/minecraft/textures/item/lamp_glow.png"), b"glow").unwrap();

        let mut jar = HashMap::new();
        jar.insert("block/gold_block".to_string(), b"gold".to_vec());

        let report = Migrator::with_config(root, MigrationConfig::default().offline())
            .with_texture_source(Box::new(jar))
            .run()
            .unwrap();

        assert_eq!(report.items_converted, 1);
        assert_eq!(report.items_skipped, 1);
        assert_eq!(report.block_models_modified, 1);
        assert_eq!(report.item_documents_updated, 1);
        assert_eq!(report.textures_fetched, 1);
        assert_eq!(report.errors, 0);

        assert!(!root.join("assets/minecraft/models/item/stick.json").exists());
        let stick: Value = read_json(&root.join("assets/minecraft/items/stick.json")).unwrap();
        assert_eq!(stick["model"]["entries"][0]["model"]["model"], "minecraft:item/magic_lamp");
        assert_eq!(stick["model"]["entries"][1]["model"]["model"], "item/wand");

        // Block pass moved the lamp texture, item pass moved it back for the mirrored model.
        let block_lamp: Value = read_json(&root.join("assets/minecraft/models/block/magic_lamp.json")).unwrap();
        assert_eq!(block_lamp["textures"]["all"], "minecraft:block/lamp_glow");
        let item_lamp: Value = read_json(&root.join("assets/minecraft/models/item/magic_lamp.json")).unwrap();
        assert_eq!(item_lamp["textures"]["all"], "minecraft:item/lamp_glow");

        let wand: Value = read_json(&root.join("assets/minecraft/models/item/wand.json")).unwrap();
        assert_eq!(wand["textures"]["layer0"], "minecraft:item/gold_block");
        assert_eq!(
            std::fs::read(root.join("assets/minecraft/textures/item/gold_block.png")).unwrap(),
            b"gold"
        );
    }

    #[test]
    fn test_conversion_only_leaves_models_alone() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let block = json!({"textures": {"all": "item/ruby"}});
        write(root, "assets/minecraft/models/block/ruby.json", block.clone());

        let report = Migrator::with_config(root, MigrationConfig::conversion_only()).run().unwrap();
        assert_eq!(report.block_models_modified, 0);
        let after: Value = read_json(&root.join("assets/minecraft/models/block/ruby.json")).unwrap();
        assert_eq!(after, block);
    }

    #[test]
    fn test_config_builders() {
        let config = MigrationConfig::default()
            .with_client_version("1.21.5")
            .with_client_jar("/tmp/client.jar")
            .with_cache_dir("/tmp/cache");
        assert_eq!(config.client_version, "1.21.5");
        assert_eq!(config.client_jar, Some(PathBuf::from("/tmp/client.jar")));
        assert!(config.fetch_missing_textures);
        assert!(!config.clone().offline().fetch_missing_textures);
    }
}
