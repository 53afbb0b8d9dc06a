//! Pull item models and their textures out of the block folders.
//!
//! For every items/*.json document the referenced models are followed up
//! their parent chain. Block models on the way are mirrored into
//! models/item, block textures are copied into textures/item (or fetched
//! from the client jar), and all references are rewritten to the new
//! locations.

use super::context::{BlockToItemMapping, MigrationContext};
use crate::error::{MigrateError, Result};
use crate::fetch::{FetchOutcome, TextureSource};
use crate::resource_pack::layout::{
    copy_if_absent, read_json, sidecar_for, write_if_absent, write_json,
};
use crate::resource_pack::{ModelDocument, PackLayout, ResourceLocation};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Migrates item documents against one pack, sharing state across items.
pub struct ItemModelPass<'a> {
    layout: &'a PackLayout,
    textures: &'a dyn TextureSource,
    context: &'a mut MigrationContext,
}

impl<'a> ItemModelPass<'a> {
    pub fn new(
        layout: &'a PackLayout,
        textures: &'a dyn TextureSource,
        context: &'a mut MigrationContext,
    ) -> Self {
        Self {
            layout,
            textures,
            context,
        }
    }

    /// Migrate every document in the items directory.
    pub fn run(&mut self) {
        for path in self.layout.item_documents() {
            if let Err(e) = self.migrate_document(&path) {
                warn!("Error processing item {}: {}", path.display(), e);
                self.context.report.errors += 1;
            }
        }
    }

    /// Migrate one item document. Returns whether the document was rewritten.
    pub fn migrate_document(&mut self, path: &Path) -> Result<bool> {
        let mut document: Value = read_json(path)?;
        let mut mapping = BlockToItemMapping::new();

        for reference in model_references(&document) {
            match self.migrate_reference(&reference, &mut mapping) {
                Ok(()) => {}
                Err(MigrateError::ModelNotFound(_)) => {
                    debug!("Skipping {} in {}: not in pack", reference, path.display());
                }
                Err(e) => {
                    warn!("Error processing {} in {}: {}", reference, path.display(), e);
                    self.context.report.errors += 1;
                }
            }
        }

        if mapping.is_empty() || !apply_mapping(&mut document, &mapping) {
            return Ok(false);
        }

        write_json(path, &document)?;
        self.context.report.item_documents_updated += 1;
        Ok(true)
    }

    /// Follow one model reference, mirroring and relocating as needed.
    fn migrate_reference(
        &mut self,
        reference: &ResourceLocation,
        mapping: &mut BlockToItemMapping,
    ) -> Result<()> {
        let start = match reference.to_item_folder() {
            Some(item_location) => {
                if !self.layout.model_path(reference).is_file() {
                    return Err(MigrateError::ModelNotFound(reference.to_string()));
                }
                self.mirror(reference, &item_location, mapping)?;
                item_location
            }
            None => reference.clone(),
        };

        for model_file in self.walk_parents(&start, mapping)? {
            if let Err(e) = self.relocate_model_textures(&model_file) {
                warn!("Error processing model {}: {}", model_file.display(), e);
                self.context.report.errors += 1;
            }
        }
        Ok(())
    }

    /// Copy a block model into the item folder and remember the move.
    fn mirror(
        &mut self,
        block: &ResourceLocation,
        item: &ResourceLocation,
        mapping: &mut BlockToItemMapping,
    ) -> Result<PathBuf> {
        let dest = self.layout.model_path(item);
        if copy_if_absent(&self.layout.model_path(block), &dest)? {
            self.context.report.models_mirrored += 1;
        }
        mapping.record(block.clone(), item.clone());
        Ok(dest)
    }

    /// Walk the parent chain from `start`, mirroring block parents.
    ///
    /// Returns the model files on the chain that still need texture
    /// processing. Each file is visited at most once per walk. A broken
    /// ancestor ends the walk but keeps the models reached so far.
    fn walk_parents(
        &mut self,
        start: &ResourceLocation,
        mapping: &mut BlockToItemMapping,
    ) -> Result<Vec<PathBuf>> {
        let mut current = self.layout.model_path(start);
        if !current.is_file() {
            return Err(MigrateError::ModelNotFound(start.to_string()));
        }

        let mut visited = HashSet::new();
        let mut queue = Vec::new();

        while visited.insert(current.clone()) {
            let model: ModelDocument = match read_json(&current) {
                Ok(model) => model,
                Err(e) => {
                    warn!("Error reading model {}: {}", current.display(), e);
                    self.context.report.errors += 1;
                    break;
                }
            };
            if !self.context.is_processed(&current) {
                queue.push(current.clone());
            }

            match self.step_to_parent(&current, model, mapping) {
                Ok(Some(parent_file)) => current = parent_file,
                Ok(None) => break,
                Err(e) => {
                    warn!("Error following parent of {}: {}", current.display(), e);
                    self.context.report.errors += 1;
                    break;
                }
            }
        }

        Ok(queue)
    }

    /// Resolve the parent of `model_file`, mirroring a block parent and
    /// pointing the child at the mirrored copy. `None` ends the chain.
    fn step_to_parent(
        &mut self,
        model_file: &Path,
        mut model: ModelDocument,
        mapping: &mut BlockToItemMapping,
    ) -> Result<Option<PathBuf>> {
        let Some(parent) = model.parent_location() else {
            return Ok(None);
        };
        if parent.is_builtin() {
            return Ok(None);
        }
        let parent_file = self.layout.model_path(&parent);
        if !parent_file.is_file() {
            return Ok(None);
        }

        match parent.to_item_folder() {
            Some(item_parent) => {
                let mirrored = self.mirror(&parent, &item_parent, mapping)?;
                model.parent = Some(item_parent.to_string());
                write_json(model_file, &model)?;
                Ok(Some(mirrored))
            }
            None => Ok(Some(parent_file)),
        }
    }

    /// Rewrite block textures of one model to item textures.
    fn relocate_model_textures(&mut self, model_file: &Path) -> Result<()> {
        if self.context.is_processed(model_file) {
            return Ok(());
        }

        let mut model: ModelDocument = read_json(model_file)?;
        let pending: Vec<(String, ResourceLocation, String)> = model
            .texture_paths()
            .filter_map(|(key, location)| {
                let relative = location.block_relative()?.trim_end_matches(".png").to_string();
                Some((key.to_string(), location, relative))
            })
            .collect();

        if pending.is_empty() {
            self.context.mark_processed(model_file);
            return Ok(());
        }

        // A model counts as processed only after it is saved.
        for (key, location, relative) in pending {
            let item_texture = location.with_path(format!("item/{}", relative));
            self.materialize_texture(&location, &relative, &item_texture)?;
            // Rewritten even without a file; the game may supply it.
            model.textures.insert(key, item_texture.to_string());
        }

        write_json(model_file, &model)?;
        self.context.mark_processed(model_file);
        self.context.report.item_models_rewritten += 1;
        Ok(())
    }

    /// Make sure `item_texture` exists on disk, from the pack or the fallback source.
    fn materialize_texture(
        &mut self,
        block_texture: &ResourceLocation,
        relative: &str,
        item_texture: &ResourceLocation,
    ) -> Result<()> {
        let dest = self.layout.texture_path(item_texture);
        if dest.exists() {
            return Ok(());
        }

        let local = self.layout.find_texture(block_texture);
        if let Some(image) = local.as_ref().and_then(|files| files.image.as_ref()) {
            if copy_if_absent(image, &dest)? {
                self.context.report.textures_copied += 1;
            }
            if let Some(animation) = local.as_ref().and_then(|files| files.animation.as_ref()) {
                if copy_if_absent(animation, &sidecar_for(&dest))? {
                    self.context.report.textures_copied += 1;
                }
            }
            return Ok(());
        }

        let key = format!("block/{}", relative);
        match self.textures.fetch(&key) {
            FetchOutcome::Found(data) => {
                if write_if_absent(&dest, &data)? {
                    debug!("Fetched {} from fallback source", key);
                    self.context.report.textures_fetched += 1;
                }
            }
            FetchOutcome::NotFound => debug!("No fallback texture for {}", key),
            FetchOutcome::Failed(reason) => debug!("Fallback fetch failed for {}: {}", key, reason),
        }
        Ok(())
    }
}

/// Distinct model references in `model.fallback` and `model.entries[].model`.
pub fn model_references(document: &Value) -> Vec<ResourceLocation> {
    let model = &document["model"];
    let entries = model["entries"].as_array().map(Vec::as_slice).unwrap_or_default();

    let mut seen = HashSet::new();
    std::iter::once(&model["fallback"])
        .chain(entries.iter().map(|entry| &entry["model"]))
        .filter_map(|node| node["model"].as_str())
        .map(ResourceLocation::parse)
        .filter(|location| seen.insert(location.clone()))
        .collect()
}

/// Rewrite direct model references that were mirrored. Returns whether anything changed.
pub fn apply_mapping(document: &mut Value, mapping: &BlockToItemMapping) -> bool {
    let Some(model) = document.get_mut("model") else {
        return false;
    };

    let mut changed = false;
    if let Some(fallback) = model.get_mut("fallback") {
        changed |= remap_node(fallback, mapping);
    }
    if let Some(entries) = model.get_mut("entries").and_then(Value::as_array_mut) {
        for entry in entries {
            if let Some(node) = entry.get_mut("model") {
                changed |= remap_node(node, mapping);
            }
        }
    }
    changed
}

fn remap_node(node: &mut Value, mapping: &BlockToItemMapping) -> bool {
    let Some(Value::String(reference)) = node.get_mut("model") else {
        return false;
    };
    match mapping.lookup(reference) {
        Some(item) => {
            *reference = item.to_string();
            true
        }
        None => false,
    }
}
