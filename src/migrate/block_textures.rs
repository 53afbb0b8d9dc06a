//! Move textures used by block models into textures/block.
//!
//! Block models often borrow item textures (`item/ruby`) or custom folders.
//! Each such texture is copied under `textures/block/` and the model entry
//! is rewritten to `<ns>:block/<path>`. Existing files are never replaced,
//! so running the pass twice changes nothing.

use super::context::MigrationContext;
use crate::error::Result;
use crate::resource_pack::layout::{copy_if_absent, read_json, sidecar_for, write_json};
use crate::resource_pack::{ModelDocument, PackLayout, ResourceLocation};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to one block model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockTextureOutcome {
    /// Texture entries rewritten.
    pub rewritten: usize,
    /// Files copied into textures/block.
    pub copied: usize,
}

impl BlockTextureOutcome {
    pub fn is_modified(&self) -> bool {
        self.rewritten > 0
    }
}

/// Relocate textures for each model file, logging and skipping failures.
pub fn relocate_block_textures(
    layout: &PackLayout,
    model_files: &[PathBuf],
    context: &mut MigrationContext,
) {
    for path in model_files {
        match relocate_in_model(layout, path) {
            Ok(outcome) => {
                context.report.textures_copied += outcome.copied;
                if outcome.is_modified() {
                    debug!("Relocated {} textures in {}", outcome.rewritten, path.display());
                    context.report.block_models_modified += 1;
                }
            }
            Err(e) => {
                warn!("Error processing block model {}: {}", path.display(), e);
                context.report.errors += 1;
            }
        }
    }
}

/// Relocate the textures of a single block model, saving it if changed.
pub fn relocate_in_model(layout: &PackLayout, path: &Path) -> Result<BlockTextureOutcome> {
    let mut model: ModelDocument = read_json(path)?;
    let mut outcome = BlockTextureOutcome::default();

    let pending: Vec<(String, ResourceLocation)> = model
        .texture_paths()
        .filter(|(_, location)| !location.is_block())
        .map(|(key, location)| (key.to_string(), location))
        .collect();

    for (key, location) in pending {
        let relative = match layout.find_texture(&location) {
            Some(files) => {
                let relative = strip_item_segment(&files.stem).to_string();
                let block_dir = layout.textures_dir(location.namespace()).join("block");
                let image_dest = block_dir.join(format!("{}.{}", relative, files.extension()));

                if let Some(image) = &files.image {
                    if copy_if_absent(image, &image_dest)? {
                        outcome.copied += 1;
                    }
                }
                if let Some(animation) = &files.animation {
                    if copy_if_absent(animation, &sidecar_for(&image_dest))? {
                        outcome.copied += 1;
                    }
                }
                relative
            }
            // Supplied by another pack layer or the game itself.
            None => strip_item_segment(location.path().trim_end_matches(".png")).to_string(),
        };

        let rewritten = location.with_path(format!("block/{}", relative));
        model.textures.insert(key, rewritten.to_string());
        outcome.rewritten += 1;
    }

    if outcome.is_modified() {
        write_json(path, &model)?;
    }
    Ok(outcome)
}

fn strip_item_segment(path: &str) -> &str {
    path.strip_prefix("item/").unwrap_or(path)
}
