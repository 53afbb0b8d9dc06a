//! # Item Model Migrator
//!
//! Upgrades Minecraft resource packs from legacy item-model overrides to the
//! declarative item model format.
//!
//! ## Overview
//!
//! A legacy item model in `models/item/*.json` selects alternate models with
//! an `overrides` list keyed on `custom_model_data`, `damage`, or bow and
//! crossbow pulling state. The newer format lives in `items/*.json` and
//! describes the same choice as a `range_dispatch` tree.
//!
//! Besides converting documents, a run moves assets to the folders the newer
//! format expects: textures used by block models go to `textures/block`, and
//! block models used by items are mirrored into `models/item` with their
//! textures copied to `textures/item`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use item_model_migrator::{Migrator, MigrationConfig};
//!
//! let report = Migrator::with_config("path/to/pack", MigrationConfig::default().offline())
//!     .run()?;
//! println!("{} items converted", report.items_converted);
//! ```
//!
//! ## Converting a single definition
//!
//! ```ignore
//! use item_model_migrator::{convert_definition, LegacyItemDefinition};
//!
//! let legacy: LegacyItemDefinition = serde_json::from_str(&contents)?;
//! let item = convert_definition(&legacy)?;
//! let json = serde_json::to_string_pretty(&item)?;
//! ```

pub mod error;
pub mod resource_pack;
pub mod legacy;
pub mod item_model;
pub mod convert;
pub mod fetch;
pub mod migrate;

// Re-export main types for convenience
pub use error::{MigrateError, Result};
pub use resource_pack::{ModelDocument, PackLayout, ResourceLocation};
pub use legacy::{ItemArchetype, LegacyItemDefinition, Override, OverrideGroup};
pub use item_model::{DispatchEntry, ItemDefinition, ItemModel, Threshold};
pub use convert::convert_definition;
pub use fetch::{ClientJarSource, FetchOutcome, NoTextureSource, TextureSource};
pub use migrate::{MigrationConfig, MigrationReport, Migrator};

/// Migrate a resource pack directory in place with default settings.
pub fn migrate_pack<P: AsRef<std::path::Path>>(path: P) -> Result<MigrationReport> {
    Migrator::new(path).run()
}
