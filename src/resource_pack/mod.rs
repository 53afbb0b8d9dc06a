//! Resource pack paths, references and model documents.
//!
//! This module knows where things live inside an unpacked resource pack
//! and how references like `minecraft:block/stone` map onto files.

pub mod layout;
pub mod location;
pub mod model;

pub use layout::{PackLayout, TextureFiles};
pub use location::ResourceLocation;
pub use model::ModelDocument;
