//! On-disk layout of an unpacked resource pack.
//!
//! All paths are derived from the pack root:
//! `<root>/assets/<namespace>/{models,textures,items}/...`.

use super::location::{ResourceLocation, DEFAULT_NAMESPACE};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Extension of animation metadata sidecars, appended to the texture file name.
const MCMETA_SUFFIX: &str = ".mcmeta";

/// Path resolver for a resource pack directory.
#[derive(Debug, Clone)]
pub struct PackLayout {
    root: PathBuf,
}

/// Physical files backing a texture reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureFiles {
    /// Path under the namespace's textures directory, without extension.
    pub stem: String,
    /// The image file, if present.
    pub image: Option<PathBuf>,
    /// The `.png.mcmeta` animation sidecar, if present.
    pub animation: Option<PathBuf>,
}

impl TextureFiles {
    /// File extension of the image, defaulting to png.
    pub fn extension(&self) -> &str {
        self.image
            .as_deref()
            .and_then(Path::extension)
            .and_then(|e| e.to_str())
            .unwrap_or("png")
    }
}

impl PackLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets_dir(&self, namespace: &str) -> PathBuf {
        self.root.join("assets").join(namespace)
    }

    pub fn models_dir(&self, namespace: &str) -> PathBuf {
        self.assets_dir(namespace).join("models")
    }

    pub fn textures_dir(&self, namespace: &str) -> PathBuf {
        self.assets_dir(namespace).join("textures")
    }

    /// Legacy item definitions: `assets/minecraft/models/item`.
    pub fn legacy_items_dir(&self) -> PathBuf {
        self.models_dir(DEFAULT_NAMESPACE).join("item")
    }

    /// New-format item definitions: `assets/minecraft/items`.
    pub fn items_dir(&self) -> PathBuf {
        self.assets_dir(DEFAULT_NAMESPACE).join("items")
    }

    /// Block models: `assets/minecraft/models/block`.
    pub fn block_models_dir(&self) -> PathBuf {
        self.models_dir(DEFAULT_NAMESPACE).join("block")
    }

    /// JSON file for a model location.
    pub fn model_path(&self, location: &ResourceLocation) -> PathBuf {
        self.models_dir(location.namespace())
            .join(format!("{}.json", location.path()))
    }

    /// PNG file for a texture location.
    pub fn texture_path(&self, location: &ResourceLocation) -> PathBuf {
        self.textures_dir(location.namespace())
            .join(format!("{}.png", location.path()))
    }

    /// Locate the files behind a texture reference.
    ///
    /// Tries `<path>.png`, then `<path>` as written (the reference already
    /// carries an extension), then a lone `<path>.png.mcmeta` sidecar.
    pub fn find_texture(&self, location: &ResourceLocation) -> Option<TextureFiles> {
        let textures_dir = self.textures_dir(location.namespace());
        let with_png = self.texture_path(location);

        if with_png.is_file() {
            return Some(TextureFiles {
                stem: location.path().to_string(),
                animation: existing(sidecar_for(&with_png)),
                image: Some(with_png),
            });
        }

        let as_written = textures_dir.join(location.path());
        if as_written.is_file() {
            let stem = Path::new(location.path())
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");
            return Some(TextureFiles {
                stem,
                animation: existing(sidecar_for(&as_written)),
                image: Some(as_written),
            });
        }

        let sidecar = sidecar_for(&with_png);
        if sidecar.is_file() {
            return Some(TextureFiles {
                stem: location.path().to_string(),
                image: None,
                animation: Some(sidecar),
            });
        }

        None
    }

    /// New-format item documents directly inside the items directory.
    pub fn item_documents(&self) -> Vec<PathBuf> {
        collect_json(&self.items_dir(), 1)
    }
}

/// Every `.json` file below `dir`, sorted for a stable processing order.
pub fn json_files(dir: &Path) -> Vec<PathBuf> {
    collect_json(dir, usize::MAX)
}

fn collect_json(dir: &Path, max_depth: usize) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// `foo.png` -> `foo.png.mcmeta`.
pub fn sidecar_for(image: &Path) -> PathBuf {
    let mut name = image.as_os_str().to_owned();
    name.push(MCMETA_SUFFIX);
    PathBuf::from(name)
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Read and parse a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write a JSON document with two-space indentation, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Copy `src` to `dst` unless `dst` already exists. Returns whether a copy happened.
pub fn copy_if_absent(src: &Path, dst: &Path) -> Result<bool> {
    if dst.exists() {
        debug!("Keeping existing {}", dst.display());
        return Ok(false);
    }
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)?;
    debug!("Copied {} -> {}", src.display(), dst.display());
    Ok(true)
}

/// Write `data` to `dst` unless `dst` already exists. Returns whether a write happened.
pub fn write_if_absent(dst: &Path, data: &[u8]) -> Result<bool> {
    if dst.exists() {
        return Ok(false);
    }
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dst, data)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_model_path_ignores_namespace_spelling() {
        let layout = PackLayout::new("/pack");
        let bare = layout.model_path(&ResourceLocation::parse("item/foo"));
        let namespaced = layout.model_path(&ResourceLocation::parse("minecraft:item/foo"));
        assert_eq!(bare, namespaced);
        assert_eq!(
            bare,
            PathBuf::from("/pack/assets/minecraft/models/item/foo.json")
        );
    }

    #[test]
    fn test_find_texture_candidates() {
        let dir = TempDir::new().unwrap();
        let layout = PackLayout::new(dir.path());
        let textures = layout.textures_dir("minecraft");

        touch(&textures.join("item/ruby.png"));
        touch(&textures.join("item/ruby.png.mcmeta"));
        touch(&textures.join("misc/glow.png"));
        touch(&textures.join("misc/only_meta.png.mcmeta"));

        let ruby = layout
            .find_texture(&ResourceLocation::parse("item/ruby"))
            .unwrap();
        assert_eq!(ruby.stem, "item/ruby");
        assert!(ruby.image.is_some());
        assert!(ruby.animation.is_some());

        let glow = layout
            .find_texture(&ResourceLocation::parse("misc/glow.png"))
            .unwrap();
        assert_eq!(glow.stem, "misc/glow");
        assert_eq!(glow.extension(), "png");

        let meta = layout
            .find_texture(&ResourceLocation::parse("misc/only_meta"))
            .unwrap();
        assert!(meta.image.is_none());
        assert!(meta.animation.is_some());

        assert!(layout
            .find_texture(&ResourceLocation::parse("item/missing"))
            .is_none());
    }

    #[test]
    fn test_copy_if_absent_keeps_first_writer() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("nested/b.png");
        std::fs::write(&a, b"first").unwrap();

        assert!(copy_if_absent(&a, &b).unwrap());
        std::fs::write(&a, b"second").unwrap();
        assert!(!copy_if_absent(&a, &b).unwrap());
        assert_eq!(std::fs::read(&b).unwrap(), b"first");
    }

    #[test]
    fn test_json_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.json"));
        touch(&dir.path().join("a/c.JSON"));
        touch(&dir.path().join("notes.txt"));

        let files = json_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a/c.JSON"));
        assert!(files[1].ends_with("b.json"));

        assert!(json_files(&dir.path().join("missing")).is_empty());
    }
}
