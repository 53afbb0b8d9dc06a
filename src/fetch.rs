//! Fallback textures from the vanilla client archive.
//!
//! When a model points at a vanilla block texture that the pack does not
//! ship, the texture is pulled out of the game's client jar instead. The jar
//! is either supplied locally or downloaded once per version and cached.

use crate::error::{MigrateError, Result};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Game version whose client jar backs missing textures.
pub const DEFAULT_CLIENT_VERSION: &str = "1.21.4";

/// Mojang's launcher manifest listing every released version.
const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Default timeout for HTTP requests.
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Directory name used under the user cache directory.
const CACHE_DIR_NAME: &str = "item-model-migrator";

/// Result of asking a source for a texture.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// PNG bytes for the texture.
    Found(Vec<u8>),
    /// The source has no such texture.
    NotFound,
    /// The source could not be consulted.
    Failed(String),
}

/// Provider of stock textures, keyed by path under textures/ without extension
/// (e.g. `block/stone`).
///
/// Fetching must be safe to repeat and must never abort a migration run.
pub trait TextureSource {
    fn fetch(&self, texture_path: &str) -> FetchOutcome;
}

/// A source that never has anything, for offline runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextureSource;

impl TextureSource for NoTextureSource {
    fn fetch(&self, _texture_path: &str) -> FetchOutcome {
        FetchOutcome::NotFound
    }
}

/// In-memory textures keyed by texture path.
impl TextureSource for HashMap<String, Vec<u8>> {
    fn fetch(&self, texture_path: &str) -> FetchOutcome {
        match self.get(texture_path) {
            Some(data) => FetchOutcome::Found(data.clone()),
            None => FetchOutcome::NotFound,
        }
    }
}

/// Where the client jar comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum JarOrigin {
    /// A jar already on disk.
    Local(PathBuf),
    /// Download the given version into `cache_dir/<version>/client.jar`.
    Download { version: String, cache_dir: PathBuf },
}

enum ArchiveState {
    Unopened,
    Open(ZipArchive<File>),
    Unavailable(String),
}

/// Textures read from a vanilla client jar, opened lazily on first fetch.
pub struct ClientJarSource {
    origin: JarOrigin,
    archive: RefCell<ArchiveState>,
}

impl ClientJarSource {
    pub fn new(origin: JarOrigin) -> Self {
        Self {
            origin,
            archive: RefCell::new(ArchiveState::Unopened),
        }
    }

    /// Use a jar that is already on disk.
    pub fn local<P: AsRef<Path>>(path: P) -> Self {
        Self::new(JarOrigin::Local(path.as_ref().to_path_buf()))
    }

    /// Download (or reuse the cached copy of) the jar for `version`.
    pub fn download(version: &str, cache_dir: Option<PathBuf>) -> Self {
        Self::new(JarOrigin::Download {
            version: version.to_string(),
            cache_dir: cache_dir.unwrap_or_else(default_cache_dir),
        })
    }

    pub fn origin(&self) -> &JarOrigin {
        &self.origin
    }

    /// Path of the jar on disk, fetching it first if needed.
    fn ensure_jar(&self) -> Result<PathBuf> {
        match &self.origin {
            JarOrigin::Local(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(MigrateError::Fetch(format!(
                        "Client jar not found: {}",
                        path.display()
                    )))
                }
            }
            JarOrigin::Download { version, cache_dir } => {
                let jar = cache_dir.join(version).join("client.jar");
                if !jar.is_file() {
                    download_client_jar(version, &jar)?;
                }
                Ok(jar)
            }
        }
    }

    fn open(&self) -> Result<ZipArchive<File>> {
        let jar = self.ensure_jar()?;
        debug!("Opening client jar {}", jar.display());
        Ok(ZipArchive::new(File::open(&jar)?)?)
    }

    fn read_entry(archive: &mut ZipArchive<File>, texture_path: &str) -> FetchOutcome {
        let name = format!("assets/minecraft/textures/{}.png", texture_path);
        let mut entry = match archive.by_name(&name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return FetchOutcome::NotFound,
            Err(e) => return FetchOutcome::Failed(e.to_string()),
        };

        let mut data = Vec::new();
        if let Err(e) = entry.read_to_end(&mut data) {
            return FetchOutcome::Failed(e.to_string());
        }

        match image::guess_format(&data) {
            Ok(image::ImageFormat::Png) => FetchOutcome::Found(data),
            _ => FetchOutcome::Failed(format!("{} is not a PNG", name)),
        }
    }
}

impl TextureSource for ClientJarSource {
    fn fetch(&self, texture_path: &str) -> FetchOutcome {
        let mut state = self.archive.borrow_mut();

        if matches!(*state, ArchiveState::Unopened) {
            *state = match self.open() {
                Ok(archive) => ArchiveState::Open(archive),
                Err(e) => {
                    warn!("Fallback textures unavailable: {}", e);
                    ArchiveState::Unavailable(e.to_string())
                }
            };
        }

        match &mut *state {
            ArchiveState::Open(archive) => Self::read_entry(archive, texture_path),
            ArchiveState::Unavailable(reason) => FetchOutcome::Failed(reason.clone()),
            ArchiveState::Unopened => FetchOutcome::NotFound,
        }
    }
}

/// `<user cache>/item-model-migrator`, or the temp dir if there is none.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
}

#[derive(Debug, Deserialize)]
struct VersionManifest {
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct VersionDetails {
    downloads: VersionDownloads,
}

#[derive(Debug, Deserialize)]
struct VersionDownloads {
    client: DownloadArtifact,
}

#[derive(Debug, Deserialize)]
struct DownloadArtifact {
    url: String,
}

/// Resolve the client jar URL for `version` and download it to `dest`.
///
/// The file is written next to `dest` first and renamed into place, so an
/// interrupted download never leaves a truncated jar in the cache.
fn download_client_jar(version: &str, dest: &Path) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()?;

    info!("Resolving client jar for Minecraft {}", version);
    let manifest: VersionManifest = client
        .get(VERSION_MANIFEST_URL)
        .send()?
        .error_for_status()?
        .json()?;

    let entry = manifest
        .versions
        .iter()
        .find(|v| v.id == version)
        .ok_or_else(|| MigrateError::Fetch(format!("Unknown game version: {}", version)))?;

    let details: VersionDetails = client.get(&entry.url).send()?.error_for_status()?.json()?;

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let partial = dest.with_extension("jar.part");

    info!("Downloading {}", details.downloads.client.url);
    let mut response = client
        .get(&details.downloads.client.url)
        .send()?
        .error_for_status()?;
    let mut file = File::create(&partial)?;
    let bytes = std::io::copy(&mut response, &mut file)?;
    drop(file);

    std::fs::rename(&partial, dest)?;
    info!("Cached client jar ({} bytes) at {}", bytes, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn write_jar(path: &Path) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        writer
            .start_file("assets/minecraft/textures/block/stone.png", options)
            .unwrap();
        writer.write_all(PNG_MAGIC).unwrap();
        writer
            .start_file("assets/minecraft/textures/block/bogus.png", options)
            .unwrap();
        writer.write_all(b"not an image").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_local_jar_lookup() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("client.jar");
        write_jar(&jar);

        let source = ClientJarSource::local(&jar);
        assert_eq!(source.fetch("block/stone"), FetchOutcome::Found(PNG_MAGIC.to_vec()));
        // Repeated lookups reuse the open archive.
        assert_eq!(source.fetch("block/stone"), FetchOutcome::Found(PNG_MAGIC.to_vec()));
        assert_eq!(source.fetch("block/missing"), FetchOutcome::NotFound);
        assert!(matches!(source.fetch("block/bogus"), FetchOutcome::Failed(_)));
    }

    #[test]
    fn test_missing_jar_fails_softly() {
        let dir = TempDir::new().unwrap();
        let source = ClientJarSource::local(dir.path().join("absent.jar"));
        assert!(matches!(source.fetch("block/stone"), FetchOutcome::Failed(_)));
        assert!(matches!(source.fetch("block/dirt"), FetchOutcome::Failed(_)));
    }

    #[test]
    fn test_cached_jar_is_reused() {
        let dir = TempDir::new().unwrap();
        let cached = dir.path().join("1.21.4/client.jar");
        std::fs::create_dir_all(cached.parent().unwrap()).unwrap();
        write_jar(&cached);

        let source = ClientJarSource::download("1.21.4", Some(dir.path().to_path_buf()));
        assert_eq!(source.fetch("block/stone"), FetchOutcome::Found(PNG_MAGIC.to_vec()));
    }

    #[test]
    fn test_map_and_empty_sources() {
        let mut map = HashMap::new();
        map.insert("block/stone".to_string(), vec![1, 2, 3]);
        assert_eq!(map.fetch("block/stone"), FetchOutcome::Found(vec![1, 2, 3]));
        assert_eq!(map.fetch("block/dirt"), FetchOutcome::NotFound);
        assert_eq!(NoTextureSource.fetch("block/stone"), FetchOutcome::NotFound);
    }
}
