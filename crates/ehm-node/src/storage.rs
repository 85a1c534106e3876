//! On-disk ensemble store.
//!
//! Each payload image lives in its own file under a fixed four-level
//! layout: `<root>/step_<NNNN>/<state>/<KEY>/real_<NNN>.bin`. The root
//! carries a `manifest.json` naming the schema the layout was written
//! against; opening a store with an incompatible manifest fails before any
//! blob is touched. Scanning walks the tree and returns a deterministic,
//! sorted index of every valid image, skipping foreign files.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Utc;
use ehm_core::{EhmError, ErrorInfo, SchemaVersion, StateTag};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

const MANIFEST_NAME: &str = "manifest.json";

/// Store metadata written once at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Schema the store layout was written against.
    pub schema: SchemaVersion,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
}

impl StoreManifest {
    /// Manifest for a store created now, under the current schema.
    pub fn current() -> StoreManifest {
        StoreManifest {
            schema: SchemaVersion::default(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Serializes the manifest to `path` as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<(), EhmError> {
        let text = serde_json::to_string_pretty(self).map_err(|err| {
            EhmError::Config(ErrorInfo::new("manifest-serialize", err.to_string()))
        })?;
        fs::write(path, text).map_err(|err| {
            EhmError::Config(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads and parses a manifest from `path`.
    pub fn load(path: &Path) -> Result<StoreManifest, EhmError> {
        let text = fs::read_to_string(path).map_err(|err| {
            EhmError::Config(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&text).map_err(|err| {
            EhmError::Config(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Identity of one stored payload image.
///
/// Field order gives the natural sort: key, then step, then state, then
/// realization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoredImage {
    /// Node key the image belongs to.
    pub key: String,
    /// Checkpoint step.
    pub report_step: i32,
    /// State family.
    pub state_tag: StateTag,
    /// Realization index.
    pub iens: usize,
}

/// Blob store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates the store directory and writes a fresh manifest.
    pub fn create(root: &Path) -> Result<FileStore, EhmError> {
        fs::create_dir_all(root).map_err(|err| {
            EhmError::Config(
                ErrorInfo::new("store-create", err.to_string())
                    .with_context("path", root.display().to_string()),
            )
        })?;
        StoreManifest::current().write(&root.join(MANIFEST_NAME))?;
        Ok(FileStore {
            root: root.to_path_buf(),
        })
    }

    /// Opens an existing store, verifying its manifest schema.
    pub fn open(root: &Path) -> Result<FileStore, EhmError> {
        let manifest = StoreManifest::load(&root.join(MANIFEST_NAME))?;
        let supported = SchemaVersion::default();
        if !supported.is_compatible_with(&manifest.schema) {
            return Err(EhmError::Config(
                ErrorInfo::new("store-schema", "store schema is not readable")
                    .with_context("found", manifest.schema.to_string())
                    .with_context("supported", supported.to_string()),
            ));
        }
        Ok(FileStore {
            root: root.to_path_buf(),
        })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a blob for this identity lives at, whether or not it exists.
    pub fn blob_path(
        &self,
        key: &str,
        report_step: i32,
        state_tag: StateTag,
        iens: usize,
    ) -> PathBuf {
        self.root
            .join(format!("step_{report_step:04}"))
            .join(state_tag.name())
            .join(key)
            .join(format!("real_{iens:03}.bin"))
    }

    /// Opens a fresh blob file for writing, creating parent directories.
    pub fn writer(
        &self,
        key: &str,
        report_step: i32,
        state_tag: StateTag,
        iens: usize,
    ) -> Result<File, EhmError> {
        let path = self.blob_path(key, report_step, state_tag, iens);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                EhmError::IoFailure(
                    ErrorInfo::new("store-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        File::create(&path).map_err(|err| {
            EhmError::IoFailure(
                ErrorInfo::new("blob-create", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Opens an existing blob file for reading.
    pub fn reader(
        &self,
        key: &str,
        report_step: i32,
        state_tag: StateTag,
        iens: usize,
    ) -> Result<File, EhmError> {
        let path = self.blob_path(key, report_step, state_tag, iens);
        File::open(&path).map_err(|err| {
            EhmError::IoFailure(
                ErrorInfo::new("blob-open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Removes a blob if it exists; removing a missing blob is not an error.
    pub fn remove(
        &self,
        key: &str,
        report_step: i32,
        state_tag: StateTag,
        iens: usize,
    ) -> Result<(), EhmError> {
        let path = self.blob_path(key, report_step, state_tag, iens);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(EhmError::IoFailure(
                ErrorInfo::new("blob-remove", err.to_string())
                    .with_context("path", path.display().to_string()),
            )),
        }
    }

    /// Walks the store and indexes every valid blob, sorted.
    ///
    /// Files that do not fit the layout, the manifest included, are
    /// skipped rather than reported; a store may carry foreign files.
    pub fn scan(&self) -> Result<Vec<StoredImage>, EhmError> {
        let mut images = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|err| {
                EhmError::IoFailure(
                    ErrorInfo::new("store-scan", err.to_string())
                        .with_context("path", self.root.display().to_string()),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(image) = parse_image(&self.root, entry.path()) {
                images.push(image);
            }
        }
        images.sort();
        Ok(images)
    }
}

fn parse_image(root: &Path, path: &Path) -> Option<StoredImage> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = relative.iter();
    let step_dir = parts.next()?.to_str()?;
    let state_dir = parts.next()?.to_str()?;
    let key = parts.next()?.to_str()?;
    let file = parts.next()?.to_str()?;
    if parts.next().is_some() {
        return None;
    }
    let report_step = step_dir.strip_prefix("step_")?.parse().ok()?;
    let state_tag = StateTag::from_name(state_dir)?;
    let iens = file.strip_prefix("real_")?.strip_suffix(".bin")?.parse().ok()?;
    Some(StoredImage {
        key: key.to_string(),
        report_step,
        state_tag,
        iens,
    })
}
