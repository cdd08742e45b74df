//! Model downloading and caching adapter.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Download chunk size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Where to download a model from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSource<'a> {
    /// Download URL.
    pub url: &'a str,
    /// Expected lowercase hex SHA-256; `None` skips verification.
    pub sha256: Option<&'a str>,
}

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Filename in models directory.
    pub filename: &'static str,
    /// Built-in download source, if one is published.
    pub source: Option<ModelSource<'static>>,
}

/// Name of the face detection model.
pub const BLAZEFACE: &str = "blazeface";

/// Known models.
///
/// BlazeFace weights in safetensors form have no published release, so they
/// are fetched from a user-supplied source or installed by hand.
pub const MODELS: &[ModelInfo] = &[ModelInfo {
    name: BLAZEFACE,
    filename: "blazeface.safetensors",
    source: None,
}];

/// Download progress callback: model name, bytes so far, total bytes if known.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

/// Looks up a known model by name.
#[must_use]
pub fn model_info(name: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.name == name)
}

/// Directory holding downloaded model weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStore {
    dir: PathBuf,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(default_models_dir())
    }
}

impl ModelStore {
    /// Uses `dir` as the models directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `dir` if given, otherwise the default location.
    #[must_use]
    pub fn from_override(dir: Option<PathBuf>) -> Self {
        dir.map_or_else(Self::default, Self::new)
    }

    /// The models directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to a specific model file.
    #[must_use]
    pub fn model_path(&self, name: &str) -> Option<PathBuf> {
        model_info(name).map(|m| self.dir.join(m.filename))
    }

    /// Lists known models with their installed status.
    #[must_use]
    pub fn list(&self) -> Vec<(&'static ModelInfo, bool)> {
        MODELS
            .iter()
            .map(|m| (m, self.dir.join(m.filename).exists()))
            .collect()
    }

    /// Returns true if every known model is present.
    #[must_use]
    pub fn all_installed(&self) -> bool {
        self.list().iter().all(|(_, installed)| *installed)
    }

    /// Downloads every missing model that has a built-in source.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, a download fails,
    /// a checksum does not match, or a missing model has no built-in source.
    pub fn ensure_models(&self, progress: Option<&ProgressCallback>) -> Result<()> {
        for model in MODELS {
            let path = self.dir.join(model.filename);
            if path.exists() {
                debug!("Model {} already exists", model.name);
                continue;
            }
            let Some(source) = model.source else {
                bail!(
                    "No download source is published for {name}. Use `models fetch --url <URL>`, \
                     copy {file} into {dir}, or pass --face-model PATH to `check`.",
                    name = model.name,
                    file = model.filename,
                    dir = self.dir.display()
                );
            };
            self.install(model.name, &source, progress)?;
        }

        Ok(())
    }

    /// Downloads a known model from `source`, replacing any installed copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unknown, the download fails, or the
    /// checksum does not match.
    pub fn install(
        &self,
        name: &str,
        source: &ModelSource<'_>,
        progress: Option<&ProgressCallback>,
    ) -> Result<PathBuf> {
        let model = model_info(name).with_context(|| format!("Unknown model: {name}"))?;
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create models directory {}", self.dir.display())
        })?;
        let path = self.dir.join(model.filename);
        download_model(model.name, source, &path, progress)?;
        Ok(path)
    }
}

/// `XDG_DATA_HOME/avatar-qa/models` or `~/.local/share/avatar-qa/models`.
#[must_use]
pub fn default_models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("avatar-qa")
        .join("models")
}

/// Downloads a model, verifying its checksum before it lands on disk.
fn download_model(
    name: &str,
    source: &ModelSource<'_>,
    path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    info!("Downloading model {name} from {}", source.url);

    let mut response = reqwest::blocking::get(source.url)
        .with_context(|| format!("Failed to download {name}"))?;

    if !response.status().is_success() {
        bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    let mut bytes = Vec::with_capacity(total.and_then(|t| usize::try_from(t).ok()).unwrap_or(0));
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = response
            .read(&mut chunk)
            .with_context(|| format!("Failed to read response for {name}"))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        if let Some(cb) = progress {
            cb(name, bytes.len() as u64, total);
        }
    }

    verify_checksum(name, source.sha256, &bytes, path)?;

    // Write to a sibling temp file first so an interrupted write never leaves
    // a truncated model behind.
    let partial = path.with_extension("partial");
    fs::write(&partial, &bytes).with_context(|| format!("Failed to write {name}"))?;
    fs::rename(&partial, path).with_context(|| format!("Failed to install {name}"))?;

    info!("Downloaded {name} ({} bytes)", bytes.len());
    Ok(())
}

fn verify_checksum(name: &str, expected: Option<&str>, bytes: &[u8], path: &Path) -> Result<()> {
    let Some(expected) = expected else {
        warn!("No checksum given for {name}; skipping verification");
        return Ok(());
    };

    let hash = format!("{:x}", Sha256::digest(bytes));
    if !hash.eq_ignore_ascii_case(expected) {
        bail!(
            "Checksum mismatch for {name}: expected {expected}, got {hash}. \
             {} was left untouched.",
            path.display()
        );
    }
    Ok(())
}
