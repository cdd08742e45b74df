//! Configuration file support for avatar-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/avatar-qa/config.toml` (lowest priority)
//! - Project-local: `.avatar-qa.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use avatar_qa_core::Preset;
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Acceptance thresholds.
    pub thresholds: ThresholdsConfig,
    /// Blur estimator settings.
    pub blur: BlurConfig,
    /// Brightness estimator settings.
    pub brightness: BrightnessConfig,
    /// Face detection settings.
    pub faces: FacesConfig,
    /// Model settings.
    pub models: ModelsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Threshold preset and per-value overrides.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    /// Named preset the overrides apply on top of.
    pub preset: Option<Preset>,
    /// Minimum Laplacian variance.
    pub blur_min: Option<f64>,
    /// Lowest acceptable brightness (0-100).
    pub brightness_low: Option<f64>,
    /// Highest acceptable brightness (0-100).
    pub brightness_high: Option<f64>,
    /// Minimum short side in pixels.
    pub resolution_min: Option<u32>,
    /// Maximum eye-line tilt in degrees.
    pub face_angle_max: Option<f64>,
}

/// Blur estimator configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Laplacian aperture (1, or odd 3-31).
    pub kernel_size: Option<u32>,
}

/// Brightness estimator configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BrightnessConfig {
    /// Center pixel weight relative to the background.
    pub center_weight: Option<f64>,
    /// Weight decay radius as a fraction of the short side.
    pub decay_fraction: Option<f64>,
}

/// Face detection configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FacesConfig {
    /// Enable/disable face detection. Disabled means every image has no face.
    pub enabled: Option<bool>,
    /// Explicit path to `BlazeFace` weights.
    pub model: Option<PathBuf>,
    /// Minimum detection confidence (0.0-1.0).
    pub min_confidence: Option<f32>,
    /// Non-maximum suppression IOU threshold (0.0-1.0).
    pub nms_threshold: Option<f32>,
    /// Zoom factor between detection passes.
    pub scale_step: Option<f32>,
    /// Maximum number of detection passes.
    pub max_scales: Option<usize>,
    /// Smallest face side as a fraction of the image's short side.
    pub min_face_fraction: Option<f32>,
    /// Largest face side as a fraction of the image's short side.
    pub max_face_fraction: Option<f32>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/avatar-qa/config.toml`
    /// 2. Project-local: `.avatar-qa.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are reported as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        let t = &self.thresholds;
        if let Some(v) = t.blur_min {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("thresholds.blur_min must be >= 0, got {v}"));
            }
        }
        for (name, value) in [
            ("thresholds.brightness_low", t.brightness_low),
            ("thresholds.brightness_high", t.brightness_high),
        ] {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    return Err(format!("{name} must be 0-100, got {v}"));
                }
            }
        }
        if let (Some(low), Some(high)) = (t.brightness_low, t.brightness_high) {
            if low > high {
                return Err(format!(
                    "thresholds.brightness_low ({low}) must not exceed thresholds.brightness_high ({high})"
                ));
            }
        }
        if let Some(v) = t.face_angle_max {
            if !(v > 0.0 && v <= 180.0) {
                return Err(format!("thresholds.face_angle_max must be in (0, 180], got {v}"));
            }
        }

        if let Some(k) = self.blur.kernel_size {
            if k != 1 && (k % 2 == 0 || !(3..=31).contains(&k)) {
                return Err(format!(
                    "blur.kernel_size must be 1 or an odd number 3-31, got {k}"
                ));
            }
        }

        if let Some(w) = self.brightness.center_weight {
            if !(w.is_finite() && w > 0.0) {
                return Err(format!("brightness.center_weight must be > 0, got {w}"));
            }
        }
        if let Some(d) = self.brightness.decay_fraction {
            if !(d.is_finite() && d > 0.0) {
                return Err(format!("brightness.decay_fraction must be > 0, got {d}"));
            }
        }

        for (name, value) in [
            ("faces.min_confidence", self.faces.min_confidence),
            ("faces.nms_threshold", self.faces.nms_threshold),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(format!("{name} must be 0.0-1.0, got {v}"));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.faces.min_face_fraction, self.faces.max_face_fraction)
        {
            if min > max {
                return Err(format!(
                    "faces.min_face_fraction ({min}) must not exceed faces.max_face_fraction ({max})"
                ));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Thresholds
        let (t, o) = (&mut self.thresholds, other.thresholds);
        t.preset = o.preset.or(t.preset);
        t.blur_min = o.blur_min.or(t.blur_min);
        t.brightness_low = o.brightness_low.or(t.brightness_low);
        t.brightness_high = o.brightness_high.or(t.brightness_high);
        t.resolution_min = o.resolution_min.or(t.resolution_min);
        t.face_angle_max = o.face_angle_max.or(t.face_angle_max);

        // Estimators
        self.blur.kernel_size = other.blur.kernel_size.or(self.blur.kernel_size);
        self.brightness.center_weight = other
            .brightness
            .center_weight
            .or(self.brightness.center_weight);
        self.brightness.decay_fraction = other
            .brightness
            .decay_fraction
            .or(self.brightness.decay_fraction);

        // Faces
        let (f, o) = (&mut self.faces, other.faces);
        f.enabled = o.enabled.or(f.enabled);
        f.model = o.model.or_else(|| f.model.take());
        f.min_confidence = o.min_confidence.or(f.min_confidence);
        f.nms_threshold = o.nms_threshold.or(f.nms_threshold);
        f.scale_step = o.scale_step.or(f.scale_step);
        f.max_scales = o.max_scales.or(f.max_scales);
        f.min_face_fraction = o.min_face_fraction.or(f.min_face_fraction);
        f.max_face_fraction = o.max_face_fraction.or(f.max_face_fraction);

        // Models
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("avatar-qa").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.avatar-qa.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".avatar-qa.toml"))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
