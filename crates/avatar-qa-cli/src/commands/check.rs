//! Check command - evaluate photos against the acceptance thresholds.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use avatar_qa_adapters::{FsUploadSource, ModelStore, BLAZEFACE};
use avatar_qa_core::{
    BlazeFaceDetector, BlurConfig, BrightnessConfig, DetectorConfig, DisabledFaceDetector,
    FaceConfig, FaceDetector, PipelineConfig, Preset, ProgressEvent, ProgressSink,
    QualityPipeline, QualityReport, ResultOutput, Thresholds, UploadSource,
};
use clap::{Args, ValueEnum};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse()
}

/// Parse a value on the 0-100 brightness scale.
fn parse_percent(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=100"))
    }
}

fn parse_non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be >= 0"))
    }
}

fn parse_angle(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 && value <= 180.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not in (0, 180]"))
    }
}

fn parse_kernel_size(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid kernel size"))?;
    if value == 1 || (value % 2 == 1 && (3..=31).contains(&value)) {
        Ok(value)
    } else {
        Err(format!("{value} must be 1 or an odd number in 3..=31"))
    }
}

/// Shared arguments for photo evaluation.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Files or directories to evaluate
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Threshold preset: default, lenient or strict
    #[arg(long, value_parser = parse_preset)]
    pub preset: Option<Preset>,

    /// Minimum blur score (Laplacian variance)
    #[arg(long, value_parser = parse_non_negative)]
    pub blur_min: Option<f64>,

    /// Lowest acceptable brightness (0-100)
    #[arg(long, value_parser = parse_percent)]
    pub brightness_low: Option<f64>,

    /// Highest acceptable brightness (0-100)
    #[arg(long, value_parser = parse_percent)]
    pub brightness_high: Option<f64>,

    /// Minimum short side in pixels
    #[arg(long)]
    pub resolution_min: Option<u32>,

    /// Maximum eye-line tilt in degrees
    #[arg(long, value_parser = parse_angle)]
    pub face_angle_max: Option<f64>,

    /// Laplacian aperture (1, or odd 3-31)
    #[arg(long, value_parser = parse_kernel_size)]
    pub kernel_size: Option<u32>,

    /// Skip face detection; every photo reports no face
    #[arg(long)]
    pub no_faces: bool,

    /// Path to BlazeFace weights (overrides the models directory)
    #[arg(long, value_name = "PATH")]
    pub face_model: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Preset defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Thresholds: CLI > config (accessor falls back to the preset)
        let t = &config.thresholds;
        args.preset = args.preset.or(t.preset);
        args.blur_min = args.blur_min.or(t.blur_min);
        args.brightness_low = args.brightness_low.or(t.brightness_low);
        args.brightness_high = args.brightness_high.or(t.brightness_high);
        args.resolution_min = args.resolution_min.or(t.resolution_min);
        args.face_angle_max = args.face_angle_max.or(t.face_angle_max);

        args.kernel_size = args.kernel_size.or(config.blur.kernel_size);

        // CLI --no-faces always wins; config can only disable
        if !args.no_faces {
            if let Some(enabled) = config.faces.enabled {
                args.no_faces = !enabled;
            }
        }
        if args.face_model.is_none() {
            args.face_model.clone_from(&config.faces.model);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        if args.models_dir.is_none() {
            args.models_dir.clone_from(&config.models.dir);
        }

        // Store config for the estimator and detector settings
        args.config = Some(config.clone());

        args
    }

    /// Resolve thresholds: preset first, then individual overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined values are inconsistent, such as a
    /// brightness window whose low end exceeds its high end.
    pub fn thresholds(&self) -> Result<Thresholds> {
        let mut thresholds = Thresholds::preset(self.preset.unwrap_or_default());
        if let Some(v) = self.blur_min {
            thresholds.blur_min = v;
        }
        if let Some(v) = self.brightness_low {
            thresholds.brightness_low = v;
        }
        if let Some(v) = self.brightness_high {
            thresholds.brightness_high = v;
        }
        if let Some(v) = self.resolution_min {
            thresholds.resolution_min = v;
        }
        if let Some(v) = self.face_angle_max {
            thresholds.face_angle_max = v;
        }
        thresholds
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid thresholds: {e}"))?;
        Ok(thresholds)
    }

    /// Estimator settings from the merged config.
    fn pipeline_config(&self) -> PipelineConfig {
        let config = self.config.as_ref();
        let blur_defaults = BlurConfig::default();
        let brightness_defaults = BrightnessConfig::default();
        let face_defaults = FaceConfig::default();

        PipelineConfig {
            blur: BlurConfig {
                kernel_size: self.kernel_size.unwrap_or(blur_defaults.kernel_size),
            },
            brightness: BrightnessConfig {
                center_weight: config
                    .and_then(|c| c.brightness.center_weight)
                    .unwrap_or(brightness_defaults.center_weight),
                decay_fraction: config
                    .and_then(|c| c.brightness.decay_fraction)
                    .unwrap_or(brightness_defaults.decay_fraction),
            },
            faces: FaceConfig {
                min_face_fraction: config
                    .and_then(|c| c.faces.min_face_fraction)
                    .unwrap_or(face_defaults.min_face_fraction),
                max_face_fraction: config
                    .and_then(|c| c.faces.max_face_fraction)
                    .unwrap_or(face_defaults.max_face_fraction),
            },
        }
    }

    fn detector_config(&self) -> DetectorConfig {
        let config = self.config.as_ref().map(|c| &c.faces);
        let defaults = DetectorConfig::default();
        DetectorConfig {
            min_confidence: config
                .and_then(|c| c.min_confidence)
                .unwrap_or(defaults.min_confidence),
            nms_threshold: config
                .and_then(|c| c.nms_threshold)
                .unwrap_or(defaults.nms_threshold),
            scale_step: config
                .and_then(|c| c.scale_step)
                .unwrap_or(defaults.scale_step),
            max_scales: config
                .and_then(|c| c.max_scales)
                .unwrap_or(defaults.max_scales),
        }
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }
}

/// Result of running the check command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct CheckResult {
    /// Number of photos evaluated.
    pub processed: usize,
    /// Number of uploads skipped.
    pub skipped: usize,
    /// Number of photos rejected.
    pub rejected: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<CheckResult> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        bail!("No paths specified");
    }

    let thresholds = args.thresholds()?;
    debug!(?thresholds, "Resolved thresholds");

    let detector = build_detector(args)?;
    let pipeline = QualityPipeline::with_thresholds(detector, args.pipeline_config(), thresholds);

    let source = FsUploadSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    // Determine if we should show progress
    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    process_uploads(&source, &pipeline, &output, &progress_bar, args)
}

/// Load BlazeFace, or a detector that never finds a face with `--no-faces`.
fn build_detector(args: &CheckArgs) -> Result<Arc<dyn FaceDetector>> {
    if args.no_faces {
        info!("Face detection disabled");
        return Ok(Arc::new(DisabledFaceDetector));
    }

    let path = match &args.face_model {
        Some(path) => path.clone(),
        None => {
            let store = ModelStore::from_override(args.models_dir.clone());
            store
                .model_path(BLAZEFACE)
                .context("BlazeFace is not a registered model")?
        }
    };

    if !path.exists() {
        bail!(
            "Face model not found at {}. Run `avatar-qa models fetch --url URL`, \
             pass --face-model PATH, or pass --no-faces.",
            path.display()
        );
    }

    let detector = BlazeFaceDetector::load(&path, args.detector_config())?;
    Ok(Arc::new(detector))
}

/// Evaluate every upload and write its report.
fn process_uploads(
    source: &dyn UploadSource,
    pipeline: &QualityPipeline,
    output: &JsonOutput,
    progress: &ProgressBar,
    args: &CheckArgs,
) -> Result<CheckResult> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut rejected = 0usize;
    let mut all_reports: Vec<QualityReport> = Vec::new();

    for (index, upload_result) in source.uploads().enumerate() {
        let upload = match upload_result {
            Ok(upload) => upload,
            Err(e) => {
                // The error message carries the path via anyhow context
                progress.on_event(ProgressEvent::Skipped {
                    name: format!("upload {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            name: upload.name.clone(),
            index,
            total,
        });

        let evaluation = match pipeline.evaluate_upload(&upload, None) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                if !e.is_decode() {
                    warn!("Evaluation of {} failed: {e}", upload.name);
                }
                progress.on_event(ProgressEvent::Skipped {
                    name: upload.name,
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };

        let report = evaluation.into_report(upload.name, iso_timestamp());
        if !report.is_acceptable {
            rejected += 1;
        }

        progress.on_event(ProgressEvent::Completed {
            report: report.clone(),
        });

        match args.format() {
            OutputFormat::Jsonl => output.write(&report)?,
            OutputFormat::Json => all_reports.push(report),
        }

        processed += 1;
    }

    if args.format() == OutputFormat::Json {
        output.write_array(&all_reports, args.pretty)?;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if rejected > 0 {
        ExitCode::Rejected
    } else {
        ExitCode::Success
    };

    Ok(CheckResult {
        processed,
        skipped,
        rejected,
        exit_code,
    })
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
