//! Models command - manage face detection weights.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use avatar_qa_adapters::models::{ModelSource, ModelStore, ProgressCallback, BLAZEFACE};
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::AppConfig;

/// Help footer for `models`.
pub const SUPPLY_WEIGHTS_HELP: &str = "No BlazeFace weights are published upstream. Download them \
from a source you trust with `models fetch --url URL --sha256 HEX`, copy blazeface.safetensors \
into the directory printed by `models path`, or pass --face-model PATH to `check`.";

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download the face model from a given URL
    Fetch(FetchArgs),
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Arguments for `models fetch`
#[derive(Args)]
pub struct FetchArgs {
    /// URL of a BlazeFace safetensors checkpoint
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Expected SHA-256 of the download (hex)
    #[arg(long, value_name = "HEX", requires = "url")]
    pub sha256: Option<String>,
}

/// Run the models command.
pub fn run(args: &ModelsArgs, config: &AppConfig) -> Result<()> {
    let dir = args.models_dir.clone().or_else(|| config.models.dir.clone());
    let store = ModelStore::from_override(dir);
    match &args.command {
        ModelsCommand::Fetch(fetch) => fetch_models(&store, fetch),
        ModelsCommand::List => {
            list_models(&store);
            Ok(())
        }
        ModelsCommand::Path => {
            println!("{}", store.dir().display());
            Ok(())
        }
    }
}

fn fetch_models(store: &ModelStore, args: &FetchArgs) -> Result<()> {
    if args.url.is_none() && store.all_installed() {
        println!("All models already installed in {}", store.dir().display());
        return Ok(());
    }

    let pb = Arc::new(ProgressBar::new(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
            .progress_chars("#>-"),
    );

    let current_model: Arc<Mutex<String>> = Arc::new(Mutex::new(String::new()));
    let pb_clone = Arc::clone(&pb);
    let model_clone = Arc::clone(&current_model);

    let progress: ProgressCallback =
        Box::new(move |name: &str, downloaded: u64, total: Option<u64>| {
            let is_new_model = {
                let mut current = model_clone
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                if *current == name {
                    false
                } else {
                    *current = name.to_string();
                    true
                }
            };
            if is_new_model {
                if let Some(t) = total {
                    pb_clone.set_length(t);
                }
                pb_clone.set_message(name.to_string());
            }
            pb_clone.set_position(downloaded);
        });

    match &args.url {
        Some(url) => {
            let source = ModelSource {
                url,
                sha256: args.sha256.as_deref(),
            };
            let path = store.install(BLAZEFACE, &source, Some(&progress))?;
            pb.finish_with_message(format!("Installed {}", path.display()));
        }
        None => {
            store.ensure_models(Some(&progress))?;
            pb.finish_with_message("All models downloaded");
        }
    }
    Ok(())
}

fn list_models(store: &ModelStore) {
    let models = store.list();

    println!("Models directory: {}", store.dir().display());
    println!();

    for (info, installed) in &models {
        let status = if *installed { "✓" } else { "✗" };
        println!("  {status} {} ({})", info.name, info.filename);
    }

    println!();
    let installed_count = models.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} models installed", installed_count, models.len());
}
