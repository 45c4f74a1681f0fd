//! AnimalAI - big-cat species classification and detection CLI tool.
//!
//! This crate classifies images of tigers, lions, leopards and cheetahs, or
//! draws detection boxes on them, using ONNX exports of the trained models.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod inference;
pub mod intake;
pub mod knowledge;
pub mod output;
pub mod pipeline;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command, ConfigAction, ModelsAction, Page};
use config::{Config, load_config, resolve_config_path, save_config_to, validate_config};
use dispatch::Mode;
use inference::ModelRegistry;
use knowledge::SpeciesKnowledgeBase;
use output::json_envelope::{
    ConfigPayload, ErrorPayload, ErrorSeverity, EventType, JsonEnvelope, ModelCheckPayload,
    ModelStatus, PagePayload, ResultType, SpeciesPayload,
};
use output::{OutputMode, fatal_payload, reporter_for};
use pipeline::{ProcessOptions, collect_input_files, run_batch};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

pub use error::{Error, Result};

/// Main entry point for animalai CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    let config = load_config(cli.analyze.config.as_deref())?;
    validate_config(&config)?;

    if let Some(command) = cli.command {
        return handle_command(command, &cli.analyze, &config);
    }

    let default_mode = cli.analyze.mode.unwrap_or(config.defaults.mode);
    if cli.inputs.is_empty() {
        match cli.analyze.output_mode {
            OutputMode::Human => cli::help::print_upload_prompt(default_mode),
            OutputMode::Json => print_json(
                EventType::Error,
                ErrorPayload {
                    code: "no_input".to_string(),
                    severity: ErrorSeverity::Warning,
                    message: "no image provided".to_string(),
                    file: None,
                    suggestion: Some("pass one or more JPEG or PNG files".to_string()),
                },
            )?,
        }
        return Ok(());
    }

    analyze_images(&cli.inputs, &cli.analyze, config)
}

/// Analyze input images with the given options.
fn analyze_images(inputs: &[PathBuf], args: &AnalyzeArgs, mut config: Config) -> Result<()> {
    if let Some(confidence) = args.confidence {
        config.detection.confidence = confidence;
    }
    if let Some(low_confidence) = args.low_confidence {
        config.classification.low_confidence = low_confidence;
    }

    let files = collect_input_files(inputs)?;

    let options = ProcessOptions {
        mode: args.mode.unwrap_or(config.defaults.mode),
        output_dir: args.output_dir.clone(),
        font: config.detection.font.clone(),
        input_size: config.classification.input_size,
        low_confidence: config.classification.low_confidence,
        fail_fast: args.fail_fast,
        progress_enabled: !args.quiet
            && !args.no_progress
            && args.output_mode == OutputMode::Human,
    };

    let reporter = reporter_for(args.output_mode);
    let summary = run_batch(files, &options, reporter.as_ref(), || {
        ModelRegistry::load(&config)
    })?;
    debug!(
        "Run finished: {} processed, {} failed",
        summary.processed, summary.failed
    );

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default; -v and up let it through.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // Results go to stdout, so logs stay on stderr.
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let output_mode = args.output_mode;
    match command {
        Command::About { page } => handle_about_command(page, output_mode),
        Command::Species { label } => handle_species_command(label.as_deref(), output_mode),
        Command::Config { action } => handle_config_command(action, args, config),
        Command::Models { action } => handle_models_command(action, config, output_mode),
    }
}

fn handle_about_command(page: Page, output_mode: OutputMode) -> Result<()> {
    let (name, body) = match page {
        Page::Project => ("project", cli::pages::about_project(&SpeciesKnowledgeBase::builtin())),
        Page::Author => ("author", cli::pages::about_author()),
    };

    match output_mode {
        OutputMode::Human => {
            print!("{body}");
            Ok(())
        }
        OutputMode::Json => print_json(
            EventType::Result,
            PagePayload {
                result_type: ResultType::Page,
                page: name.to_string(),
                body,
            },
        ),
    }
}

fn handle_species_command(label: Option<&str>, output_mode: OutputMode) -> Result<()> {
    let knowledge = SpeciesKnowledgeBase::builtin();
    let entries = cli::species::select_species(&knowledge, label)?;

    match output_mode {
        OutputMode::Human => {
            println!("{}", cli::species::species_text(&entries));
            Ok(())
        }
        OutputMode::Json => print_json(
            EventType::Result,
            SpeciesPayload {
                result_type: ResultType::Species,
                species: entries.into_iter().copied().collect(),
            },
        ),
    }
}

fn handle_config_command(action: ConfigAction, args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let explicit = args.config.as_deref();

    match action {
        ConfigAction::Init => {
            let path = resolve_config_path(explicit)?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_config_to(&Config::default(), explicit)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  Place the models at the paths listed under [models], then run:");
                println!("  animalai models check");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let path = resolve_config_path(explicit)?;
            match args.output_mode {
                OutputMode::Human => {
                    let text = toml::to_string_pretty(config)
                        .map_err(|e| Error::ConfigSerialize { source: e })?;
                    println!("# {}", path.display());
                    print!("{text}");
                    Ok(())
                }
                OutputMode::Json => print_json(
                    EventType::Result,
                    ConfigPayload {
                        result_type: ResultType::Config,
                        config_path: path,
                        config: serde_json::to_value(config)
                            .map_err(|e| Error::JsonWrite { source: e })?,
                    },
                ),
            }
        }
        ConfigAction::Path => {
            let path = resolve_config_path(explicit)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_models_command(
    action: ModelsAction,
    config: &Config,
    output_mode: OutputMode,
) -> Result<()> {
    match action {
        ModelsAction::Check => {
            let models = vec![
                ModelStatus {
                    role: Mode::Classification,
                    path: config.models.classification.clone(),
                    exists: config.models.classification.exists(),
                },
                ModelStatus {
                    role: Mode::Detection,
                    path: config.models.detection.clone(),
                    exists: config.models.detection.exists(),
                },
            ];

            if output_mode == OutputMode::Human {
                for model in &models {
                    println!(
                        "  {}: {} ({})",
                        model.role,
                        model.path.display(),
                        if model.exists { "found" } else { "missing" }
                    );
                }
            }

            let loaded =
                config::validate_model_files(&config.models).and_then(|()| ModelRegistry::load(config));
            if let Err(e) = loaded {
                if output_mode == OutputMode::Json {
                    print_json(
                        EventType::Result,
                        ModelCheckPayload {
                            result_type: ResultType::ModelCheck,
                            models,
                            loaded: false,
                        },
                    )?;
                    print_json(EventType::Error, fatal_payload(&e))?;
                }
                return Err(e);
            }
            debug!("Both models loaded");

            match output_mode {
                OutputMode::Human => {
                    println!("Models: OK");
                    Ok(())
                }
                OutputMode::Json => print_json(
                    EventType::Result,
                    ModelCheckPayload {
                        result_type: ResultType::ModelCheck,
                        models,
                        loaded: true,
                    },
                ),
            }
        }
    }
}

/// Print a single JSON envelope line to stdout.
fn print_json<T: Serialize>(event: EventType, payload: T) -> Result<()> {
    let json = serde_json::to_string(&JsonEnvelope::new(event, payload))
        .map_err(|e| Error::JsonWrite { source: e })?;
    println!("{json}");
    Ok(())
}
