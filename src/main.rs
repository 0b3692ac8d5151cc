use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use wagon_upload::cli::Args;
use wagon_upload::config::UploadConfig;
use wagon_upload::upload::{DefaultWagonUpload, WagonUpload};
use wagon_upload::wagon::open_wagon;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    let config = load_config(&args)?;
    run_upload(&config)
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Load the YAML config if given, then apply command-line overrides
fn load_config(args: &Args) -> Result<UploadConfig> {
    let mut config = match &args.config {
        Some(path) => UploadConfig::from_yaml_file(path)?,
        None => UploadConfig::default(),
    };

    args.apply_to(&mut config);
    config.process_environment_variables();
    config.validate()?;
    Ok(config)
}

fn run_upload(config: &UploadConfig) -> Result<()> {
    let repository = config.repository.repository()?;
    info!("Uploading {} to {}", config.fileset.directory.display(), repository);

    let mut wagon = open_wagon(
        repository,
        &config.repository.authentication(),
        config.connection_timeout_secs,
    )
    .context("Failed to open wagon")?;

    let result = DefaultWagonUpload::default()
        .upload_with(wagon.as_mut(), &config.fileset, config.optimize)
        .context("Upload failed");

    if let Err(e) = wagon.disconnect() {
        warn!("Failed to disconnect cleanly: {}", e);
    }

    result?;
    info!("Upload completed successfully");
    Ok(())
}
