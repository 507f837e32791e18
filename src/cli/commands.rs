use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::api::MetobsClient;
use crate::cli::args::{Cli, Commands};
use crate::config::CollectorConfig;
use crate::error::{CollectorError, Result};
use crate::processors::{validate_collection, ParallelCollector};
use crate::utils::constants::{GEOJSON_EXTENSION, METADATA_FILE};
use crate::utils::progress::ProgressReporter;
use crate::writers::{read_collection, read_metadata, ArchiveWriter};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;

    match cli.command {
        Commands::Collect {
            api_url,
            archive_root,
            max_workers,
            request_timeout,
            resource_timeout,
            silent,
        } => {
            let config = CollectorConfig::new()
                .with_api_url(api_url)
                .with_archive_root(archive_root)
                .with_max_workers(max_workers)
                .with_request_timeout(Duration::from_secs(request_timeout))
                .with_resource_timeout(Duration::from_secs(resource_timeout))
                .with_silent(silent);
            collect(config).await?;
        }

        Commands::Info { path } => {
            info(&path)?;
        }

        Commands::Validate { path } => {
            validate(&path)?;
        }
    }

    Ok(())
}

pub async fn collect(config: CollectorConfig) -> Result<()> {
    config.validate()?;

    let client = MetobsClient::new(config.api_url.clone(), config.request_timeout)?;

    let catalog_progress = ProgressReporter::new_spinner("Loading resource catalog...", config.silent);
    let resources = client.load_catalog().await?;
    catalog_progress.finish_with_message(&format!("Catalog loaded: {} resources", resources.len()));

    let progress = ProgressReporter::new(
        resources.len() as u64,
        "Fetching station observations...",
        config.silent,
    );
    let collector =
        ParallelCollector::new(config.max_workers).with_resource_timeout(config.resource_timeout);
    let results = collector
        .collect_all(&client, &resources, Some(&progress))
        .await?;
    progress.finish_with_message(&format!(
        "Fetched {} of {} resources",
        results.len(),
        resources.len()
    ));

    let writer = ArchiveWriter::new(&config.archive_root);
    let day_dir = writer.store(&results)?;

    println!(
        "Archived {} resource collections to `{}`",
        results.len(),
        day_dir.display()
    );
    if results.len() < resources.len() {
        println!(
            "⚠️  {} resources were skipped, see the log for details",
            resources.len() - results.len()
        );
    }

    Ok(())
}

fn info(path: &Path) -> Result<()> {
    let meta_path = if path.is_dir() {
        path.join(METADATA_FILE)
    } else {
        path.to_path_buf()
    };

    let metadata = read_metadata(&meta_path)?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    println!(
        "\n{} resources generated at {}",
        metadata.resource_count(),
        metadata.generated
    );
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(GEOJSON_EXTENSION))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(CollectorError::Config(format!(
            "no .geojson files under {}",
            path.display()
        )));
    }

    let mut violations = 0usize;
    for file in &files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match read_collection(file).and_then(|fc| {
            validate_collection(&name, &fc)?;
            Ok(fc.features.len())
        }) {
            Ok(count) => println!("{}: {} features", name, count),
            Err(e) => {
                violations += 1;
                println!("{}: {}", name, e);
            }
        }
    }

    if violations == 0 {
        println!("\n✅ All {} collections passed validation checks", files.len());
    } else {
        println!("\n⚠️  Found {} invalid collections", violations);
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = tracing_subscriber::fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(filter).with(console);

    match &cli.log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file));
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
    Ok(())
}
