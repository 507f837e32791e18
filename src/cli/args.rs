use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_API_URL, DEFAULT_ARCHIVE_ROOT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RESOURCE_TIMEOUT_SECS,
};

#[derive(Parser)]
#[command(name = "metobs-collector")]
#[command(about = "Collects the latest meteorological station observations into a dated GeoJSON archive")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Also append log output to this file")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every resource's latest observations and archive them
    Collect {
        #[arg(long, default_value = DEFAULT_API_URL, help = "Root URL of the upstream API")]
        api_url: String,

        #[arg(
            short,
            long,
            default_value = DEFAULT_ARCHIVE_ROOT,
            help = "Directory the dated archive tree is written under"
        )]
        archive_root: PathBuf,

        #[arg(long, default_value_t = num_cpus::get(), help = "Concurrent resource fetches")]
        max_workers: usize,

        #[arg(
            long,
            default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS,
            help = "Timeout per HTTP request, seconds"
        )]
        request_timeout: u64,

        #[arg(
            long,
            default_value_t = DEFAULT_RESOURCE_TIMEOUT_SECS,
            help = "Timeout per resource fetch, seconds"
        )]
        resource_timeout: u64,

        #[arg(long, default_value = "false", help = "Suppress progress output")]
        silent: bool,
    },

    /// Display the metadata summary of one archived day
    Info {
        #[arg(short, long, help = "Dated archive directory or meta.json file")]
        path: PathBuf,
    },

    /// Read back one archived day and structurally check its collections
    Validate {
        #[arg(short, long, help = "Dated archive directory")]
        path: PathBuf,
    },
}
