use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CollectorError, Result};
use crate::utils::constants::{
    DEFAULT_API_URL, DEFAULT_ARCHIVE_ROOT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_RESOURCE_TIMEOUT_SECS,
};

/// Run-time configuration for one collection run, built from CLI arguments
/// and passed explicitly into the client, driver and writer.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Root URL of the upstream API entry document.
    pub api_url: String,
    /// Directory under which dated archives are written.
    pub archive_root: PathBuf,
    /// Upper bound on concurrently fetched resources.
    pub max_workers: usize,
    /// Timeout for a single HTTP request.
    pub request_timeout: Duration,
    /// Timeout for the whole fetch of one resource (all its stations).
    pub resource_timeout: Duration,
    /// Suppress progress output.
    pub silent: bool,
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            archive_root: PathBuf::from(DEFAULT_ARCHIVE_ROOT),
            max_workers: num_cpus::get(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            resource_timeout: Duration::from_secs(DEFAULT_RESOURCE_TIMEOUT_SECS),
            silent: false,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_archive_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.archive_root = root.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_resource_timeout(mut self, timeout: Duration) -> Self {
        self.resource_timeout = timeout;
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(CollectorError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.api_url.is_empty() {
            return Err(CollectorError::Config("api_url must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self::new()
    }
}
