use std::collections::BTreeMap;
use std::time::Duration;

use futures::StreamExt;
use geojson::FeatureCollection;
use tracing::warn;

use crate::api::MetobsClient;
use crate::error::Result;
use crate::models::ResourceDescriptor;
use crate::processors::StationFetcher;
use crate::utils::constants::DEFAULT_RESOURCE_TIMEOUT_SECS;
use crate::utils::progress::ProgressReporter;

/// One resource's fetch outcome, keyed into the result map by resource id.
#[derive(Debug, Clone)]
pub struct CollectedResource {
    pub descriptor: ResourceDescriptor,
    pub collection: FeatureCollection,
}

/// Bounded fan-out over the resource list: at most `max_workers` resources
/// are fetched concurrently, each under its own timeout, and all tasks are
/// joined before the result map is returned. A failed or timed-out resource
/// is logged and dropped; it never aborts the run.
pub struct ParallelCollector {
    max_workers: usize,
    resource_timeout: Duration,
}

impl ParallelCollector {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            resource_timeout: Duration::from_secs(DEFAULT_RESOURCE_TIMEOUT_SECS),
        }
    }

    pub fn with_resource_timeout(mut self, timeout: Duration) -> Self {
        self.resource_timeout = timeout;
        self
    }

    pub async fn collect_all(
        &self,
        client: &MetobsClient,
        resources: &[ResourceDescriptor],
        progress: Option<&ProgressReporter>,
    ) -> Result<BTreeMap<String, CollectedResource>> {
        let timeout = self.resource_timeout;

        let mut tasks = futures::stream::iter(resources.to_vec())
            .map(|resource| {
                let client = client.clone();
                tokio::spawn(async move {
                    let fetcher = StationFetcher::new(client);
                    let outcome =
                        tokio::time::timeout(timeout, fetcher.fetch_resource(&resource)).await;
                    (resource, outcome)
                })
            })
            .buffer_unordered(self.max_workers);

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.next().await {
            let (resource, outcome) = joined?;
            if let Some(p) = progress {
                p.increment(1);
            }
            match outcome {
                Ok(Ok(collection)) => {
                    results.insert(
                        resource.id.clone(),
                        CollectedResource {
                            descriptor: resource,
                            collection,
                        },
                    );
                }
                Ok(Err(e)) => warn!("Skipping {}: {}", resource.label(), e),
                Err(_) => warn!(
                    "Skipping {}: timed out after {}s",
                    resource.label(),
                    timeout.as_secs()
                ),
            }
        }

        Ok(results)
    }
}

impl Default for ParallelCollector {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
