pub mod feature_assembler;
pub mod parallel_collector;
pub mod station_fetcher;

pub use feature_assembler::{validate_collection, FeatureAssembler};
pub use parallel_collector::{CollectedResource, ParallelCollector};
pub use station_fetcher::{build_observation, StationFetcher};
