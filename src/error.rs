use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Station fetch failed for '{station}': {reason}")]
    StationFetch { station: String, reason: String },

    #[error("Invalid feature for station '{station}': {reason}")]
    InvalidFeature { station: String, reason: String },

    #[error("Invalid feature collection for resource '{resource}': {reason}")]
    InvalidFeatureCollection { resource: String, reason: String },

    #[error("Archive storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),
}
