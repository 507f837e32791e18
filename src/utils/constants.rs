/// Root entry document of the SMHI meteorological observations API.
pub const DEFAULT_API_URL: &str = "https://opendata-download-metobs.smhi.se/api.json";

/// Directory under which dated archives are written.
pub const DEFAULT_ARCHIVE_ROOT: &str = "metobs_data";

/// Link media type used to select JSON representations.
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Version entry key identifying the newest API version.
pub const KEY_LATEST: &str = "latest";

/// Period key identifying the most recent reporting window of a station.
pub const PERIOD_LATEST_DAY: &str = "latest-day";

/// Name of the per-day metadata document.
pub const METADATA_FILE: &str = "meta.json";

/// Name of the pointer to the most recent dated directory.
pub const LATEST_POINTER: &str = "latest";

/// Extension of the per-resource output files.
pub const GEOJSON_EXTENSION: &str = "geojson";

/// Timestamp format used in feature properties (UTC, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Timestamp format used for the `generated` field in meta.json.
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Network defaults
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RESOURCE_TIMEOUT_SECS: u64 = 600;
