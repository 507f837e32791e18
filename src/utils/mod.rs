pub mod constants;
pub mod filename;
pub mod progress;

pub use filename::{geojson_filename, sanitize_component};
pub use progress::ProgressReporter;
