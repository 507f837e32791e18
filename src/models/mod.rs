pub mod metadata;
pub mod observation;
pub mod resource;

pub use metadata::{ArchiveMetadata, ResourceTranslation, TranslationEntry};
pub use observation::{ObservationValue, StationObservation};
pub use resource::ResourceDescriptor;
