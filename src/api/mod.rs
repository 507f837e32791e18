pub mod client;
pub mod documents;

pub use client::MetobsClient;
pub use documents::{
    ApiRootDocument, DataDocument, Link, PeriodDocument, StationDocument, StationEntry,
    StationListDocument, ValueEntry, VersionDocument,
};
