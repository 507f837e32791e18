use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ResourceDescriptor;

/// Per-day `meta.json` document: generation time, resource count and the
/// id -> title/summary translation table consumers use to label files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveMetadata {
    /// "YYYY-MM-DD HH:MM:SS", second precision, local time.
    pub generated: String,
    /// Number of resource files written, serialized as a string for
    /// compatibility with existing consumers of the archive.
    pub resources: String,
    pub translations: BTreeMap<String, TranslationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationEntry {
    pub resource: ResourceTranslation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceTranslation {
    pub title: String,
    pub summary: String,
}

impl ArchiveMetadata {
    pub fn new<'a, I>(generated: String, descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceDescriptor>,
    {
        let translations: BTreeMap<String, TranslationEntry> = descriptors
            .into_iter()
            .map(|d| {
                (
                    d.id.clone(),
                    TranslationEntry {
                        resource: ResourceTranslation {
                            title: d.title.clone(),
                            summary: d.summary.clone(),
                        },
                    },
                )
            })
            .collect();

        Self {
            generated,
            resources: translations.len().to_string(),
            translations,
        }
    }

    pub fn resource_count(&self) -> usize {
        self.translations.len()
    }
}
