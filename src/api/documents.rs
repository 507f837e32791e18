//! Typed shapes of the upstream hypermedia documents. The consumer follows
//! embedded links selected by media type and semantic `key` fields instead
//! of constructing URLs.

use serde::Deserialize;

use crate::utils::constants::{KEY_LATEST, MEDIA_TYPE_JSON, PERIOD_LATEST_DAY};

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// First href among `links` whose declared media type is `application/json`.
pub fn json_href(links: &[Link]) -> Option<&str> {
    links
        .iter()
        .find(|l| l.media_type.as_deref() == Some(MEDIA_TYPE_JSON))
        .map(|l| l.href.as_str())
}

/// API root: the list of published versions.
#[derive(Debug, Deserialize)]
pub struct ApiRootDocument {
    pub version: Vec<VersionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct VersionEntry {
    pub key: Option<String>,
    #[serde(default)]
    pub link: Vec<Link>,
}

impl ApiRootDocument {
    pub fn latest_version(&self) -> Option<&VersionEntry> {
        self.version
            .iter()
            .find(|v| v.key.as_deref() == Some(KEY_LATEST))
    }
}

/// Version document: the list of observable resources.
#[derive(Debug, Deserialize)]
pub struct VersionDocument {
    pub resource: Vec<ResourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceEntry {
    pub key: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub link: Vec<Link>,
}

/// Resource document: the list of stations reporting the resource.
#[derive(Debug, Deserialize)]
pub struct StationListDocument {
    pub station: Vec<StationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationEntry {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub height: f64,
    pub active: bool,
    /// Epoch milliseconds.
    pub updated: i64,
    #[serde(default)]
    pub link: Vec<Link>,
}

impl StationEntry {
    pub fn json_href(&self) -> Option<&str> {
        json_href(&self.link)
    }
}

/// Station document: the reporting periods available for the station.
#[derive(Debug, Deserialize)]
pub struct StationDocument {
    #[serde(default)]
    pub period: Vec<PeriodEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodEntry {
    pub key: String,
    #[serde(default)]
    pub link: Vec<Link>,
}

impl StationDocument {
    /// The most recent reporting window; stations without it are skipped.
    pub fn latest_day(&self) -> Option<&PeriodEntry> {
        self.period.iter().find(|p| p.key == PERIOD_LATEST_DAY)
    }
}

/// Period document: pointers to the period's data documents.
#[derive(Debug, Deserialize)]
pub struct PeriodDocument {
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DataEntry {
    #[serde(default)]
    pub link: Vec<Link>,
}

/// Observation document: the chronological value list, oldest first.
#[derive(Debug, Deserialize)]
pub struct DataDocument {
    pub value: Option<Vec<ValueEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueEntry {
    pub value: String,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub quality: Option<String>,
}

impl DataDocument {
    /// Last element of the value list, i.e. the newest observation.
    pub fn latest_value(&self) -> Option<&ValueEntry> {
        self.value.as_ref().and_then(|values| values.last())
    }
}
