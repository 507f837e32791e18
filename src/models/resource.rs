use serde::{Deserialize, Serialize};

/// One observable meteorological quantity from the upstream catalog
/// (e.g. air temperature, rainfall). Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Catalog key, zero-padded to two digits when numeric ("1" -> "01")
    /// so that archive filenames sort lexically.
    pub id: String,
    pub title: String,
    pub summary: String,
    /// URL of the resource's station list document.
    pub endpoint: String,
}

impl ResourceDescriptor {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: Self::pad_id(id.into()),
            title: title.into(),
            summary: summary.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Human-readable label used in log lines: "Air temperature (momentanvärde)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.summary)
    }

    fn pad_id(raw: String) -> String {
        match raw.parse::<u32>() {
            Ok(n) => format!("{:02}", n),
            Err(_) => raw,
        }
    }
}
