use crate::utils::constants::GEOJSON_EXTENSION;

/// Make a resource title or summary safe for use in an archive filename:
/// spaces become underscores, commas are dropped, slashes read as "_per_"
/// and the remaining filesystem-reserved characters are stripped.
pub fn sanitize_component(raw: &str) -> String {
    raw.replace(' ', "_")
        .replace(',', "")
        .replace('/', "_per_")
        .chars()
        .filter(|c| !matches!(c, '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Archive filename for one resource: `{id}_{title}__{summary}.geojson`.
pub fn geojson_filename(id: &str, title: &str, summary: &str) -> String {
    format!(
        "{}_{}__{}.{}",
        id,
        sanitize_component(title),
        sanitize_component(summary),
        GEOJSON_EXTENSION
    )
}
