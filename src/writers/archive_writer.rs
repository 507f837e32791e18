use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local};
use geojson::FeatureCollection;
use tracing::{debug, info};

use crate::error::{CollectorError, Result};
use crate::models::ArchiveMetadata;
use crate::processors::CollectedResource;
use crate::utils::constants::{GENERATED_FORMAT, LATEST_POINTER, METADATA_FILE};
use crate::utils::filename::geojson_filename;

/// Persists one run into `{root}/{YYYY}/{MM}/{DD}`: one GeoJSON file per
/// resource plus a `meta.json` summary, then swaps the `latest` pointer to
/// the new directory. Exclusively owns the layout under the archive root.
pub struct ArchiveWriter {
    root: PathBuf,
}

impl ArchiveWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self, results: &BTreeMap<String, CollectedResource>) -> Result<PathBuf> {
        self.store_for_date(results, Local::now())
    }

    /// Date-injectable variant of `store`; the dated directory is derived
    /// from `now` and pre-existing directories are not an error.
    pub fn store_for_date(
        &self,
        results: &BTreeMap<String, CollectedResource>,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let relative = PathBuf::from(format!("{:04}", now.year()))
            .join(format!("{:02}", now.month()))
            .join(format!("{:02}", now.day()));
        let day_dir = self.root.join(&relative);

        fs::create_dir_all(&day_dir)
            .map_err(|e| storage_error("creating archive directory", &day_dir, e))?;

        for collected in results.values() {
            let filename = geojson_filename(
                &collected.descriptor.id,
                &collected.descriptor.title,
                &collected.descriptor.summary,
            );
            let path = day_dir.join(&filename);
            write_json(&path, &collected.collection)?;
            debug!("wrote {}", path.display());
        }

        let metadata = ArchiveMetadata::new(
            now.format(GENERATED_FORMAT).to_string(),
            results.values().map(|c| &c.descriptor),
        );
        write_json(&day_dir.join(METADATA_FILE), &metadata)?;

        self.update_latest_pointer(&relative)?;

        info!(
            "archived {} resource collections under {}",
            results.len(),
            day_dir.display()
        );
        Ok(day_dir)
    }

    /// Swap `{root}/latest` atomically: build the new pointer under a
    /// temporary name, then rename it over the old one. There is never a
    /// window without a valid pointer.
    fn update_latest_pointer(&self, target: &Path) -> Result<()> {
        let staged = self.root.join(".latest.tmp");
        let pointer = self.root.join(LATEST_POINTER);

        if staged.symlink_metadata().is_ok() {
            fs::remove_file(&staged)
                .map_err(|e| storage_error("removing stale staged pointer", &staged, e))?;
        }
        create_pointer(target, &staged)
            .map_err(|e| storage_error("staging latest pointer", &staged, e))?;
        fs::rename(&staged, &pointer)
            .map_err(|e| storage_error("renaming latest pointer", &pointer, e))?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_pointer(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_pointer(target: &Path, link: &Path) -> std::io::Result<()> {
    // No symlinks without privileges; a one-line pointer file is the
    // equivalent indirection for consumers.
    fs::write(link, target.to_string_lossy().as_bytes())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| storage_error("creating file", path, e))?;
    serde_json::to_writer(BufWriter::new(file), value)
        .map_err(|e| CollectorError::Storage(format!("writing {}: {}", path.display(), e)))?;
    Ok(())
}

fn storage_error(action: &str, path: &Path, e: std::io::Error) -> CollectorError {
    CollectorError::Storage(format!("{} {}: {}", action, path.display(), e))
}

/// Read a stored feature collection back from the archive.
pub fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let content = fs::read_to_string(path)?;
    Ok(content.parse::<FeatureCollection>()?)
}

/// Read a stored `meta.json` back from the archive.
pub fn read_metadata(path: &Path) -> Result<ArchiveMetadata> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObservationValue, ResourceDescriptor, StationObservation};
    use crate::processors::FeatureAssembler;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_results() -> BTreeMap<String, CollectedResource> {
        let descriptor =
            ResourceDescriptor::new("1", "Air temperature", "momentanvärde, 1 gång/tim", "http://x");
        let mut assembler = FeatureAssembler::new(descriptor.clone());
        assembler
            .push(StationObservation {
                station_name: "Göteborg A".to_string(),
                longitude: 12.0,
                latitude: 57.0,
                height_meters: 5.0,
                updated_epoch_millis: 1_592_732_400_000,
                value: ObservationValue::Numeric(23.4),
            })
            .unwrap();

        let mut results = BTreeMap::new();
        results.insert(
            descriptor.id.clone(),
            CollectedResource {
                descriptor,
                collection: assembler.into_collection().unwrap(),
            },
        );
        results
    }

    fn fixed_date() -> DateTime<Local> {
        Local.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_store_writes_dated_tree_and_metadata() {
        let temp = TempDir::new().unwrap();
        let writer = ArchiveWriter::new(temp.path());

        let day_dir = writer.store_for_date(&sample_results(), fixed_date()).unwrap();
        assert_eq!(day_dir, temp.path().join("2020").join("06").join("21"));

        let geojson_path =
            day_dir.join("01_Air_temperature__momentanvärde_1_gång_per_tim.geojson");
        assert!(geojson_path.exists());

        let metadata = read_metadata(&day_dir.join(METADATA_FILE)).unwrap();
        assert_eq!(metadata.resources, "1");
        assert_eq!(metadata.generated, "2020-06-21 12:00:00");
        assert_eq!(metadata.translations["01"].resource.title, "Air temperature");
    }

    #[test]
    fn test_round_trip_preserves_observation_tuples() {
        let temp = TempDir::new().unwrap();
        let writer = ArchiveWriter::new(temp.path());
        let results = sample_results();

        let day_dir = writer.store_for_date(&results, fixed_date()).unwrap();
        let geojson_path =
            day_dir.join("01_Air_temperature__momentanvärde_1_gång_per_tim.geojson");

        let read_back = read_collection(&geojson_path).unwrap();
        let stored = &results["01"].collection;
        assert_eq!(read_back.features.len(), stored.features.len());

        let feature = &read_back.features[0];
        assert_eq!(feature.id, stored.features[0].id);
        assert_eq!(
            feature.properties.as_ref().unwrap()["value"],
            serde_json::json!(23.4)
        );
        match &feature.geometry.as_ref().unwrap().value {
            geojson::Value::Point(position) => assert_eq!(position, &vec![12.0, 57.0]),
            other => panic!("expected point, got {:?}", other),
        }
    }

    #[test]
    fn test_store_is_idempotent_for_the_same_day() {
        let temp = TempDir::new().unwrap();
        let writer = ArchiveWriter::new(temp.path());
        let results = sample_results();

        let first = writer.store_for_date(&results, fixed_date()).unwrap();
        let geojson_path =
            first.join("01_Air_temperature__momentanvärde_1_gång_per_tim.geojson");
        let first_bytes = fs::read(&geojson_path).unwrap();

        let second = writer.store_for_date(&results, fixed_date()).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(&geojson_path).unwrap(), first_bytes);
    }

    #[cfg(unix)]
    #[test]
    fn test_latest_pointer_tracks_newest_directory() {
        let temp = TempDir::new().unwrap();
        let writer = ArchiveWriter::new(temp.path());
        let results = sample_results();

        writer.store_for_date(&results, fixed_date()).unwrap();
        let pointer = temp.path().join(LATEST_POINTER);
        assert_eq!(
            fs::read_link(&pointer).unwrap(),
            PathBuf::from("2020/06/21")
        );

        let next_day = Local.with_ymd_and_hms(2020, 6, 22, 12, 0, 0).unwrap();
        writer.store_for_date(&results, next_day).unwrap();
        assert_eq!(
            fs::read_link(&pointer).unwrap(),
            PathBuf::from("2020/06/22")
        );

        // The pointer resolves to a real directory.
        assert!(pointer.join(METADATA_FILE).exists());
    }

    #[test]
    fn test_store_with_no_results_still_writes_metadata() {
        let temp = TempDir::new().unwrap();
        let writer = ArchiveWriter::new(temp.path());

        let day_dir = writer
            .store_for_date(&BTreeMap::new(), fixed_date())
            .unwrap();
        let metadata = read_metadata(&day_dir.join(METADATA_FILE)).unwrap();
        assert_eq!(metadata.resources, "0");
        assert!(metadata.translations.is_empty());
    }
}
