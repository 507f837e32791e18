use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{Local, TimeZone};
use metobs_collector::api::{DataDocument, MetobsClient, StationListDocument};
use metobs_collector::config::CollectorConfig;
use metobs_collector::error::CollectorError;
use metobs_collector::models::{ObservationValue, ResourceDescriptor};
use metobs_collector::processors::{
    build_observation, validate_collection, CollectedResource, FeatureAssembler,
};
use metobs_collector::writers::{read_collection, read_metadata, ArchiveWriter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// A station-list document the way the upstream API shapes it.
fn station_list_fixture() -> StationListDocument {
    serde_json::from_str(
        r#"{"station": [
            {"name": "Göteborg A", "latitude": 57.0, "longitude": 12.0, "height": 5.0,
             "active": true, "updated": 1592732400000, "link": []},
            {"name": "Göteborg B", "latitude": 57.0, "longitude": 12.0, "height": 8.0,
             "active": true, "updated": 1592732400000, "link": []},
            {"name": "Nedlagd", "latitude": 58.0, "longitude": 11.0, "height": 2.0,
             "active": false, "updated": 1592732400000, "link": []}
        ]}"#,
    )
    .unwrap()
}

fn data_fixture(raw_value: &str) -> DataDocument {
    serde_json::from_str(&format!(
        r#"{{"value": [{{"date": 1592732400000, "value": "{}", "quality": "G"}}]}}"#,
        raw_value
    ))
    .unwrap()
}

/// Fixture documents through the acceptance policy, the assembler and the
/// archive writer, then read back: the full pipeline minus the network.
#[test]
fn test_pipeline_from_documents_to_archive() {
    let descriptor = ResourceDescriptor::new("1", "Air temperature", "momentanvärde", "http://x");
    let stations = station_list_fixture();
    let mut assembler = FeatureAssembler::new(descriptor.clone());

    let mut duplicates = 0;
    for station in &stations.station {
        if let Some(observation) = build_observation(station, &data_fixture("23.4")) {
            if !assembler.push(observation).unwrap() {
                duplicates += 1;
            }
        }
    }

    // The inactive station is rejected and the coordinate shared by the two
    // Göteborg stations collapses to the first-seen feature.
    assert_eq!(duplicates, 1);
    assert_eq!(assembler.len(), 1);

    let collection = assembler.into_collection().unwrap();
    let feature = &collection.features[0];
    assert_eq!(
        feature.id,
        Some(geojson::feature::Id::String("Göteborg A".to_string()))
    );
    assert_eq!(
        feature.properties.as_ref().unwrap()["value"],
        serde_json::json!(23.4)
    );

    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path());
    let mut results = BTreeMap::new();
    results.insert(
        descriptor.id.clone(),
        CollectedResource {
            descriptor,
            collection,
        },
    );

    let run_date = Local.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
    let day_dir = writer.store_for_date(&results, run_date).unwrap();

    let read_back =
        read_collection(&day_dir.join("01_Air_temperature__momentanvärde.geojson")).unwrap();
    assert_eq!(read_back.features.len(), 1);
    assert!(validate_collection("read back", &read_back).is_ok());
}

#[test]
fn test_partial_resource_coverage_still_archives() {
    let ok_descriptor = ResourceDescriptor::new("1", "Temperature", "momentanvärde", "http://a");
    // A second catalog resource whose fetch failed contributes nothing to
    // the result map; the archive covers the survivors only.
    let failed_descriptor = ResourceDescriptor::new("5", "Rainfall", "daily sum", "http://b");

    let mut assembler = FeatureAssembler::new(ok_descriptor.clone());
    for station in &station_list_fixture().station {
        if let Some(observation) = build_observation(station, &data_fixture("regn")) {
            let _ = assembler.push(observation).unwrap();
        }
    }

    let mut results = BTreeMap::new();
    results.insert(
        ok_descriptor.id.clone(),
        CollectedResource {
            descriptor: ok_descriptor,
            collection: assembler.into_collection().unwrap(),
        },
    );

    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path());
    let run_date = Local.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
    let day_dir = writer.store_for_date(&results, run_date).unwrap();

    let metadata = read_metadata(&day_dir.join("meta.json")).unwrap();
    assert_eq!(metadata.resources, "1");
    assert!(metadata.translations.contains_key("01"));
    assert!(!metadata.translations.contains_key(&failed_descriptor.id));
}

#[test]
fn test_textual_observation_survives_the_round_trip() {
    let descriptor = ResourceDescriptor::new("7", "Precipitation type", "momentanvärde", "http://x");
    let station = &station_list_fixture().station[0];

    let observation = build_observation(station, &data_fixture("regn")).unwrap();
    assert_eq!(observation.value, ObservationValue::Text("regn".to_string()));

    let mut assembler = FeatureAssembler::new(descriptor.clone());
    assembler.push(observation).unwrap();

    let mut results = BTreeMap::new();
    results.insert(
        descriptor.id.clone(),
        CollectedResource {
            descriptor,
            collection: assembler.into_collection().unwrap(),
        },
    );

    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path());
    let run_date = Local.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap();
    let day_dir = writer.store_for_date(&results, run_date).unwrap();

    let read_back =
        read_collection(&day_dir.join("07_Precipitation_type__momentanvärde.geojson")).unwrap();
    assert_eq!(
        read_back.features[0].properties.as_ref().unwrap()["value"],
        serde_json::json!("regn")
    );
}

#[tokio::test]
async fn test_unreachable_catalog_maps_to_catalog_unavailable() {
    // Port 1 refuses connections, so resolving the API root fails before
    // any resource is fetched.
    let client =
        MetobsClient::new("http://127.0.0.1:1/api.json", Duration::from_millis(250)).unwrap();

    let result = client.load_catalog().await;
    assert!(matches!(result, Err(CollectorError::CatalogUnavailable(_))));
}

#[tokio::test]
async fn test_failed_catalog_writes_no_archive_at_all() {
    let temp = TempDir::new().unwrap();
    let config = CollectorConfig::new()
        .with_api_url("http://127.0.0.1:1/api.json")
        .with_archive_root(temp.path())
        .with_request_timeout(Duration::from_millis(250))
        .with_silent(true);

    let result = metobs_collector::cli::collect(config).await;
    assert!(matches!(result, Err(CollectorError::CatalogUnavailable(_))));

    // No dated directories and no latest pointer: the archive root is
    // untouched when the catalog stage fails.
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn test_two_runs_rotate_the_latest_pointer() {
    let descriptor = ResourceDescriptor::new("1", "Temperature", "momentanvärde", "http://a");
    let mut assembler = FeatureAssembler::new(descriptor.clone());
    for station in &station_list_fixture().station {
        if let Some(observation) = build_observation(station, &data_fixture("1.0")) {
            let _ = assembler.push(observation).unwrap();
        }
    }

    let mut results = BTreeMap::new();
    results.insert(
        descriptor.id.clone(),
        CollectedResource {
            descriptor,
            collection: assembler.into_collection().unwrap(),
        },
    );

    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path());

    writer
        .store_for_date(&results, Local.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap())
        .unwrap();
    writer
        .store_for_date(&results, Local.with_ymd_and_hms(2020, 6, 22, 12, 0, 0).unwrap())
        .unwrap();

    let pointer = temp.path().join("latest");
    assert_eq!(
        std::fs::read_link(&pointer).unwrap(),
        std::path::PathBuf::from("2020/06/22")
    );
    // Both dated directories remain untouched.
    assert!(temp.path().join("2020/06/21/meta.json").exists());
    assert!(temp.path().join("2020/06/22/meta.json").exists());
}
