use geojson::FeatureCollection;
use tracing::{debug, info};

use crate::api::documents::{json_href, StationEntry};
use crate::api::MetobsClient;
use crate::error::{CollectorError, Result};
use crate::models::{ObservationValue, ResourceDescriptor, StationObservation};
use crate::processors::FeatureAssembler;

/// Walks one resource's station list and follows each station's link chain
/// (station -> latest-day period -> data document) to its newest value.
///
/// Per-station failures never escape the loop: the station is skipped and
/// logged. A failure at the station-list level fails the whole resource,
/// which the fan-out driver then drops from the run.
pub struct StationFetcher {
    client: MetobsClient,
}

impl StationFetcher {
    pub fn new(client: MetobsClient) -> Self {
        Self { client }
    }

    pub async fn fetch_resource(&self, resource: &ResourceDescriptor) -> Result<FeatureCollection> {
        info!("Starting {}", resource.label());

        let stations = self.client.fetch_station_list(&resource.endpoint).await?;
        let mut assembler = FeatureAssembler::new(resource.clone());

        for station in &stations.station {
            match self.fetch_station(station).await {
                Ok(Some(observation)) => match assembler.push(observation) {
                    Ok(true) => {}
                    Ok(false) => info!(
                        "{}: found point long: {}, lat: {}",
                        resource.title, station.longitude, station.latitude
                    ),
                    Err(e) => info!("Feature not valid: {} - {}", station.name, e),
                },
                Ok(None) => {}
                Err(e) => info!("{} - {}", station.name, e),
            }
        }

        let accepted = assembler.len();
        let collection = assembler.into_collection()?;
        info!("Exiting {}, no of stations: {}", resource.title, accepted);
        Ok(collection)
    }

    /// Returns `Ok(None)` for stations that are skipped by policy: no
    /// latest-day period, not active, or an empty value list.
    async fn fetch_station(&self, station: &StationEntry) -> Result<Option<StationObservation>> {
        let station_href = station
            .json_href()
            .ok_or_else(|| self.station_error(station, "no JSON-typed station link"))?;

        let station_doc = self
            .client
            .fetch_station_document(station_href)
            .await
            .map_err(|e| self.station_error(station, &e.to_string()))?;

        let Some(period) = station_doc.latest_day() else {
            debug!("{}: no latest-day period", station.name);
            return Ok(None);
        };

        let period_href = json_href(&period.link)
            .ok_or_else(|| self.station_error(station, "no JSON-typed period link"))?;

        let period_doc = self
            .client
            .fetch_period_document(period_href)
            .await
            .map_err(|e| self.station_error(station, &e.to_string()))?;

        // The period document carries no key for its data entries, the
        // first one is the observation document.
        let Some(data) = period_doc.data.first() else {
            debug!("{}: period without data entry", station.name);
            return Ok(None);
        };

        let data_href = json_href(&data.link)
            .ok_or_else(|| self.station_error(station, "no JSON-typed data link"))?;

        let data_doc = self
            .client
            .fetch_data_document(data_href)
            .await
            .map_err(|e| self.station_error(station, &e.to_string()))?;

        Ok(build_observation(station, &data_doc))
    }

    fn station_error(&self, station: &StationEntry, reason: &str) -> CollectorError {
        CollectorError::StationFetch {
            station: station.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Acceptance policy for one station's observation document: the station
/// must be active and the document must carry at least one value. The value
/// list is chronological, so the last element is the newest.
pub fn build_observation(
    station: &StationEntry,
    data: &crate::api::DataDocument,
) -> Option<StationObservation> {
    if !station.active {
        return None;
    }
    let latest = data.latest_value()?;

    Some(StationObservation {
        station_name: station.name.clone(),
        longitude: station.longitude,
        latitude: station.latitude,
        height_meters: station.height,
        updated_epoch_millis: station.updated,
        value: ObservationValue::parse(&latest.value),
    })
}
