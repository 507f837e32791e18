use std::collections::HashSet;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;
use validator::Validate;

use crate::error::{CollectorError, Result};
use crate::models::{ResourceDescriptor, StationObservation};

/// Builds one resource's feature collection from accepted observations,
/// dropping later observations at an already-seen coordinate pair.
pub struct FeatureAssembler {
    resource: ResourceDescriptor,
    features: Vec<Feature>,
    seen_coordinates: HashSet<(u64, u64)>,
}

impl FeatureAssembler {
    pub fn new(resource: ResourceDescriptor) -> Self {
        Self {
            resource,
            features: Vec::new(),
            seen_coordinates: HashSet::new(),
        }
    }

    /// Accept one observation. Returns `Ok(false)` when another feature
    /// already occupies the coordinate (first-seen wins); fails with
    /// `InvalidFeature` when the observation does not validate.
    pub fn push(&mut self, observation: StationObservation) -> Result<bool> {
        observation
            .validate()
            .map_err(|e| CollectorError::InvalidFeature {
                station: observation.station_name.clone(),
                reason: e.to_string(),
            })?;

        let coordinate = (
            observation.longitude.to_bits(),
            observation.latitude.to_bits(),
        );
        if !self.seen_coordinates.insert(coordinate) {
            return Ok(false);
        }

        self.features.push(self.build_feature(&observation));
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Finish the collection; fails with `InvalidFeatureCollection` when the
    /// result does not pass the structural checks.
    pub fn into_collection(self) -> Result<FeatureCollection> {
        let collection = FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        };
        validate_collection(&self.resource.label(), &collection)?;
        Ok(collection)
    }

    fn build_feature(&self, observation: &StationObservation) -> Feature {
        let geometry = Geometry::new(Value::Point(vec![
            observation.longitude,
            observation.latitude,
        ]));

        let mut properties = JsonObject::new();
        properties.insert("key".to_string(), json!(self.resource.id));
        properties.insert("title".to_string(), json!(self.resource.title));
        properties.insert("summary".to_string(), json!(self.resource.summary));
        properties.insert("updated".to_string(), json!(observation.updated_epoch_millis));
        properties.insert(
            "timestamp".to_string(),
            json!(observation.formatted_timestamp()),
        );
        properties.insert("height".to_string(), json!(observation.height_meters));
        properties.insert("value".to_string(), observation.value.as_json());

        Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(Id::String(observation.station_name.clone())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Structural checks on a feature collection: every feature carries a
/// two-coordinate finite Point, an id and a value property, and no two
/// features share a coordinate pair.
pub fn validate_collection(name: &str, collection: &FeatureCollection) -> Result<()> {
    let mut seen: HashSet<(u64, u64)> = HashSet::new();

    for feature in &collection.features {
        let geometry = feature.geometry.as_ref().ok_or_else(|| invalid(name, "feature without geometry"))?;

        let position = match &geometry.value {
            Value::Point(position) => position,
            _ => {
                return Err(invalid(name, "non-point geometry"));
            }
        };
        if position.len() != 2 || !position.iter().all(|c| c.is_finite()) {
            return Err(invalid(name, "point is not a finite (lon, lat) pair"));
        }
        if feature.id.is_none() {
            return Err(invalid(name, "feature without station id"));
        }
        let has_value = feature
            .properties
            .as_ref()
            .is_some_and(|p| p.contains_key("value"));
        if !has_value {
            return Err(invalid(name, "feature without a value property"));
        }
        if !seen.insert((position[0].to_bits(), position[1].to_bits())) {
            return Err(invalid(
                name,
                &format!("duplicate coordinate ({}, {})", position[0], position[1]),
            ));
        }
    }

    Ok(())
}

fn invalid(resource: &str, reason: &str) -> CollectorError {
    CollectorError::InvalidFeatureCollection {
        resource: resource.to_string(),
        reason: reason.to_string(),
    }
}
