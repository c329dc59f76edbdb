//! GeoJSON FeatureCollection encoding and decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{Feature, FeatureId};
use crate::geometry::{GeometryValue, Properties};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, found {found}")]
    NotAFeatureCollection { found: String },
    #[error("feature {index}: {message}")]
    InvalidFeature { index: usize, message: String },
}

/// External feature key, either form GeoJSON allows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FeatureKey {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Serialize, Deserialize)]
struct FeatureRecord {
    #[serde(rename = "type")]
    type_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<FeatureKey>,
    #[serde(default)]
    properties: Option<Properties>,
    geometry: GeometryValue,
}

#[derive(Debug, Serialize)]
struct FeatureCollectionRecord {
    #[serde(rename = "type")]
    type_field: &'static str,
    features: Vec<FeatureRecord>,
}

impl FeatureRecord {
    fn into_feature(self, index: usize) -> Result<Feature, DecodeError> {
        if self.type_field != "Feature" {
            return Err(DecodeError::InvalidFeature {
                index,
                message: format!("expected type \"Feature\", found \"{}\"", self.type_field),
            });
        }

        let id = match self.id {
            Some(FeatureKey::Text(key)) => FeatureId::from_key(&key),
            Some(FeatureKey::Number(number)) => FeatureId::from_key(&number.to_string()),
            None => FeatureId::new(),
        };

        Ok(Feature {
            id,
            properties: self.properties.unwrap_or_default(),
            geometry: self.geometry,
        })
    }
}

impl From<&Feature> for FeatureRecord {
    fn from(feature: &Feature) -> Self {
        Self {
            type_field: "Feature".to_string(),
            id: Some(FeatureKey::Text(feature.id.to_string())),
            properties: Some(feature.properties.clone()),
            geometry: feature.geometry.clone(),
        }
    }
}

/// Decode a FeatureCollection. The first malformed feature aborts the import.
pub fn decode_feature_collection(json: &str) -> Result<Vec<Feature>, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let type_name = value.get("type").and_then(|t| t.as_str()).unwrap_or("");
    if type_name != "FeatureCollection" {
        let found = if type_name.is_empty() {
            "no type".to_string()
        } else {
            format!("\"{}\"", type_name)
        };
        return Err(DecodeError::NotAFeatureCollection { found });
    }

    let Some(features) = value.get("features").and_then(|f| f.as_array()) else {
        return Err(DecodeError::NotAFeatureCollection {
            found: "a collection without a features array".to_string(),
        });
    };

    features
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let record: FeatureRecord = serde_json::from_value(raw.clone()).map_err(|e| {
                DecodeError::InvalidFeature {
                    index,
                    message: e.to_string(),
                }
            })?;
            record.into_feature(index)
        })
        .collect()
}

/// Encode features as a pretty-printed FeatureCollection
pub fn encode_feature_collection(features: &[Feature]) -> Result<String, serde_json::Error> {
    let collection = FeatureCollectionRecord {
        type_field: "FeatureCollection",
        features: features.iter().map(FeatureRecord::from).collect(),
    };
    serde_json::to_string_pretty(&collection)
}
