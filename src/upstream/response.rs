//! ArcGIS REST `query` response payloads.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Features stay as raw JSON; only the one actually used gets decoded.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    /// Absent on malformed replies, which is not the same as "no match"
    #[serde(default)]
    pub features: Option<Vec<Value>>,
    /// ArcGIS reports failures in-band, often with HTTP 200
    #[serde(default)]
    pub error: Option<UpstreamError>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamFeature {
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<UpstreamGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamGeometry {
    #[serde(default)]
    pub rings: Option<Vec<Vec<Vec<f64>>>>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamError {
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "upstream error {}: {}",
            self.code.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
            self.message.as_deref().unwrap_or("no message")
        )?;
        if !self.details.is_empty() {
            write!(f, " ({})", self.details.join("; "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_feature(response: &QueryResponse) -> UpstreamFeature {
        let features = response.features.as_ref().unwrap();
        serde_json::from_value(features[0].clone()).unwrap()
    }

    #[test]
    fn test_parse_feature() {
        let body = r#"{
            "displayFieldName": "name",
            "geometryType": "esriGeometryPolygon",
            "spatialReference": {"wkid": 4326},
            "features": [{
                "attributes": {"HUC12": "040900050102", "NAME": "Huron River"},
                "geometry": {"rings": [[[-83.75,42.27],[-83.73,42.27],[-83.73,42.29],[-83.75,42.27]]]}
            }]
        }"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.features.as_ref().unwrap().len(), 1);

        let feature = first_feature(&response);
        let attributes = feature.attributes.as_ref().unwrap();
        let keys: Vec<&String> = attributes.keys().collect();
        assert_eq!(keys, ["HUC12", "NAME"]);
        let rings = feature.geometry.as_ref().unwrap().rings.as_ref().unwrap();
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn test_parse_null_geometry_and_missing_features() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"features":[{"attributes":null,"geometry":null}]}"#).unwrap();
        let feature = first_feature(&response);
        assert!(feature.attributes.is_none());
        assert!(feature.geometry.is_none());

        let response: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.features.is_none());
    }

    #[test]
    fn test_later_features_are_not_decoded() {
        let body = r#"{"features":[
            {"attributes":{"HUC8":"1"},"geometry":{"rings":[[[0,0],[0,1],[1,1],[0,0]]]}},
            {"attributes":{"HUC8":"2"},"geometry":{"rings":"garbage"}}
        ]}"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.features.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":{"code":400,"message":"Invalid or missing input parameters.","details":["'geometry' parameter is invalid"]}}"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, Some(400));
        assert_eq!(
            error.to_string(),
            "upstream error 400: Invalid or missing input parameters. ('geometry' parameter is invalid)"
        );
    }
}
