//! Normalized lookup output in GeoJSON-like format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::LookupLevel;
use crate::error::LookupError;

/// A WGS84 point (decimal degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting anything outside WGS84 bounds.
    pub fn new(lat: f64, lng: f64) -> Result<Self, LookupError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if !(lat_ok && lng_ok) {
            return Err(LookupError::InvalidInput);
        }
        Ok(Self { lat, lng })
    }

    /// Parse raw query values. Both must be present and numeric.
    pub fn parse(raw_lat: Option<&str>, raw_lng: Option<&str>) -> Result<Self, LookupError> {
        let lat = parse_degrees(raw_lat)?;
        let lng = parse_degrees(raw_lng)?;
        Self::new(lat, lng)
    }
}

fn parse_degrees(raw: Option<&str>) -> Result<f64, LookupError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or(LookupError::InvalidInput)
}

/// Resolved hydrologic unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HucInfo {
    /// HUC identifier, never empty
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Diagnostic passthrough; `sourceFields` holds the raw upstream attributes
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// GeoJSON Polygon geometry.
///
/// Ring 0 is the outer boundary, the rest are holes. Positions are kept
/// exactly as the upstream sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub geo_type: String,
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

impl PolygonGeometry {
    pub fn new(rings: Vec<Vec<Vec<f64>>>) -> Self {
        Self {
            geo_type: "Polygon".to_string(),
            coordinates: rings,
        }
    }

    pub fn outer_ring(&self) -> Option<&Vec<Vec<f64>>> {
        self.coordinates.first()
    }

    pub fn holes(&self) -> &[Vec<Vec<f64>>] {
        self.coordinates.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub huc: String,
    pub level: LookupLevel,
}

/// GeoJSON `Feature<Polygon>` for the matched boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HucFeature {
    #[serde(rename = "type")]
    pub feature_type: String,
    /// `[minX, minY, maxX, maxY]` of the outer ring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    pub properties: FeatureProperties,
    pub geometry: PolygonGeometry,
}

impl HucFeature {
    pub fn new(code: &str, level: &LookupLevel, geometry: PolygonGeometry) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            bbox: None,
            properties: FeatureProperties {
                huc: code.to_string(),
                level: level.clone(),
            },
            geometry,
        }
    }
}

/// Where the answer came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub provider: String,
    pub layer: String,
}

/// Complete lookup payload returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HucResult {
    pub query: Coordinate,
    pub level: LookupLevel,
    pub huc: HucInfo,
    pub geometry: HucFeature,
    pub source: SourceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_bounds_are_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_coordinate_out_of_range() {
        assert_eq!(Coordinate::new(90.0001, 0.0), Err(LookupError::InvalidInput));
        assert_eq!(Coordinate::new(0.0, -180.5), Err(LookupError::InvalidInput));
        assert_eq!(Coordinate::new(f64::NAN, 0.0), Err(LookupError::InvalidInput));
    }

    #[test]
    fn test_parse_rejects_missing_or_garbage() {
        assert!(Coordinate::parse(None, Some("1.0")).is_err());
        assert!(Coordinate::parse(Some("1.0"), None).is_err());
        assert!(Coordinate::parse(Some("abc"), Some("1.0")).is_err());
        assert!(Coordinate::parse(Some(""), Some("1.0")).is_err());
        assert!(Coordinate::parse(Some("inf"), Some("1.0")).is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let c = Coordinate::parse(Some(" 42.2808 "), Some("-83.7430")).unwrap();
        assert_eq!(c.lat, 42.2808);
        assert_eq!(c.lng, -83.743);
    }

    #[test]
    fn test_huc_info_omits_missing_name() {
        let info = HucInfo {
            code: "04090005".to_string(),
            name: None,
            extra: Map::new(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_polygon_holes() {
        let outer = vec![vec![0.0, 0.0], vec![0.0, 4.0], vec![4.0, 4.0], vec![0.0, 0.0]];
        let hole = vec![vec![1.0, 1.0], vec![1.0, 2.0], vec![2.0, 2.0], vec![1.0, 1.0]];
        let polygon = PolygonGeometry::new(vec![outer.clone(), hole.clone()]);
        assert_eq!(polygon.outer_ring(), Some(&outer));
        assert_eq!(polygon.holes(), &[hole]);
    }
}
