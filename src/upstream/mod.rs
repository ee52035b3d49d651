//! Upstream watershed boundary query and response normalization.
//!
//! Queries an ArcGIS-style `query` endpoint (USGS WBD by default) for the
//! polygon intersecting a point, then maps the provider-specific feature onto
//! the fixed [`HucResult`] schema.

mod client;
pub mod fields;
pub mod geometry;
pub mod response;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::LookupError;
use crate::models::{Coordinate, HucFeature, HucInfo, HucResult, LookupLevel, SourceInfo};

pub use client::{build_query_url, WbdClient, LAYER_PLACEHOLDER};
pub use response::{QueryResponse, UpstreamFeature};

pub const SOURCE_PROVIDER: &str = "USGS The National Map";
pub const SOURCE_LAYER: &str = "Watershed Boundary Dataset (WBD)";

/// Anything that can resolve a point to a hydrologic unit
#[async_trait]
pub trait HucSource: Send + Sync {
    async fn fetch_huc(
        &self,
        coord: Coordinate,
        level: &LookupLevel,
    ) -> Result<HucResult, LookupError>;
}

/// Turn a parsed upstream response into a lookup result.
///
/// Only the first feature is used; boundaries at one level don't overlap.
pub fn normalize_response(
    coord: Coordinate,
    level: &LookupLevel,
    response: QueryResponse,
) -> Result<HucResult, LookupError> {
    if let Some(error) = response.error {
        return Err(LookupError::LookupFailed(error.to_string()));
    }

    let features = response.features.ok_or_else(|| {
        LookupError::LookupFailed("upstream response has no features member".to_string())
    })?;
    let first = features.into_iter().next().ok_or(LookupError::NotFound)?;
    let feature: UpstreamFeature = serde_json::from_value(first)
        .map_err(|e| LookupError::LookupFailed(format!("malformed upstream feature: {}", e)))?;

    normalize_feature(coord, level, feature)
}

pub fn normalize_feature(
    coord: Coordinate,
    level: &LookupLevel,
    feature: UpstreamFeature,
) -> Result<HucResult, LookupError> {
    let attributes = feature.attributes.unwrap_or_default();

    let code = fields::extract_code(&attributes, level).ok_or(LookupError::NotFound)?;
    let name = fields::extract_name(&attributes, level);

    let rings = feature.geometry.and_then(|g| g.rings);
    let polygon = geometry::rings_to_polygon(rings)?;

    if !geometry::contains_point(&polygon, &coord) {
        debug!(
            "HUC {} boundary does not contain ({}, {})",
            code, coord.lat, coord.lng
        );
    }

    let mut feature = HucFeature::new(&code, level, polygon);
    feature.bbox = geometry::outer_bbox(&feature.geometry);

    let mut extra = serde_json::Map::new();
    extra.insert("sourceFields".to_string(), Value::Object(attributes));

    Ok(HucResult {
        query: coord,
        level: level.clone(),
        huc: HucInfo { code, name, extra },
        geometry: feature,
        source: SourceInfo {
            provider: SOURCE_PROVIDER.to_string(),
            layer: SOURCE_LAYER.to_string(),
        },
    })
}
