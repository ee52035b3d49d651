//! HTTP client for the watershed boundary query endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::{normalize_response, HucSource, QueryResponse};
use crate::config::UpstreamConfig;
use crate::error::LookupError;
use crate::models::{Coordinate, HucResult, LookupLevel};

/// Replaced with the layer id for the requested level
pub const LAYER_PLACEHOLDER: &str = "{layer}";

/// WGS84
const SPATIAL_REFERENCE: &str = "4326";

/// Percent-encode the layer token so it fills exactly one path segment.
///
/// Dot segments are refused outright: the URL parser resolves `.`, `..` and
/// their `%2e` spellings, which would move the request off the endpoint.
fn encode_layer(level: &LookupLevel) -> Result<String, LookupError> {
    let layer = urlencoding::encode(level.layer_token()).into_owned();
    if layer.is_empty() || layer == "." || layer == ".." {
        return Err(LookupError::LookupFailed(format!(
            "level {:?} cannot be used as an upstream layer",
            level.as_str()
        )));
    }
    Ok(layer)
}

/// Build the point-intersects query for `coord` at `level`.
pub fn build_query_url(
    endpoint: &str,
    coord: &Coordinate,
    level: &LookupLevel,
    token: Option<&str>,
) -> Result<Url, LookupError> {
    let layer = encode_layer(level)?;
    let endpoint = endpoint.replace(LAYER_PLACEHOLDER, &layer);
    let mut url = Url::parse(&endpoint).map_err(|e| {
        LookupError::LookupFailed(format!("invalid upstream endpoint {}: {}", endpoint, e))
    })?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("geometry", &format!("{},{}", coord.lng, coord.lat))
            .append_pair("geometryType", "esriGeometryPoint")
            .append_pair("inSR", SPATIAL_REFERENCE)
            .append_pair("spatialRel", "esriSpatialRelIntersects")
            .append_pair("outFields", "*")
            .append_pair("returnGeometry", "true")
            .append_pair("outSR", SPATIAL_REFERENCE)
            .append_pair("f", "json");
        if let Some(token) = token {
            query.append_pair("token", token);
        }
    }

    Ok(url)
}

/// Queries the configured WBD endpoint
pub struct WbdClient {
    client: Client,
    config: UpstreamConfig,
}

impl WbdClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        // Fail fast on an endpoint that can never work
        let sample_url = config.url.replace(LAYER_PLACEHOLDER, "0");
        Url::parse(&sample_url).with_context(|| format!("Invalid upstream URL: {}", config.url))?;

        let client = Client::builder()
            .user_agent(concat!("hucmap/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl HucSource for WbdClient {
    async fn fetch_huc(
        &self,
        coord: Coordinate,
        level: &LookupLevel,
    ) -> Result<HucResult, LookupError> {
        let url = build_query_url(
            &self.config.url,
            &coord,
            level,
            self.config.token.as_deref(),
        )?;

        debug!(
            "Querying upstream layer {} for ({}, {})",
            level.layer_token(),
            coord.lat,
            coord.lng
        );

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream query failed with status {}", status);
            return Err(LookupError::LookupFailed(format!(
                "upstream returned HTTP {}",
                status
            )));
        }

        let body: QueryResponse = response.json().await?;
        debug!(
            "Upstream returned {} features",
            body.features.as_ref().map_or(0, Vec::len)
        );

        normalize_response(coord, level, body)
    }
}
