//! Hydrologic unit granularity and its mapping onto upstream layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Level used when the caller does not ask for one.
pub const DEFAULT_LEVEL: &str = "12";

/// Hydrologic unit levels the WBD MapServer publishes as dedicated layers.
/// See: https://hydro.nationalmap.gov/arcgis/rest/services/wbd/MapServer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HucLevel {
    /// Subbasin (8-digit HUC)
    Huc8,
    /// Watershed (10-digit HUC)
    Huc10,
    /// Subwatershed (12-digit HUC)
    Huc12,
}

impl HucLevel {
    /// Parse the digit count used on the wire ("8", "10", "12")
    pub fn from_digits(digits: &str) -> Option<Self> {
        match digits {
            "8" => Some(HucLevel::Huc8),
            "10" => Some(HucLevel::Huc10),
            "12" => Some(HucLevel::Huc12),
            _ => None,
        }
    }

    pub fn digits(&self) -> &'static str {
        match self {
            HucLevel::Huc8 => "8",
            HucLevel::Huc10 => "10",
            HucLevel::Huc12 => "12",
        }
    }

    /// WBD MapServer layer id serving this level
    pub fn layer_id(&self) -> &'static str {
        match self {
            HucLevel::Huc8 => "4",
            HucLevel::Huc10 => "5",
            HucLevel::Huc12 => "6",
        }
    }

    /// All known levels, coarsest first
    pub fn all() -> &'static [HucLevel] {
        &[HucLevel::Huc8, HucLevel::Huc10, HucLevel::Huc12]
    }
}

/// Requested granularity as the caller sent it.
///
/// Levels outside [`HucLevel`] are kept verbatim and forwarded upstream, so a
/// layer the table doesn't know yet can still be queried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupLevel(String);

impl LookupLevel {
    /// Normalize a raw level: trimmed, empty or absent becomes [`DEFAULT_LEVEL`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(level) if !level.is_empty() => Self(level.to_string()),
            _ => Self(DEFAULT_LEVEL.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<HucLevel> {
        HucLevel::from_digits(&self.0)
    }

    /// Upstream layer token: the table entry, or the raw level when unknown
    pub fn layer_token(&self) -> &str {
        match self.known() {
            Some(level) => level.layer_id(),
            None => &self.0,
        }
    }
}

impl Default for LookupLevel {
    fn default() -> Self {
        Self(DEFAULT_LEVEL.to_string())
    }
}

impl From<HucLevel> for LookupLevel {
    fn from(level: HucLevel) -> Self {
        Self(level.digits().to_string())
    }
}

impl fmt::Display for LookupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
