//! Core data models for the HUC lookup service.

pub mod level;
pub mod result;

pub use level::{HucLevel, LookupLevel, DEFAULT_LEVEL};
pub use result::{
    Coordinate, FeatureProperties, HucFeature, HucInfo, HucResult, PolygonGeometry, SourceInfo,
};
