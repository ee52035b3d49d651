//! hucmap - Hydrologic Unit Code lookup for geographic points
//!
//! This library provides the lookup service shared by the `server` and `huc`
//! binaries: validation and caching in [`service`], the upstream watershed
//! boundary query and its normalization in [`upstream`].

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod upstream;

pub use error::LookupError;
pub use models::{Coordinate, HucLevel, HucResult, LookupLevel};
pub use service::HucLookupService;
