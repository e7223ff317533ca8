#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary layer configuration and loading.
//!
//! Layer definitions come from embedded TOML configs ([`registry`]) or a
//! user-supplied file. Each layer is a `GeoJSON` `FeatureCollection` read
//! from the data directory ([`paths`]) and normalized into code/name/polygon
//! triples ([`load`]). A layer whose join codes are not unique is rejected
//! outright.

pub mod load;
pub mod paths;
pub mod registry;

use std::path::PathBuf;

use thiserror::Error;

pub use load::{load_layer, load_layers, parse_layer};

/// Errors that can occur while configuring or loading boundary layers.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading a layer or config file failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The layer file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The layer config is not valid TOML.
    #[error("Layer config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The layer file parsed but is not a `FeatureCollection`.
    #[error("Layer '{layer}' is not a GeoJSON FeatureCollection")]
    NotFeatureCollection {
        /// Layer identifier.
        layer: String,
    },

    /// Two features of one layer share a join code.
    #[error("Layer '{layer}' has duplicate code '{code}'")]
    DuplicateCode {
        /// Layer identifier.
        layer: String,
        /// The repeated code.
        code: String,
    },

    /// Two layer definitions share an identifier.
    #[error("Duplicate layer id '{id}'")]
    DuplicateLayer {
        /// The repeated layer id.
        id: String,
    },
}
