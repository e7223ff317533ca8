#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary layer and per-area count types.
//!
//! A boundary layer is one classification of space (protected areas,
//! cantons, provinces). Layers are configured in TOML
//! ([`BoundaryLayerDefinition`]), loaded into [`BoundaryLayer`]s, and
//! aggregated into [`LayerAggregation`]s. Layers never share state: a
//! point may sit inside polygons of several layers at once.

use std::collections::BTreeMap;
use std::path::PathBuf;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// A boundary layer data file, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryLayerDefinition {
    /// Unique layer identifier (e.g. `"provinces"`). Also used as the
    /// output file stem.
    pub id: String,
    /// Human-readable layer name (e.g. "Provincias").
    pub name: String,
    /// `GeoJSON` file path. Relative paths resolve against the data
    /// directory.
    pub path: PathBuf,
    /// Which feature properties hold the join code and display name.
    pub fields: BoundaryFieldMapping,
}

/// Property names to read from each boundary feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryFieldMapping {
    /// Property holding the unique join code (e.g. `"codigo"`).
    pub code: String,
    /// Property holding the display name (e.g. `"nombre_asp"`).
    pub name: String,
}

/// A user-supplied layer config file: a `[[layers]]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayersConfig {
    /// Layer definitions in display order.
    pub layers: Vec<BoundaryLayerDefinition>,
}

/// One polygon feature of a boundary layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    /// Join code, unique within the layer.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Geometry in WGS84 longitude/latitude. Single polygons are stored as
    /// one-member multi-polygons.
    pub geometry: MultiPolygon<f64>,
}

/// A loaded boundary layer. Polygons keep the order of the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayer {
    /// Layer identifier.
    pub id: String,
    /// Human-readable layer name.
    pub name: String,
    /// Polygons in file order.
    pub polygons: Vec<BoundaryPolygon>,
}

impl BoundaryLayer {
    /// Number of polygons in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Whether the layer has no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Occurrence count for a single boundary polygon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCount {
    /// Polygon join code.
    pub code: String,
    /// Polygon display name.
    pub name: String,
    /// Number of occurrence points inside the polygon.
    pub count: u64,
}

/// Per-polygon occurrence counts for one boundary layer.
///
/// Holds one row per polygon of the layer, in layer order, including
/// polygons with a count of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerAggregation {
    /// Layer identifier.
    pub layer_id: String,
    /// Human-readable layer name.
    pub layer_name: String,
    /// One entry per polygon, in layer order.
    pub areas: Vec<AreaCount>,
    /// Points considered that fell inside no polygon of the layer.
    pub unmatched_points: u64,
}

impl LayerAggregation {
    /// Code to count mapping covering every polygon of the layer.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<&str, u64> {
        self.areas
            .iter()
            .map(|a| (a.code.as_str(), a.count))
            .collect()
    }

    /// Count for a single polygon code.
    #[must_use]
    pub fn count_for(&self, code: &str) -> Option<u64> {
        self.areas.iter().find(|a| a.code == code).map(|a| a.count)
    }

    /// Sum of all per-polygon counts. Exceeds the number of matched points
    /// when polygons overlap.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.areas.iter().map(|a| a.count).sum()
    }

    /// Only the polygons with at least one point, in layer order.
    pub fn nonzero(&self) -> impl Iterator<Item = &AreaCount> {
        self.areas.iter().filter(|a| a.count > 0)
    }
}
