//! Boundary layer registry.
//!
//! The default layers are TOML configs in `packages/geography/layers/`,
//! baked into the binary via [`include_str!`]. A user config file with a
//! `[[layers]]` array replaces the defaults entirely.

use std::collections::BTreeSet;
use std::path::Path;

use biodiversity_map_geography_models::{BoundaryLayerDefinition, LayersConfig};

use crate::GeoError;

/// Number of default layers. Enforced by a test.
#[cfg(test)]
const EXPECTED_LAYER_COUNT: usize = 3;

/// Embedded default layer definitions, in display order.
const LAYER_TOMLS: &[(&str, &str)] = &[
    (
        "protected_areas",
        include_str!("../layers/protected_areas.toml"),
    ),
    ("provinces", include_str!("../layers/provinces.toml")),
    ("cantons", include_str!("../layers/cantons.toml")),
];

/// Returns the default layer definitions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. These are compile-time
/// constants, so a failure is a development error caught by the tests.
#[must_use]
pub fn default_layers() -> Vec<BoundaryLayerDefinition> {
    LAYER_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse layer config '{name}': {e}"))
        })
        .collect()
}

/// Parses a user layer config (a `[[layers]]` array).
///
/// # Errors
///
/// Returns [`GeoError::Config`] for malformed TOML and
/// [`GeoError::DuplicateLayer`] if two layers share an id.
pub fn parse_layers_config(toml_str: &str) -> Result<Vec<BoundaryLayerDefinition>, GeoError> {
    let config: LayersConfig = toml::de::from_str(toml_str)?;
    ensure_unique_ids(&config.layers)?;
    Ok(config.layers)
}

/// Reads the layer config at `path`, or returns the defaults when no path
/// is given.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read or parsed.
pub fn layer_definitions(path: Option<&Path>) -> Result<Vec<BoundaryLayerDefinition>, GeoError> {
    let Some(path) = path else {
        return Ok(default_layers());
    };

    log::info!("Loading layer config from {}", path.display());
    let toml_str = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layers_config(&toml_str)
}

fn ensure_unique_ids(layers: &[BoundaryLayerDefinition]) -> Result<(), GeoError> {
    let mut seen = BTreeSet::new();
    for layer in layers {
        if !seen.insert(layer.id.as_str()) {
            return Err(GeoError::DuplicateLayer {
                id: layer.id.clone(),
            });
        }
    }
    Ok(())
}
