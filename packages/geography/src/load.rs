//! `GeoJSON` boundary layer loading.
//!
//! Each feature becomes a [`BoundaryPolygon`] using the layer's
//! [`BoundaryFieldMapping`] to find its code and name. Features without a
//! code or without polygonal geometry are skipped with a warning; repeated
//! codes reject the whole layer.

use std::collections::BTreeSet;
use std::path::Path;

use biodiversity_map_geography_models::{
    BoundaryFieldMapping, BoundaryLayer, BoundaryLayerDefinition, BoundaryPolygon,
};
use geo::{BoundingRect as _, MultiPolygon, Rect};
use geojson::{Feature, GeoJson};

use crate::{GeoError, paths};

/// Loads every layer in `definitions`, in order.
///
/// # Errors
///
/// Returns the first [`GeoError`] encountered; no partial set is returned.
pub fn load_layers(
    definitions: &[BoundaryLayerDefinition],
    data_dir: &Path,
) -> Result<Vec<BoundaryLayer>, GeoError> {
    definitions
        .iter()
        .map(|def| load_layer(def, data_dir))
        .collect()
}

/// Reads and parses one layer file.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read, is not a `GeoJSON`
/// `FeatureCollection`, or contains duplicate codes.
pub fn load_layer(
    definition: &BoundaryLayerDefinition,
    data_dir: &Path,
) -> Result<BoundaryLayer, GeoError> {
    let path = paths::resolve(data_dir, &definition.path);
    log::info!("Loading layer '{}' from {}", definition.id, path.display());

    let geojson_str = std::fs::read_to_string(&path).map_err(|source| GeoError::Io {
        path: path.clone(),
        source,
    })?;
    parse_layer(definition, &geojson_str)
}

/// Parses a layer from `GeoJSON` text.
///
/// # Errors
///
/// Returns [`GeoError`] if the text is not a `GeoJSON` `FeatureCollection`
/// or contains duplicate codes.
pub fn parse_layer(
    definition: &BoundaryLayerDefinition,
    geojson_str: &str,
) -> Result<BoundaryLayer, GeoError> {
    let GeoJson::FeatureCollection(collection) = geojson_str.parse::<GeoJson>()? else {
        return Err(GeoError::NotFeatureCollection {
            layer: definition.id.clone(),
        });
    };

    let total = collection.features.len();
    let mut codes = BTreeSet::new();
    let mut polygons = Vec::with_capacity(total);

    for (idx, feature) in collection.features.into_iter().enumerate() {
        let Some(polygon) = normalize_feature(feature, &definition.fields) else {
            log::warn!(
                "Layer '{}': skipping feature {idx} (missing '{}' or non-polygon geometry)",
                definition.id,
                definition.fields.code
            );
            continue;
        };

        if !codes.insert(polygon.code.clone()) {
            return Err(GeoError::DuplicateCode {
                layer: definition.id.clone(),
                code: polygon.code,
            });
        }
        polygons.push(polygon);
    }

    warn_if_not_geographic(&definition.id, &polygons);
    log::info!(
        "Layer '{}': loaded {} of {total} features",
        definition.id,
        polygons.len()
    );

    Ok(BoundaryLayer {
        id: definition.id.clone(),
        name: definition.name.clone(),
        polygons,
    })
}

/// Normalizes a single feature. Returns `None` when it has no usable code
/// or geometry.
fn normalize_feature(feature: Feature, fields: &BoundaryFieldMapping) -> Option<BoundaryPolygon> {
    let code = feature.property(&fields.code).and_then(property_text)?;
    let name = feature
        .property(&fields.name)
        .and_then(property_text)
        .unwrap_or_else(|| code.clone());

    let geometry = to_multipolygon(feature.geometry?)?;

    Some(BoundaryPolygon {
        code,
        name,
        geometry,
    })
}

/// Reads a property as text. Numeric codes (e.g. `1`) are common in
/// administrative layers and are rendered without quotes.
fn property_text(value: &serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn to_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Logs a warning when a layer's extent cannot be longitude/latitude. The
/// layer is still used; points will simply not match it.
fn warn_if_not_geographic(layer: &str, polygons: &[BoundaryPolygon]) {
    let Some(extent) = layer_extent(polygons) else {
        return;
    };
    let (min, max) = (extent.min(), extent.max());
    if min.x < -180.0 || max.x > 180.0 || min.y < -90.0 || max.y > 90.0 {
        log::warn!(
            "Layer '{layer}' extent ({:.1}, {:.1}) - ({:.1}, {:.1}) is outside WGS84 \
             longitude/latitude; it is probably projected and will not match occurrence points",
            min.x,
            min.y,
            max.x,
            max.y
        );
    }
}

fn layer_extent(polygons: &[BoundaryPolygon]) -> Option<Rect<f64>> {
    polygons
        .iter()
        .filter_map(|p| p.geometry.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
}
