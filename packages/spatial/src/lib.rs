#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-in-polygon aggregation for boundary layers.
//!
//! A [`LayerIndex`] wraps one [`BoundaryLayer`] in an R-tree of polygon
//! bounding boxes. Counting a set of occurrence points against it yields a
//! [`LayerAggregation`] with one row per polygon, zero counts included.
//!
//! A point belongs to a polygon when it lies in the polygon's interior or on
//! its boundary. Points inside several overlapping polygons are counted for
//! each of them; points inside none are only tallied as unmatched. Each
//! layer gets its own index, so results for different layers never mix.

use biodiversity_map_geography_models::{AreaCount, BoundaryLayer, LayerAggregation};
use biodiversity_map_source::progress::ProgressCallback;
use geo::{BoundingRect as _, Intersects as _, Point};
use rstar::{AABB, RTree, RTreeObject};

/// Number of points between progress updates.
const PROGRESS_BATCH: u64 = 10_000;

/// A polygon's bounding box in the R-tree, pointing back into the layer.
struct BoundaryEntry {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for BoundaryEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over a single boundary layer.
pub struct LayerIndex {
    layer: BoundaryLayer,
    tree: RTree<BoundaryEntry>,
}

impl LayerIndex {
    /// Builds the R-tree for `layer`.
    ///
    /// Polygons without any coordinates have no bounding box and can never
    /// contain a point; they stay in the layer (and in every aggregation,
    /// with a count of zero) but are left out of the tree.
    #[must_use]
    pub fn new(layer: BoundaryLayer) -> Self {
        let entries: Vec<BoundaryEntry> = layer
            .polygons
            .iter()
            .enumerate()
            .filter_map(|(index, polygon)| {
                polygon.geometry.bounding_rect().map(|rect| BoundaryEntry {
                    index,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        if entries.len() < layer.polygons.len() {
            log::warn!(
                "Layer '{}': {} polygons have empty geometry",
                layer.id,
                layer.polygons.len() - entries.len()
            );
        }
        log::debug!(
            "Layer '{}': indexed {} polygons",
            layer.id,
            entries.len()
        );

        Self {
            layer,
            tree: RTree::bulk_load(entries),
        }
    }

    /// The indexed layer.
    #[must_use]
    pub const fn layer(&self) -> &BoundaryLayer {
        &self.layer
    }

    /// Positions (in layer order) of every polygon containing `point`.
    fn containing(&self, point: Point<f64>) -> impl Iterator<Item = usize> + '_ {
        let query_env = AABB::from_point([point.x(), point.y()]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(move |entry| self.layer.polygons[entry.index].geometry.intersects(&point))
            .map(|entry| entry.index)
    }

    /// Counts `points` per polygon.
    ///
    /// The result has one [`AreaCount`] per polygon in layer order, so
    /// polygons without points appear with a count of zero.
    #[must_use]
    pub fn aggregate<I>(&self, points: I, progress: &dyn ProgressCallback) -> LayerAggregation
    where
        I: IntoIterator<Item = Point<f64>>,
    {
        let mut counts = vec![0u64; self.layer.polygons.len()];
        let mut unmatched = 0u64;
        let mut processed = 0u64;

        progress.set_message(format!("Aggregating {}", self.layer.name));

        for point in points {
            let mut matched = false;
            for index in self.containing(point) {
                counts[index] += 1;
                matched = true;
            }
            if !matched {
                unmatched += 1;
            }

            processed += 1;
            if processed % PROGRESS_BATCH == 0 {
                progress.inc(PROGRESS_BATCH);
            }
        }
        progress.inc(processed % PROGRESS_BATCH);

        let areas: Vec<AreaCount> = self
            .layer
            .polygons
            .iter()
            .zip(counts)
            .map(|(polygon, count)| AreaCount {
                code: polygon.code.clone(),
                name: polygon.name.clone(),
                count,
            })
            .collect();

        log::info!(
            "Layer '{}': {} of {processed} points inside {} polygons ({unmatched} outside)",
            self.layer.id,
            processed - unmatched,
            areas.iter().filter(|a| a.count > 0).count()
        );

        LayerAggregation {
            layer_id: self.layer.id.clone(),
            layer_name: self.layer.name.clone(),
            areas,
            unmatched_points: unmatched,
        }
    }
}
