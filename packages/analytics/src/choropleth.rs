//! Equal-interval class breaks for choropleth maps.
//!
//! Edges are spaced evenly from the smallest to the largest count. When
//! every count is equal the range is widened by half a unit on each side
//! so that the single value still falls inside a class.

use biodiversity_map_analytics_models::ChoroplethScale;

/// Default number of choropleth classes.
pub const DEFAULT_CLASSES: usize = 8;

/// Builds an equal-interval scale over `counts`.
///
/// An empty input (or zero classes) gives a scale with no classes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn equal_interval(counts: impl IntoIterator<Item = u64>, classes: usize) -> ChoroplethScale {
    let (min, max) = counts
        .into_iter()
        .fold(None, |acc: Option<(u64, u64)>, c| {
            Some(acc.map_or((c, c), |(lo, hi)| (lo.min(c), hi.max(c))))
        })
        .unzip();

    let (Some(min), Some(max)) = (min, max) else {
        return ChoroplethScale::default();
    };
    if classes == 0 {
        return ChoroplethScale::default();
    }

    let (lo, hi) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let step = (hi - lo) / classes as f64;

    let mut edges: Vec<f64> = (0..classes).map(|i| (i as f64).mul_add(step, lo)).collect();
    edges.push(hi);

    ChoroplethScale { classes, edges }
}
