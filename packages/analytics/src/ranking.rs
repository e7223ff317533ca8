//! Ranked "top regions" view for bar and pie charts.

use biodiversity_map_geography_models::{AreaCount, LayerAggregation};

/// Default number of regions in the chart view.
pub const DEFAULT_TOP_N: usize = 15;

/// Polygons with at least one record, most records first, at most `limit`
/// of them. Ties keep layer order.
#[must_use]
pub fn top_areas(aggregation: &LayerAggregation, limit: usize) -> Vec<AreaCount> {
    let mut ranked: Vec<AreaCount> = aggregation.nonzero().cloned().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregation(counts: &[u64]) -> LayerAggregation {
        LayerAggregation {
            layer_id: "asp".to_string(),
            layer_name: "ASP".to_string(),
            areas: counts
                .iter()
                .enumerate()
                .map(|(i, &count)| AreaCount {
                    code: format!("A{i}"),
                    name: format!("Area {i}"),
                    count,
                })
                .collect(),
            unmatched_points: 0,
        }
    }

    #[test]
    fn drops_zero_counts_and_sorts_descending() {
        let top = top_areas(&aggregation(&[2, 0, 5, 1, 0]), DEFAULT_TOP_N);
        let counts: Vec<u64> = top.iter().map(|a| a.count).collect();
        assert_eq!(counts, vec![5, 2, 1]);
    }

    #[test]
    fn caps_at_limit() {
        let counts: Vec<u64> = (1..=20).collect();
        let top = top_areas(&aggregation(&counts), DEFAULT_TOP_N);
        assert_eq!(top.len(), 15);
        assert_eq!(top[0].count, 20);
        assert_eq!(top[14].count, 6);
    }

    #[test]
    fn ties_keep_layer_order() {
        let top = top_areas(&aggregation(&[3, 3, 7, 3]), DEFAULT_TOP_N);
        let codes: Vec<&str> = top.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["A2", "A0", "A1", "A3"]);
    }

    #[test]
    fn is_subset_of_full_result() {
        let agg = aggregation(&[4, 0, 9, 2, 0, 1]);
        for area in top_areas(&agg, 3) {
            assert_eq!(agg.count_for(&area.code), Some(area.count));
            assert!(area.count > 0);
        }
    }

    #[test]
    fn all_zero_layer_has_empty_view() {
        assert!(top_areas(&aggregation(&[0, 0, 0]), DEFAULT_TOP_N).is_empty());
    }
}
