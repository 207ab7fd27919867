use std::collections::HashSet;

use tracing::debug;

use crate::metric::MetricId;
use crate::sample::Sample;

/// Ordered set of metrics present anywhere in `samples`.
///
/// Order is first occurrence: samples in sequence, readings in the order
/// each sample reported them. The same input always yields the same list,
/// and an empty dataset yields an empty list.
pub fn discover(samples: &[Sample]) -> Vec<MetricId> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut metrics = Vec::new();
    for sample in samples {
        for (metric, _) in sample.observations().iter() {
            if seen.insert(metric.as_str()) {
                metrics.push(metric.clone());
            }
        }
    }
    debug!(
        samples = samples.len(),
        metrics = metrics.len(),
        "discovered metric columns"
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(metrics: &[MetricId]) -> Vec<&str> {
        metrics.iter().map(MetricId::as_str).collect()
    }

    #[test]
    fn first_seen_order_not_lexical() {
        let samples = vec![
            Sample::new("S1").with_observation("Zn", 1.0),
            Sample::new("S2")
                .with_observation("Pb", 0.01)
                .with_observation("Zn", 2.0)
                .with_observation("As", 0.002),
            Sample::new("S3").with_observation("Cd", 0.001),
        ];
        assert_eq!(ids(&discover(&samples)), ["Zn", "Pb", "As", "Cd"]);
    }

    #[test]
    fn samples_without_readings_contribute_nothing() {
        let samples = vec![
            Sample::new("S1"),
            Sample::new("S2").with_observation("Cu", 1.0),
        ];
        assert_eq!(ids(&discover(&samples)), ["Cu"]);
    }

    #[test]
    fn empty_dataset_has_no_metrics() {
        assert!(discover(&[]).is_empty());
    }

    #[test]
    fn metrics_without_limits_are_still_discovered() {
        let samples = vec![Sample::new("S1").with_observation("Fe", 0.4)];
        assert_eq!(ids(&discover(&samples)), ["Fe"]);
    }
}
