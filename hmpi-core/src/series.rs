use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, SeverityTier};
use crate::metric::MetricId;
use crate::sample::Sample;
use crate::thresholds::ThresholdTable;

/// One (metric, value, limit, tier) tuple; the unit every renderer consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSeriesEntry {
    pub metric: MetricId,
    /// Observed concentration; `0` when the sample did not report the metric.
    pub value: f64,
    /// Regulatory limit, `None` when the metric is not in the threshold table.
    pub limit: Option<f64>,
    pub tier: SeverityTier,
}

/// Builds series for many samples against one metric list.
///
/// Limits are looked up once per metric, not once per cell.
#[derive(Clone, Debug)]
pub struct SeriesBuilder<'a> {
    metrics: &'a [MetricId],
    limits: Vec<Option<f64>>,
    classifier: Classifier,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(metrics: &'a [MetricId], thresholds: &ThresholdTable) -> Self {
        SeriesBuilder {
            metrics,
            limits: metrics.iter().map(|m| thresholds.limit(m.as_str())).collect(),
            classifier: Classifier::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn limits(&self) -> &[Option<f64>] {
        &self.limits
    }

    /// Entry `i` always describes `metrics[i]`.
    pub fn build(&self, sample: &Sample) -> Vec<MetricSeriesEntry> {
        self.metrics
            .iter()
            .zip(&self.limits)
            .map(|(metric, &limit)| {
                let value = sample.value(metric.as_str()).unwrap_or(0.0);
                MetricSeriesEntry {
                    metric: metric.clone(),
                    value,
                    limit,
                    tier: self.classifier.classify(value, limit),
                }
            })
            .collect()
    }
}

/// Series for a single sample with the default classifier.
pub fn build(
    sample: &Sample,
    metrics: &[MetricId],
    thresholds: &ThresholdTable,
) -> Vec<MetricSeriesEntry> {
    SeriesBuilder::new(metrics, thresholds).build(sample)
}
