//! Dataset-level tier counts.

use serde::Serialize;

use crate::classify::SeverityTier;
use crate::metric::MetricId;
use crate::view::DatasetView;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub safe: usize,
    pub elevated: usize,
    pub exceeded: usize,
}

impl TierCounts {
    pub fn add(&mut self, tier: SeverityTier) {
        match tier {
            SeverityTier::Safe => self.safe += 1,
            SeverityTier::Elevated => self.elevated += 1,
            SeverityTier::Exceeded => self.exceeded += 1,
        }
    }

    pub fn get(&self, tier: SeverityTier) -> usize {
        match tier {
            SeverityTier::Safe => self.safe,
            SeverityTier::Elevated => self.elevated,
            SeverityTier::Exceeded => self.exceeded,
        }
    }

    pub fn total(&self) -> usize {
        self.safe + self.elevated + self.exceeded
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: MetricId,
    pub limit: Option<f64>,
    pub max: f64,
    pub tiers: TierCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub samples: usize,
    pub metrics: Vec<MetricSummary>,
    /// `(min, max)` over samples that carry an index.
    pub pollution_index_range: Option<(f64, f64)>,
    /// Samples with at least one `Exceeded` reading.
    pub samples_exceeding: usize,
}

pub fn summarize(view: &DatasetView) -> DatasetSummary {
    let mut metrics: Vec<MetricSummary> = view
        .metrics()
        .iter()
        .zip(view.limits())
        .zip(view.maxima())
        .map(|((metric, &limit), &max)| MetricSummary {
            metric: metric.clone(),
            limit,
            max,
            tiers: TierCounts::default(),
        })
        .collect();

    let mut range: Option<(f64, f64)> = None;
    let mut samples_exceeding = 0;
    for row in view.rows() {
        for (summary, entry) in metrics.iter_mut().zip(row.entries()) {
            summary.tiers.add(entry.tier);
        }
        if row.worst_tier() == SeverityTier::Exceeded {
            samples_exceeding += 1;
        }
        if let Some(hmpi) = row.pollution_index() {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(hmpi), hi.max(hmpi)),
                None => (hmpi, hmpi),
            });
        }
    }

    DatasetSummary {
        samples: view.len(),
        metrics,
        pollution_index_range: range,
        samples_exceeding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::thresholds::ThresholdTable;

    #[test]
    fn counts_tiers_per_metric() {
        let samples = vec![
            Sample::new("S1").with_observation("Cu", 1.0).with_pollution_index(12.5),
            Sample::new("S2").with_observation("Cu", 2.5),
            Sample::new("S3").with_observation("Cu", 1.8).with_pollution_index(80.0),
        ];
        let view = DatasetView::project(&samples, &ThresholdTable::who());
        let s = summarize(&view);
        assert_eq!(s.samples, 3);
        assert_eq!(s.metrics.len(), 1);
        let cu = &s.metrics[0];
        assert_eq!(cu.max, 2.5);
        assert_eq!(cu.tiers, TierCounts { safe: 1, elevated: 1, exceeded: 1 });
        assert_eq!(cu.tiers.total(), 3);
        assert_eq!(s.samples_exceeding, 1);
        assert_eq!(s.pollution_index_range, Some((12.5, 80.0)));
    }

    #[test]
    fn empty_dataset() {
        let view = DatasetView::project(&[], &ThresholdTable::who());
        let s = summarize(&view);
        assert_eq!(s.samples, 0);
        assert!(s.metrics.is_empty());
        assert_eq!(s.pollution_index_range, None);
    }
}
