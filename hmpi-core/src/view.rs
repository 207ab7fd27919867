//! Dataset-wide projection shared by every renderer.
//!
//! A [`DatasetView`] is computed once per dataset: metric discovery, one
//! series per sample and the per-metric maxima used for color scales.
//! It is never patched; a new dataset means a new view.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::classify::{Classifier, SeverityTier};
use crate::metric::MetricId;
use crate::sample::{Location, Sample, SampleId};
use crate::schema::discover;
use crate::series::{MetricSeriesEntry, SeriesBuilder};
use crate::thresholds::ThresholdTable;

/// Prebuilt series of one sample plus the fields renderers show beside it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSeries {
    id: SampleId,
    location: Location,
    pollution_index: Option<f64>,
    entries: Arc<[MetricSeriesEntry]>,
}

impl SampleSeries {
    pub fn id(&self) -> &SampleId {
        &self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn pollution_index(&self) -> Option<f64> {
        self.pollution_index
    }

    pub fn entries(&self) -> &[MetricSeriesEntry] {
        &self.entries
    }

    /// Highest tier across the series, `Safe` for an empty one.
    pub fn worst_tier(&self) -> SeverityTier {
        self.entries
            .iter()
            .map(|e| e.tier)
            .max()
            .unwrap_or(SeverityTier::Safe)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatasetView {
    metrics: Arc<[MetricId]>,
    limits: Vec<Option<f64>>,
    maxima: Vec<f64>,
    rows: Vec<SampleSeries>,
    index: HashMap<SampleId, usize>,
    classifier: Classifier,
}

impl DatasetView {
    pub fn project(samples: &[Sample], thresholds: &ThresholdTable) -> Self {
        DatasetView::project_with(samples, thresholds, Classifier::default())
    }

    pub fn project_with(
        samples: &[Sample],
        thresholds: &ThresholdTable,
        classifier: Classifier,
    ) -> Self {
        let metrics: Arc<[MetricId]> = discover(samples).into();
        let builder = SeriesBuilder::new(&metrics, thresholds).with_classifier(classifier);
        let limits = builder.limits().to_vec();

        let rows: Vec<SampleSeries> = samples
            .iter()
            .map(|s| SampleSeries {
                id: s.id().clone(),
                location: s.location(),
                pollution_index: s.pollution_index(),
                entries: builder.build(s).into(),
            })
            .collect();

        // Seed with the limit so a scale never collapses below regulation.
        let mut maxima: Vec<f64> = limits.iter().map(|l| l.unwrap_or(0.0)).collect();
        for row in &rows {
            for (max, entry) in maxima.iter_mut().zip(row.entries.iter()) {
                *max = max.max(entry.value);
            }
        }

        let index = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        debug!(
            samples = rows.len(),
            metrics = metrics.len(),
            "projected dataset view"
        );
        DatasetView {
            metrics,
            limits,
            maxima,
            rows,
            index,
            classifier,
        }
    }

    /// Canonical column order for every renderer.
    pub fn metrics(&self) -> &[MetricId] {
        &self.metrics
    }

    pub fn metric_position(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m.as_str() == metric)
    }

    /// Limits aligned with [`DatasetView::metrics`].
    pub fn limits(&self) -> &[Option<f64>] {
        &self.limits
    }

    /// `max(limit, largest observed value)` per metric, aligned with
    /// [`DatasetView::metrics`]. Zero only for an unregulated metric that
    /// every sample reports as zero.
    pub fn maxima(&self) -> &[f64] {
        &self.maxima
    }

    pub fn max_for(&self, metric: &str) -> Option<f64> {
        self.metric_position(metric).map(|i| self.maxima[i])
    }

    pub fn rows(&self) -> &[SampleSeries] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&SampleSeries> {
        self.rows.get(index)
    }

    pub fn sample(&self, id: &str) -> Option<&SampleSeries> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn series(&self, id: &str) -> Option<&[MetricSeriesEntry]> {
        self.sample(id).map(SampleSeries::entries)
    }

    pub fn classifier(&self) -> Classifier {
        self.classifier
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Holds the view of the current dataset and rebuilds it only when the
/// sample sequence, the threshold table or the classifier changes identity.
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(Arc<[Sample]>, Arc<ThresholdTable>, Classifier)>,
    view: Option<Arc<DatasetView>>,
}

impl ViewCache {
    pub fn new() -> Self {
        ViewCache::default()
    }

    pub fn get_or_project(
        &mut self,
        samples: &Arc<[Sample]>,
        thresholds: &Arc<ThresholdTable>,
        classifier: Classifier,
    ) -> Arc<DatasetView> {
        if let (Some((s, t, c)), Some(view)) = (&self.key, &self.view)
            && Arc::ptr_eq(s, samples)
            && Arc::ptr_eq(t, thresholds)
            && *c == classifier
        {
            return Arc::clone(view);
        }
        let view = Arc::new(DatasetView::project_with(samples, thresholds, classifier));
        self.key = Some((Arc::clone(samples), Arc::clone(thresholds), classifier));
        self.view = Some(Arc::clone(&view));
        view
    }

    pub fn current(&self) -> Option<Arc<DatasetView>> {
        self.view.clone()
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.view = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Vec<Sample> {
        vec![
            Sample::new("S1")
                .with_observation("Cu", 1.0)
                .with_observation("Pb", 0.06),
            Sample::new("S2").with_observation("Cu", 2.5),
            Sample::new("S3")
                .with_observation("Cu", 1.8)
                .with_observation("Fe", 0.0),
        ]
    }

    #[test]
    fn maxima_take_limit_and_observations() {
        let view = DatasetView::project(&dataset(), &ThresholdTable::who());
        assert_eq!(view.max_for("Cu"), Some(2.5));
        assert_eq!(view.max_for("Pb"), Some(0.06));
        assert_eq!(view.max_for("Fe"), Some(0.0));
        assert_eq!(view.max_for("Zn"), None);
    }

    #[test]
    fn maximum_never_drops_below_limit() {
        let samples = vec![Sample::new("S1").with_observation("Zn", 0.5)];
        let view = DatasetView::project(&samples, &ThresholdTable::who());
        assert_eq!(view.max_for("Zn"), Some(3.0));
    }

    #[test]
    fn lookup_by_sample_id() {
        let view = DatasetView::project(&dataset(), &ThresholdTable::who());
        assert_eq!(view.row_index("S2"), Some(1));
        let s2 = view.series("S2").unwrap();
        assert_eq!(s2.len(), view.metrics().len());
        assert_eq!(s2[1].value, 0.0);
        assert!(view.sample("S9").is_none());
    }

    #[test]
    fn worst_tier_spans_the_row() {
        let view = DatasetView::project(&dataset(), &ThresholdTable::who());
        assert_eq!(view.rows()[0].worst_tier(), SeverityTier::Exceeded);
        assert_eq!(view.rows()[1].worst_tier(), SeverityTier::Exceeded);
        assert_eq!(view.rows()[2].worst_tier(), SeverityTier::Elevated);
        let empty = DatasetView::project(&[Sample::new("S1")], &ThresholdTable::who());
        assert_eq!(empty.rows()[0].worst_tier(), SeverityTier::Safe);
    }

    #[test]
    fn cache_reuses_view_until_identity_changes() {
        let samples: Arc<[Sample]> = dataset().into();
        let thresholds = Arc::new(ThresholdTable::who());
        let mut cache = ViewCache::new();

        let a = cache.get_or_project(&samples, &thresholds, Classifier::default());
        let b = cache.get_or_project(&samples, &thresholds, Classifier::default());
        assert!(Arc::ptr_eq(&a, &b));

        let same_content: Arc<[Sample]> = dataset().into();
        let c = cache.get_or_project(&same_content, &thresholds, Classifier::default());
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(*a, *c);

        let d = cache.get_or_project(&same_content, &thresholds, Classifier::new(0.7).unwrap());
        assert!(!Arc::ptr_eq(&c, &d));

        cache.invalidate();
        assert!(cache.current().is_none());
    }
}
