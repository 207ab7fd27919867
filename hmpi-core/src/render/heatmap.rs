//! Heatmap cells normalized against the dataset-wide per-metric maxima.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::classify::SeverityTier;
use crate::metric::MetricId;
use crate::view::DatasetView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `value / max` clamped to `[0, 1]`; 0 when the column maximum is not positive.
pub fn intensity(value: f64, max: f64) -> f64 {
    if !(max > 0.0) || !value.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// Red channel follows intensity, green and blue are fixed.
pub fn heat_color(intensity: f64) -> Rgb {
    let red = (255.0 * intensity.clamp(0.0, 1.0)).floor() as u8;
    Rgb(red, 100, 150)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatCell {
    pub metric: MetricId,
    pub value: f64,
    pub intensity: f64,
    pub color: Rgb,
    pub tier: SeverityTier,
}

/// Cells for one row of the view, in column order.
pub fn sample_heatmap(view: &DatasetView, row: usize) -> Option<Vec<HeatCell>> {
    let series = view.row(row)?;
    let cells = series
        .entries()
        .iter()
        .zip(view.maxima())
        .map(|(entry, &max)| {
            let i = intensity(entry.value, max);
            HeatCell {
                metric: entry.metric.clone(),
                value: entry.value,
                intensity: i,
                color: heat_color(i),
                tier: entry.tier,
            }
        })
        .collect();
    Some(cells)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatGrid {
    pub rows: Vec<String>,
    pub columns: Vec<MetricId>,
    pub cells: Vec<Vec<HeatCell>>,
}

impl HeatGrid {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&HeatCell> {
        self.cells.get(row)?.get(col)
    }
}

/// Samples by metrics.
pub fn dataset_heatmap(view: &DatasetView) -> HeatGrid {
    let cells = (0..view.len())
        .filter_map(|row| sample_heatmap(view, row))
        .collect();
    HeatGrid {
        rows: view.rows().iter().map(|r| r.id().to_string()).collect(),
        columns: view.metrics().to_vec(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::thresholds::ThresholdTable;

    #[test]
    fn intensity_is_relative_to_column_max() {
        assert_eq!(intensity(0.025, 0.05), 0.5);
        assert_eq!(intensity(0.05, 0.05), 1.0);
        assert_eq!(intensity(0.0, 0.0), 0.0);
        assert_eq!(intensity(3.0, 0.0), 0.0);
    }

    #[test]
    fn color_ramp() {
        assert_eq!(heat_color(0.0).to_string(), "rgb(0, 100, 150)");
        assert_eq!(heat_color(0.5).to_string(), "rgb(127, 100, 150)");
        assert_eq!(heat_color(1.0).to_string(), "rgb(255, 100, 150)");
    }

    #[test]
    fn grid_follows_view_order() {
        let samples = vec![
            Sample::new("A").with_observation("Pb", 0.5).with_observation("Zn", 1.5),
            Sample::new("B").with_observation("Pb", 1.0),
        ];
        let view = DatasetView::project(&samples, &ThresholdTable::who());
        let grid = dataset_heatmap(&view);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.cell(0, 0).map(|c| c.intensity), Some(0.5));
        assert_eq!(grid.cell(1, 0).map(|c| c.intensity), Some(1.0));
        // Zn scale is floored at its limit of 3
        assert_eq!(grid.cell(0, 1).map(|c| c.intensity), Some(0.5));
        // B has no Zn reading: zero
        assert_eq!(grid.cell(1, 1).map(|c| c.value), Some(0.0));
        assert_eq!(grid.cell(1, 1).map(|c| c.intensity), Some(0.0));
    }

    #[test]
    fn out_of_range_row() {
        let view = DatasetView::project(&[], &ThresholdTable::who());
        assert!(sample_heatmap(&view, 0).is_none());
    }
}
