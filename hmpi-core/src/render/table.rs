use std::cmp::Ordering;

use serde::Serialize;

use crate::classify::SeverityTier;
use crate::constants::CONCENTRATION_UNIT;
use crate::metric::MetricId;
use crate::render::format_value;
use crate::render::palette::tier_class;
use crate::sample::SampleId;
use crate::view::{DatasetView, SampleSeries};

/// Column a table can be sorted by. `Metric` indexes into the view's
/// metric list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    SampleId,
    PollutionIndex,
    Metric(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Sorting and expansion of the samples table. Row numbers always refer
/// to positions in the view, never to the sorted order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableState {
    pub sort: Option<(SortKey, SortOrder)>,
    pub expanded: Option<usize>,
}

impl TableState {
    /// Expand `row`, or collapse it if it is already open.
    pub fn toggle_expanded(&mut self, row: usize) {
        self.expanded = if self.expanded == Some(row) {
            None
        } else {
            Some(row)
        };
    }

    /// Sort by `key`; choosing the current key again flips the order.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((k, order)) if k == key => Some((k, order.toggled())),
            _ => Some((key, SortOrder::Ascending)),
        };
    }

    pub fn row_order(&self, view: &DatasetView) -> Vec<usize> {
        match self.sort {
            Some((key, order)) => sorted_rows(view, key, order),
            None => (0..view.len()).collect(),
        }
    }
}

/// Row positions of `view` sorted by `key`. The sort is stable and rows
/// without a value for the key go last in either order.
pub fn sorted_rows(view: &DatasetView, key: SortKey, order: SortOrder) -> Vec<usize> {
    let rows = view.rows();
    let mut idx: Vec<usize> = (0..rows.len()).collect();
    idx.sort_by(|&a, &b| {
        let (ra, rb) = (&rows[a], &rows[b]);
        match key {
            SortKey::SampleId => apply(ra.id().cmp(rb.id()), order),
            SortKey::PollutionIndex => {
                cmp_missing_last(ra.pollution_index(), rb.pollution_index(), order)
            }
            SortKey::Metric(i) => cmp_missing_last(
                ra.entries().get(i).map(|e| e.value),
                rb.entries().get(i).map(|e| e.value),
                order,
            ),
        }
    });
    idx
}

fn cmp_missing_last(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => apply(a.total_cmp(&b), order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn apply(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    }
}

/// Header labels: fixed columns followed by one column per metric.
pub fn headers(view: &DatasetView) -> Vec<String> {
    let mut out = vec![
        "Sample ID".to_string(),
        "Latitude".to_string(),
        "Longitude".to_string(),
        "HMPI".to_string(),
    ];
    out.extend(
        view.metrics()
            .iter()
            .map(|m| format!("{} ({})", m, CONCENTRATION_UNIT)),
    );
    out
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableCell<'a> {
    pub metric: &'a MetricId,
    pub value: f64,
    pub text: String,
    pub tier: SeverityTier,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow<'a> {
    /// Position in the view.
    pub index: usize,
    pub sample_id: &'a SampleId,
    pub latitude: String,
    pub longitude: String,
    pub pollution_index: String,
    pub cells: Vec<TableCell<'a>>,
    pub expanded: bool,
}

/// Rows in display order for the given table state.
pub fn table_rows<'a>(view: &'a DatasetView, state: &TableState) -> Vec<TableRow<'a>> {
    state
        .row_order(view)
        .into_iter()
        .map(|i| table_row(i, &view.rows()[i], state.expanded == Some(i)))
        .collect()
}

fn table_row(index: usize, row: &SampleSeries, expanded: bool) -> TableRow<'_> {
    let loc = row.location();
    let coord = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v));
    TableRow {
        index,
        sample_id: row.id(),
        latitude: coord(loc.latitude()),
        longitude: coord(loc.longitude()),
        pollution_index: row
            .pollution_index()
            .map_or_else(|| "-".to_string(), |h| format!("{:.2}", h)),
        cells: row
            .entries()
            .iter()
            .map(|e| TableCell {
                metric: &e.metric,
                value: e.value,
                text: format_value(e.value),
                tier: e.tier,
                class: tier_class(e.tier),
            })
            .collect(),
        expanded,
    }
}
