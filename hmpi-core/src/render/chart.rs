//! Chart.js-shaped payloads for the per-sample charts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::palette::{
    CURRENT_AREA, CURRENT_FILL, CURRENT_LINE, CURRENT_RADAR_FILL, LIMIT_AREA, LIMIT_FILL,
    LIMIT_LINE, LIMIT_RADAR_FILL, series_color,
};
use crate::view::SampleSeries;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Radar,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Radar => "Radar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownChartKind(pub String);

impl fmt::Display for UnknownChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown chart kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownChartKind {}

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "radar" => Ok(ChartKind::Radar),
            _ => Err(UnknownChartKind(s.to_string())),
        }
    }
}

/// A single color or one color per data point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(&'static str),
    PerPoint(Vec<&'static str>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    /// `null` marks a metric without a limit; Chart.js leaves a gap.
    pub data: Vec<Option<f64>>,
    pub background_color: Paint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPlugins {
    pub title: ChartTitle,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub plugins: ChartPlugins,
}

/// Complete `new Chart(ctx, spec)` argument.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

const CURRENT_LABEL: &str = "Current Level";
const LIMIT_LABEL: &str = "WHO Limit";

pub fn chart(kind: ChartKind, row: &SampleSeries) -> ChartSpec {
    let entries = row.entries();
    let labels = entries.iter().map(|e| e.metric.to_string()).collect();
    let current: Vec<Option<f64>> = entries.iter().map(|e| Some(e.value)).collect();
    let limits: Vec<Option<f64>> = entries.iter().map(|e| e.limit).collect();

    let dataset = |label: &'static str,
                   data: Vec<Option<f64>>,
                   background: &'static str,
                   border: Option<&'static str>,
                   fill: Option<bool>| ChartDataset {
        label: Some(label),
        data,
        background_color: Paint::Solid(background),
        border_color: border,
        fill,
    };

    let datasets = match kind {
        ChartKind::Bar => vec![
            dataset(CURRENT_LABEL, current, CURRENT_FILL, None, None),
            dataset(LIMIT_LABEL, limits, LIMIT_FILL, None, None),
        ],
        ChartKind::Line => vec![
            dataset(CURRENT_LABEL, current, CURRENT_AREA, Some(CURRENT_LINE), Some(true)),
            dataset(LIMIT_LABEL, limits, LIMIT_AREA, Some(LIMIT_LINE), Some(true)),
        ],
        ChartKind::Radar => vec![
            dataset(CURRENT_LABEL, current, CURRENT_RADAR_FILL, Some(CURRENT_FILL), None),
            dataset(LIMIT_LABEL, limits, LIMIT_RADAR_FILL, Some(LIMIT_FILL), None),
        ],
        ChartKind::Pie => vec![ChartDataset {
            label: None,
            data: current,
            background_color: Paint::PerPoint((0..entries.len()).map(series_color).collect()),
            border_color: None,
            fill: None,
        }],
    };

    ChartSpec {
        kind,
        data: ChartData { labels, datasets },
        options: ChartOptions {
            responsive: true,
            plugins: ChartPlugins {
                title: ChartTitle {
                    display: true,
                    text: format!("Sample {} - {} Chart", row.id(), kind),
                },
            },
        },
    }
}
