//! Dataset view engine for groundwater heavy-metal samples.
//!
//! A dataset is ingested once ([`ingest`]), projected once into a
//! [`DatasetView`] and then handed to any number of renderers
//! ([`render`]). The view fixes the metric column order, the per-sample
//! classified series and the per-metric color-scale maxima, so every
//! renderer agrees on what it shows.
//!
//! ```
//! use hmpi_core::{DatasetView, Sample, SeverityTier, ThresholdTable};
//!
//! let samples = vec![Sample::new("S1").with_observation("Pb", 0.06)];
//! let view = DatasetView::project(&samples, &ThresholdTable::who());
//! assert_eq!(view.series("S1").unwrap()[0].tier, SeverityTier::Exceeded);
//! ```

pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod metric;
pub mod render;
pub mod sample;
pub mod schema;
pub mod series;
pub mod thresholds;
pub mod view;

pub use classify::{Classifier, SeverityTier, classify};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use ingest::{IngestOptions, parse_dataset, samples_from_value};
pub use metric::MetricId;
pub use sample::{Location, Observations, Sample, SampleId};
pub use schema::discover;
pub use series::{MetricSeriesEntry, SeriesBuilder};
pub use thresholds::{ThresholdEntry, ThresholdTable};
pub use view::{DatasetView, SampleSeries, ViewCache};
