use std::borrow::Borrow;
use std::fmt;

use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::metric::MetricId;

/// Identifier of one sample, unique within a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(String);

impl SampleId {
    pub fn new(id: impl Into<String>) -> Self {
        SampleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SampleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SampleId {
    fn from(v: &str) -> Self {
        SampleId(v.to_string())
    }
}

impl From<String> for SampleId {
    fn from(v: String) -> Self {
        SampleId(v)
    }
}

/// Where a sample was taken. Points store longitude as `x` and latitude as `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Location {
    Known(Point<f64>),
    #[default]
    Unknown,
}

impl Location {
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Location::Known(Point::new(lng, lat))
    }

    pub fn point(&self) -> Option<Point<f64>> {
        match self {
            Location::Known(p) => Some(*p),
            Location::Unknown => None,
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        self.point().map(|p| p.y())
    }

    pub fn longitude(&self) -> Option<f64> {
        self.point().map(|p| p.x())
    }
}

/// Metric readings of one sample, kept in the order they were reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observations(Vec<(MetricId, f64)>);

impl Observations {
    pub fn new() -> Self {
        Observations(Vec::new())
    }

    /// Set the reading for `metric`, replacing any previous value in place.
    pub fn insert(&mut self, metric: impl Into<MetricId>, value: f64) {
        let metric = metric.into();
        match self.0.iter_mut().find(|(m, _)| *m == metric) {
            Some(slot) => slot.1 = value,
            None => self.0.push((metric, value)),
        }
    }

    /// Add `value` onto the reading for `metric`; columns merged into one
    /// metric sum up and keep the position of the first.
    pub fn accumulate(&mut self, metric: impl Into<MetricId>, value: f64) {
        let metric = metric.into();
        match self.0.iter_mut().find(|(m, _)| *m == metric) {
            Some(slot) => slot.1 += value,
            None => self.0.push((metric, value)),
        }
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(m, _)| m.as_str() == metric)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricId, f64)> {
        self.0.iter().map(|(m, v)| (m, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<M: Into<MetricId>> FromIterator<(M, f64)> for Observations {
    fn from_iter<I: IntoIterator<Item = (M, f64)>>(iter: I) -> Self {
        let mut obs = Observations::new();
        for (m, v) in iter {
            obs.insert(m, v);
        }
        obs
    }
}

/// One groundwater sample. Immutable once built; a new upload replaces
/// the whole dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    id: SampleId,
    location: Location,
    pollution_index: Option<f64>,
    observations: Observations,
}

impl Sample {
    pub fn new(id: impl Into<SampleId>) -> Self {
        Sample {
            id: id.into(),
            location: Location::Unknown,
            pollution_index: None,
            observations: Observations::new(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_pollution_index(mut self, hmpi: f64) -> Self {
        self.pollution_index = Some(hmpi);
        self
    }

    pub fn with_observation(mut self, metric: impl Into<MetricId>, value: f64) -> Self {
        self.observations.insert(metric, value);
        self
    }

    pub fn with_observations(mut self, observations: Observations) -> Self {
        self.observations = observations;
        self
    }

    pub fn id(&self) -> &SampleId {
        &self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Heavy metal pollution index as computed upstream; `None` when the
    /// upload service could not compute one.
    pub fn pollution_index(&self) -> Option<f64> {
        self.pollution_index
    }

    pub fn observations(&self) -> &Observations {
        &self.observations
    }

    pub fn value(&self, metric: &str) -> Option<f64> {
        self.observations.get(metric)
    }
}
