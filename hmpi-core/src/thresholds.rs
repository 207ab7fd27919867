use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::WHO_LIMITS_MG_L;
use crate::error::{Error, Result};
use crate::metric::MetricId;

/// One regulatory limit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEntry {
    pub metric: MetricId,
    pub limit: f64,
}

/// Fixed mapping from metric to regulatory limit, supplied once at start-up
/// and passed explicitly to every projection.
///
/// Entries keep their configured order. Serialized as a plain JSON object,
/// e.g. `{"Pb": 0.05, "Cd": 0.003}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdTable {
    entries: Vec<ThresholdEntry>,
}

impl ThresholdTable {
    /// Build a table, rejecting limits that are not positive and finite.
    /// A metric listed twice keeps its last limit.
    pub fn new<I, M>(limits: I) -> Result<Self>
    where
        I: IntoIterator<Item = (M, f64)>,
        M: Into<MetricId>,
    {
        let mut table = ThresholdTable::empty();
        for (metric, limit) in limits {
            let metric = metric.into();
            if !(limit.is_finite() && limit > 0.0) {
                return Err(Error::InvalidLimit {
                    metric: metric.to_string(),
                    limit,
                });
            }
            match table.entries.iter_mut().find(|e| e.metric == metric) {
                Some(e) => e.limit = limit,
                None => table.entries.push(ThresholdEntry { metric, limit }),
            }
        }
        Ok(table)
    }

    pub fn empty() -> Self {
        ThresholdTable {
            entries: Vec::new(),
        }
    }

    /// WHO drinking-water guideline values (mg/L).
    pub fn who() -> Self {
        ThresholdTable {
            entries: WHO_LIMITS_MG_L
                .iter()
                .map(|(m, l)| ThresholdEntry {
                    metric: MetricId::from(*m),
                    limit: *l,
                })
                .collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(text)?;
        ThresholdTable::try_from(raw)
    }

    pub fn limit(&self, metric: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.metric.as_str() == metric)
            .map(|e| e.limit)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.limit(metric).is_some()
    }

    pub fn entries(&self) -> &[ThresholdEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        ThresholdTable::who()
    }
}

impl TryFrom<Map<String, Value>> for ThresholdTable {
    type Error = Error;

    fn try_from(raw: Map<String, Value>) -> Result<Self> {
        let mut limits = Vec::with_capacity(raw.len());
        for (metric, value) in raw {
            let limit = value.as_f64().ok_or_else(|| Error::NonNumericLimit(metric.clone()))?;
            limits.push((metric, limit));
        }
        ThresholdTable::new(limits)
    }
}

impl Serialize for ThresholdTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for e in &self.entries {
            map.serialize_entry(e.metric.as_str(), &e.limit)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ThresholdTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        ThresholdTable::try_from(raw).map_err(de::Error::custom)
    }
}
