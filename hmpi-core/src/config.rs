use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::constants::DEFAULT_ELEVATED_RATIO;
use crate::error::Result;
use crate::ingest::IngestOptions;
use crate::thresholds::ThresholdTable;

/// Start-up configuration shared by the browser runtime and the CLI.
///
/// ```json
/// {"thresholds": {"Pb": 0.01, "As": 0.01}, "elevated_ratio": 0.7}
/// ```
///
/// Every field is optional; missing ones take the WHO table, a 0.6 ratio
/// and metric-name normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: ThresholdTable,
    pub elevated_ratio: f64,
    pub normalize_metric_names: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            thresholds: ThresholdTable::who(),
            elevated_ratio: DEFAULT_ELEVATED_RATIO,
            normalize_metric_names: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.classifier()?;
        Ok(config)
    }

    pub fn classifier(&self) -> Result<Classifier> {
        Classifier::new(self.elevated_ratio)
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            normalize_metric_names: self.normalize_metric_names,
        }
    }
}
