//! Parse-and-validate boundary between the upload service's JSON and
//! typed [`Sample`]s.
//!
//! Accepts either a bare array of records or the upload response envelope
//! `{"GeoJSON": [...]}` (`file_data` is accepted as an alias). Each record
//! looks like
//!
//! ```json
//! {
//!   "Sample_ID": "S1",
//!   "all_metal_conc": {"Lead": 0.06, "Zinc": 1.2},
//!   "geometry": {"type": "Point", "coordinates": [77.2, 28.6]},
//!   "latitudeandlongitudepresent": true,
//!   "HMPI": 142.7
//! }
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::metric::{MetricId, canonical_metric};
use crate::sample::{Location, Observations, Sample, SampleId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestOptions {
    /// Map column names such as `Lead` or `pb_conc` onto element symbols.
    pub normalize_metric_names: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            normalize_metric_names: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSample {
    #[serde(rename = "Sample_ID", default)]
    sample_id: Value,
    #[serde(default)]
    all_metal_conc: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Value,
    #[serde(rename = "latitudeandlongitudepresent", default)]
    has_coordinates: Option<bool>,
    #[serde(rename = "HMPI", default)]
    hmpi: Value,
}

/// Parse a dataset from JSON text.
pub fn parse_dataset(text: &str, options: &IngestOptions) -> Result<Vec<Sample>> {
    let value: Value = serde_json::from_str(text)?;
    samples_from_value(value, options)
}

pub fn samples_from_value(value: Value, options: &IngestOptions) -> Result<Vec<Sample>> {
    let records = match value {
        Value::Array(records) => records,
        Value::Object(mut envelope) => match envelope
            .remove("GeoJSON")
            .or_else(|| envelope.remove("file_data"))
        {
            Some(Value::Array(records)) => records,
            _ => return Err(Error::UnrecognizedDataset),
        },
        _ => return Err(Error::UnrecognizedDataset),
    };

    let raws = records
        .into_iter()
        .map(serde_json::from_value::<RawSample>)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Explicit ids first, so generated ones can step around them.
    let mut taken: HashSet<SampleId> = HashSet::with_capacity(raws.len());
    for id in raws.iter().filter_map(|raw| sample_id(&raw.sample_id)) {
        if !taken.insert(id.clone()) {
            return Err(Error::DuplicateSampleId(id.to_string()));
        }
    }

    let mut generated = 0usize;
    let mut samples = Vec::with_capacity(raws.len());
    for raw in raws {
        let id = match sample_id(&raw.sample_id) {
            Some(id) => id,
            None => {
                let id = loop {
                    generated += 1;
                    let candidate = SampleId::new(format!("S{generated}"));
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                warn!(sample = %id, "record without Sample_ID, assigned sequential id");
                id
            }
        };
        samples.push(to_sample(id, raw, options)?);
    }
    debug!(samples = samples.len(), "ingested dataset");
    Ok(samples)
}

fn to_sample(id: SampleId, raw: RawSample, options: &IngestOptions) -> Result<Sample> {
    let mut observations = Observations::new();
    for (column, value) in raw.all_metal_conc.unwrap_or_default() {
        let Some(v) = concentration(&value) else {
            if !value.is_null() {
                warn!(sample = %id, column = %column, "skipping non-numeric concentration");
            }
            continue;
        };
        if !(v.is_finite() && v >= 0.0) {
            return Err(Error::InvalidConcentration {
                sample: id.to_string(),
                metric: column,
                value: v,
            });
        }
        let metric = match canonical_metric(&column) {
            Some(symbol) if options.normalize_metric_names => MetricId::from(symbol),
            _ => MetricId::from(column),
        };
        observations.accumulate(metric, v);
    }

    let location = location(&raw.geometry, raw.has_coordinates);
    if location == Location::Unknown
        && !raw.geometry.is_null()
        && raw.has_coordinates != Some(false)
    {
        warn!(sample = %id, "unparsable geometry, location marked unknown");
    }

    let mut sample = Sample::new(id)
        .with_location(location)
        .with_observations(observations);
    match concentration(&raw.hmpi) {
        Some(h) if h.is_finite() && h >= 0.0 => sample = sample.with_pollution_index(h),
        Some(h) => warn!(sample = %sample.id(), hmpi = h, "ignoring invalid pollution index"),
        None => {}
    }
    Ok(sample)
}

fn sample_id(v: &Value) -> Option<SampleId> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(SampleId::new(s.trim())),
        Value::Number(n) => Some(SampleId::new(n.to_string())),
        _ => None,
    }
}

fn concentration(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// GeoJSON point (object or JSON-encoded string) to a location. Anything
/// that does not carry two finite coordinates becomes `Unknown`.
fn location(geometry: &Value, has_coordinates: Option<bool>) -> Location {
    if has_coordinates == Some(false) {
        return Location::Unknown;
    }
    let decoded;
    let geometry = match geometry {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(v) => {
                decoded = v;
                &decoded
            }
            Err(_) => return Location::Unknown,
        },
        other => other,
    };
    let coords = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .map(Vec::as_slice);
    match coords {
        Some([lng, lat, ..]) => match (lng.as_f64(), lat.as_f64()) {
            (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => {
                Location::from_lat_lng(lat, lng)
            }
            _ => Location::Unknown,
        },
        _ => Location::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Result<Vec<Sample>> {
        samples_from_value(v, &IngestOptions::default())
    }

    #[test]
    fn accepts_bare_array_and_upload_envelope() {
        let rec = json!({"Sample_ID": "A", "all_metal_conc": {"Pb": 0.01}});
        assert_eq!(parse(json!([rec.clone()])).unwrap().len(), 1);
        let env = json!({"msg": "ok", "file_name": "x.csv", "GeoJSON": [rec]});
        assert_eq!(parse(env).unwrap()[0].id().as_str(), "A");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(parse(json!({"rows": []})), Err(Error::UnrecognizedDataset)));
        assert!(matches!(parse(json!(42)), Err(Error::UnrecognizedDataset)));
        assert!(matches!(
            parse_dataset("not json", &IngestOptions::default()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn normalizes_names_and_merges_columns() {
        let samples = parse(json!([{
            "Sample_ID": "A",
            "all_metal_conc": {"Zinc": 1.0, "Lead": 0.02, "pb_conc": 0.01, "Uranium": 0.2}
        }]))
        .unwrap();
        let obs = samples[0].observations();
        let keys: Vec<&str> = obs.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(keys, ["Zn", "Pb", "Uranium"]);
        assert!((obs.get("Pb").unwrap() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn raw_names_kept_when_normalization_is_off() {
        let opts = IngestOptions {
            normalize_metric_names: false,
        };
        let samples = samples_from_value(
            json!([{"Sample_ID": "A", "all_metal_conc": {"Lead": 0.02}}]),
            &opts,
        )
        .unwrap();
        assert_eq!(samples[0].value("Lead"), Some(0.02));
        assert_eq!(samples[0].value("Pb"), None);
    }

    #[test]
    fn missing_ids_are_sequential() {
        let samples = parse(json!([
            {"all_metal_conc": {}},
            {"Sample_ID": 7},
            {"Sample_ID": ""},
        ]))
        .unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["S1", "7", "S2"]);
    }

    #[test]
    fn generated_ids_skip_explicit_ones() {
        let samples = parse(json!([
            {"all_metal_conc": {"Lead": 0.01}},
            {"Sample_ID": "S1", "all_metal_conc": {"Lead": 0.02}},
            {},
            {"Sample_ID": "S3"},
        ]))
        .unwrap();
        let ids: Vec<&str> = samples.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["S2", "S1", "S4", "S3"]);
        assert_eq!(samples[1].value("Pb"), Some(0.02));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = parse(json!([{"Sample_ID": "A"}, {"Sample_ID": "A"}])).unwrap_err();
        assert!(matches!(err, Error::DuplicateSampleId(id) if id == "A"));
    }

    #[test]
    fn negative_concentration_is_rejected() {
        let err = parse(json!([{"Sample_ID": "A", "all_metal_conc": {"Pb": -0.1}}])).unwrap_err();
        assert!(matches!(err, Error::InvalidConcentration { .. }));
    }

    #[test]
    fn null_and_text_readings_are_skipped() {
        let samples = parse(json!([{
            "Sample_ID": "A",
            "all_metal_conc": {"Pb": null, "Cd": "n/d", "Cu": "1.5"}
        }]))
        .unwrap();
        assert_eq!(samples[0].value("Pb"), None);
        assert_eq!(samples[0].value("Cd"), None);
        assert_eq!(samples[0].value("Cu"), Some(1.5));
    }

    #[test]
    fn geometry_object_and_string_are_parsed() {
        let samples = parse(json!([
            {"Sample_ID": "A", "geometry": {"type": "Point", "coordinates": [77.2, 28.6]}},
            {"Sample_ID": "B", "geometry": "{\"type\":\"Point\",\"coordinates\":[72.8,19.0]}"},
        ]))
        .unwrap();
        assert_eq!(samples[0].location(), Location::from_lat_lng(28.6, 77.2));
        assert_eq!(samples[1].location().latitude(), Some(19.0));
    }

    #[test]
    fn malformed_geometry_becomes_unknown() {
        let samples = parse(json!([
            {"Sample_ID": "A", "geometry": {"type": "Point", "coordinates": [null, null]}},
            {"Sample_ID": "B", "geometry": "garbage"},
            {"Sample_ID": "C", "geometry": {"type": "Point", "coordinates": [1.0]}},
            {"Sample_ID": "D", "latitudeandlongitudepresent": false,
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"Sample_ID": "E"},
        ]))
        .unwrap();
        assert!(samples.iter().all(|s| s.location() == Location::Unknown));
    }

    #[test]
    fn pollution_index_is_optional() {
        let samples = parse(json!([
            {"Sample_ID": "A", "HMPI": 142.75},
            {"Sample_ID": "B", "HMPI": null},
        ]))
        .unwrap();
        assert_eq!(samples[0].pollution_index(), Some(142.75));
        assert_eq!(samples[1].pollution_index(), None);
    }
}
