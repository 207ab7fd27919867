use hmpi_core::render::{chart, heatmap, map, summary, table};
use hmpi_core::{
    Classifier, DatasetView, EngineConfig, IngestOptions, MetricId, Sample, SeverityTier,
    ThresholdTable, classify, discover, samples_from_value,
};
use serde_json::json;

fn thresholds(pairs: &[(&str, f64)]) -> ThresholdTable {
    ThresholdTable::new(pairs.iter().map(|&(m, l)| (m, l))).unwrap()
}

fn upload() -> Vec<Sample> {
    let body = json!({
        "msg": "File uploaded and processed successfully!",
        "GeoJSON": [
            {
                "Sample_ID": "W-01",
                "all_metal_conc": {"Lead": 0.06, "Cadmium": 0.002, "Iron": 0.4},
                "geometry": {"type": "Point", "coordinates": [77.209, 28.6139]},
                "latitudeandlongitudepresent": true,
                "HMPI": 182.4
            },
            {
                "Sample_ID": "W-02",
                "all_metal_conc": {"pb_conc": 0.01, "Zinc": 1.1},
                "geometry": "{\"type\": \"Point\", \"coordinates\": [72.8777, 19.076]}",
                "latitudeandlongitudepresent": true,
                "HMPI": 35.0
            },
            {
                "all_metal_conc": {"Copper": "2.4", "Lead": null},
                "geometry": "not a point",
                "latitudeandlongitudepresent": false,
                "HMPI": null
            }
        ]
    });
    samples_from_value(body, &IngestOptions::default()).unwrap()
}

#[test]
fn scenario_exceeded_lead() {
    let samples = vec![Sample::new("S1").with_observation("Pb", 0.06)];
    let view = DatasetView::project(&samples, &thresholds(&[("Pb", 0.05)]));
    let series = view.series("S1").unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].metric, MetricId::from("Pb"));
    assert_eq!(series[0].value, 0.06);
    assert_eq!(series[0].limit, Some(0.05));
    assert_eq!(series[0].tier, SeverityTier::Exceeded);
}

#[test]
fn scenario_elevated_cadmium() {
    let samples = vec![Sample::new("S1").with_observation("Cd", 0.002)];
    let view = DatasetView::project(&samples, &thresholds(&[("Cd", 0.003)]));
    let e = &view.series("S1").unwrap()[0];
    assert_eq!((e.value, e.limit, e.tier), (0.002, Some(0.003), SeverityTier::Elevated));
}

#[test]
fn scenario_missing_zinc_reads_as_zero() {
    let samples = vec![
        Sample::new("S1").with_observation("Zn", 0.5),
        Sample::new("S2").with_observation("Pb", 0.01),
    ];
    let view = DatasetView::project(&samples, &ThresholdTable::who());
    let zn = view.metric_position("Zn").unwrap();
    let e = &view.series("S2").unwrap()[zn];
    assert_eq!(e.metric.as_str(), "Zn");
    assert_eq!((e.value, e.limit, e.tier), (0.0, Some(3.0), SeverityTier::Safe));
}

#[test]
fn scenario_copper_maximum() {
    let samples: Vec<Sample> = [1.0, 2.5, 1.8]
        .iter()
        .enumerate()
        .map(|(i, &v)| Sample::new(format!("S{}", i + 1)).with_observation("Cu", v))
        .collect();
    let view = DatasetView::project(&samples, &thresholds(&[("Cu", 2.0)]));
    assert_eq!(view.max_for("Cu"), Some(2.5));
}

#[test]
fn scenario_empty_dataset() {
    let view = DatasetView::project(&[], &ThresholdTable::who());
    assert!(view.metrics().is_empty());
    assert!(view.rows().is_empty());
    assert!(view.is_empty());

    let empty = samples_from_value(json!({"GeoJSON": []}), &IngestOptions::default()).unwrap();
    assert!(empty.is_empty());

    // every renderer copes with nothing to display
    let state = table::TableState::default();
    assert!(table::table_rows(&view, &state).is_empty());
    assert!(heatmap::dataset_heatmap(&view).cells.is_empty());
    assert!(map::markers(&view).is_empty());
    assert_eq!(summary::summarize(&view).samples, 0);
}

#[test]
fn discovery_is_order_stable() {
    let samples = upload();
    let first = discover(&samples);
    let second = discover(&samples);
    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(MetricId::as_str).collect();
    assert_eq!(names, ["Pb", "Cd", "Fe", "Zn", "Cu"]);
}

#[test]
fn series_align_with_metric_list() {
    let samples = upload();
    let view = DatasetView::project(&samples, &ThresholdTable::who());
    for row in view.rows() {
        assert_eq!(row.entries().len(), view.metrics().len());
        for (entry, metric) in row.entries().iter().zip(view.metrics()) {
            assert_eq!(&entry.metric, metric);
        }
    }
}

#[test]
fn classification_is_monotonic() {
    let limit = 0.05;
    let mut last = SeverityTier::Safe;
    for step in 0..=200 {
        let v = limit * step as f64 / 100.0;
        let tier = classify(v, Some(limit));
        assert!(tier >= last, "tier dropped at {v}");
        last = tier;
    }
    assert_eq!(classify(0.6 * limit, Some(limit)), SeverityTier::Safe);
    assert_eq!(classify(limit, Some(limit)), SeverityTier::Elevated);
    assert_eq!(classify(limit * 1.01, Some(limit)), SeverityTier::Exceeded);
}

#[test]
fn metrics_without_limits_are_safe() {
    for v in [0.0, 1.0, 1e9, f64::MAX] {
        assert_eq!(classify(v, None), SeverityTier::Safe);
    }
    let samples = upload();
    let view = DatasetView::project(&samples, &ThresholdTable::who());
    let fe = view.metric_position("Fe").unwrap();
    assert_eq!(view.limits()[fe], None);
    assert!(view.rows().iter().all(|r| r.entries()[fe].tier == SeverityTier::Safe));
}

#[test]
fn projection_is_idempotent() {
    let samples = upload();
    let t = ThresholdTable::who();
    let a = DatasetView::project(&samples, &t);
    let b = DatasetView::project(&samples, &t);
    assert_eq!(a.metrics(), b.metrics());
    assert_eq!(a.maxima(), b.maxima());
    assert_eq!(a, b);
}

#[test]
fn uploaded_dataset_projects_consistently() {
    let samples = upload();
    let view = DatasetView::project(&samples, &ThresholdTable::who());

    // sequential id for the record without one
    assert_eq!(view.rows()[2].id().as_str(), "S1");
    let s1 = view.sample("S1").unwrap();
    assert_eq!(s1.location().point(), None);
    assert_eq!(s1.pollution_index(), None);

    let w1 = view.sample("W-01").unwrap();
    assert_eq!(w1.location().latitude(), Some(28.6139));
    assert_eq!(w1.worst_tier(), SeverityTier::Exceeded);

    // table and chart agree on the same entries
    let state = table::TableState::default();
    let rows = table::table_rows(&view, &state);
    let spec = chart::chart(chart::ChartKind::Bar, w1);
    let current: Vec<f64> = spec.data.datasets[0].data.iter().flatten().copied().collect();
    let cells: Vec<f64> = rows[0].cells.iter().map(|c| c.value).collect();
    assert_eq!(current, cells);
    assert_eq!(rows[0].cells[0].class, "tier-exceeded");

    let markers = map::markers(&view);
    assert_eq!(markers.len(), 2);
    let extent = map::extent(&markers);
    assert!(extent.bounds.is_some());
}

#[test]
fn configured_ratio_moves_the_elevated_band() {
    let config = EngineConfig::from_json(r#"{"elevated_ratio": 0.7}"#).unwrap();
    let samples = vec![Sample::new("S1").with_observation("Cd", 0.002)];
    let view = DatasetView::project_with(&samples, &config.thresholds, config.classifier().unwrap());
    assert_eq!(view.series("S1").unwrap()[0].tier, SeverityTier::Safe);
    assert_eq!(view.classifier(), Classifier::new(0.7).unwrap());
}

#[test]
fn builder_fills_unreported_metrics_with_zero() {
    let sample = Sample::new("S1").with_observation("Pb", 0.01);
    let metrics = [MetricId::from("Pb"), MetricId::from("Zn")];
    let series = hmpi_core::series::build(&sample, &metrics, &ThresholdTable::who());
    assert_eq!(series[1].metric.as_str(), "Zn");
    assert_eq!((series[1].value, series[1].limit, series[1].tier), (0.0, Some(3.0), SeverityTier::Safe));
}
