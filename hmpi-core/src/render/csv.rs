//! Chart data export, one CSV row per sample.

use std::fmt::Write as _;

use crate::view::DatasetView;

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn fixed(v: f64) -> String {
    format!("{v:.4}")
}

/// Header: `Sample_ID`, then `<m>_Actual,<m>_Limit` per metric, then `Pie_Values`.
/// A metric without a limit leaves its `_Limit` cell empty.
pub fn charts_csv(view: &DatasetView) -> String {
    let mut out = String::new();

    let mut header = vec!["Sample_ID".to_string()];
    for m in view.metrics() {
        header.push(format!("{m}_Actual"));
        header.push(format!("{m}_Limit"));
    }
    header.push("Pie_Values".to_string());
    let header: Vec<String> = header.iter().map(|h| escape(h)).collect();
    let _ = writeln!(out, "{}", header.join(","));

    for row in view.rows() {
        let mut fields = vec![escape(row.id().as_str())];
        for entry in row.entries() {
            fields.push(fixed(entry.value));
            fields.push(entry.limit.map(fixed).unwrap_or_default());
        }
        let pie: Vec<String> = row.entries().iter().map(|e| fixed(e.value)).collect();
        fields.push(escape(&pie.join(",")));
        let _ = writeln!(out, "{}", fields.join(","));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::thresholds::ThresholdTable;

    #[test]
    fn rows_follow_view_order() {
        let samples = vec![
            Sample::new("S1").with_observation("Pb", 0.06).with_observation("Fe", 0.3),
            Sample::new("S2").with_observation("Fe", 0.12346),
        ];
        let view = DatasetView::project(&samples, &ThresholdTable::who());
        let csv = charts_csv(&view);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Sample_ID,Pb_Actual,Pb_Limit,Fe_Actual,Fe_Limit,Pie_Values");
        assert_eq!(lines[1], "S1,0.0600,0.0500,0.3000,,\"0.0600,0.3000\"");
        assert_eq!(lines[2], "S2,0.0000,0.0500,0.1235,,\"0.0000,0.1235\"");
    }

    #[test]
    fn ids_are_quoted_when_needed() {
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("plain"), "plain");
    }
}
