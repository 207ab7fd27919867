//! Renderer adapters.
//!
//! Everything here is a pure projection of a [`DatasetView`](crate::view::DatasetView):
//! column order, cell tiers and color scales come from the view and are
//! never re-derived, so a table cell and a chart bar always agree.

pub mod chart;
pub mod csv;
pub mod heatmap;
pub mod map;
pub mod palette;
pub mod summary;
pub mod svg;
pub mod table;

/// Format a concentration for display:
/// - near-integers (1e-9) without decimals
/// - otherwise up to 4 decimals with trailing zeros trimmed
pub fn format_value(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "0" || s == "-0" {
            // below display precision
            format!("{:.1e}", v)
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn values_are_trimmed() {
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(0.05), "0.05");
        assert_eq!(format_value(0.0025), "0.0025");
        assert_eq!(format_value(1.23456), "1.2346");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn tiny_values_switch_to_scientific() {
        assert_eq!(format_value(0.00002), "2.0e-5");
    }
}
