//! Standalone SVG rendering of the dataset heatmap grid.

use crate::render::format_value;
use crate::render::heatmap::dataset_heatmap;
use crate::view::DatasetView;

const PAD_PX: f64 = 16.0;
const FONT_PX: f64 = 14.0;
// rough advance for sans-serif at FONT_PX
const CHAR_PX: f64 = 8.0;

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Returns the document together with its pixel width and height.
pub fn heatmap_svg(view: &DatasetView, cell_px: f64) -> (String, u32, u32) {
    let grid = dataset_heatmap(view);
    let label_w = grid
        .rows
        .iter()
        .map(|r| r.chars().count())
        .max()
        .unwrap_or(0) as f64
        * CHAR_PX
        + PAD_PX;
    let header_h = FONT_PX + PAD_PX;
    let x0 = PAD_PX + label_w;
    let y0 = PAD_PX + header_h;
    let w_px = (x0 + grid.width() as f64 * cell_px + PAD_PX).ceil() as u32;
    let h_px = (y0 + grid.height() as f64 * cell_px + PAD_PX).ceil() as u32;

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\" font-size=\"{}\">\n",
        w_px, h_px, w_px, h_px, FONT_PX
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

    for (c, metric) in grid.columns.iter().enumerate() {
        let cx = x0 + (c as f64 + 0.5) * cell_px;
        s.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" fill=\"#333\">{}</text>\n",
            cx,
            y0 - PAD_PX / 2.0,
            svg_escape(metric.as_str())
        ));
    }

    for (r, (label, cells)) in grid.rows.iter().zip(&grid.cells).enumerate() {
        let y = y0 + r as f64 * cell_px;
        s.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\" fill=\"#333\">{}</text>\n",
            x0 - PAD_PX / 2.0,
            y + cell_px / 2.0,
            svg_escape(label)
        ));
        for (c, cell) in cells.iter().enumerate() {
            s.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"#fff\"><title>{} {}: {}</title></rect>\n",
                x0 + c as f64 * cell_px,
                y,
                cell_px,
                cell_px,
                cell.color,
                svg_escape(label),
                svg_escape(cell.metric.as_str()),
                format_value(cell.value)
            ));
        }
    }
    s.push_str("</svg>\n");
    (s, w_px, h_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use crate::thresholds::ThresholdTable;

    #[test]
    fn one_rect_per_cell() {
        let samples = vec![
            Sample::new("S1").with_observation("Pb", 0.05).with_observation("As", 0.01),
            Sample::new("S<2>").with_observation("Pb", 0.0),
        ];
        let view = DatasetView::project(&samples, &ThresholdTable::who());
        let (svg, w, h) = heatmap_svg(&view, 20.0);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        // background plus 2x2 cells
        assert_eq!(svg.matches("<rect").count(), 5);
        assert!(svg.contains("fill=\"rgb(255, 100, 150)\""));
        assert!(svg.contains("S&lt;2&gt;"));
        assert!(w > 40 && h > 40);
    }

    #[test]
    fn empty_view_still_renders() {
        let view = DatasetView::project(&[], &ThresholdTable::who());
        let (svg, _, _) = heatmap_svg(&view, 20.0);
        assert_eq!(svg.matches("<rect").count(), 1);
    }
}
