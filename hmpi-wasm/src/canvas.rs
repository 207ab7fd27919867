use hmpi_core::DatasetView;
use hmpi_core::render::format_value;
use hmpi_core::render::heatmap::{HeatCell, dataset_heatmap, sample_heatmap};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

const CELL_PX: f64 = 48.0;
const LABEL_PX: f64 = 18.0;
const ROW_LABEL_PX: f64 = 96.0;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

pub fn init_canvas(
    document: &Document,
    id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas #{id} not found")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = context_2d(&cv)?;
    Ok((cv, ctx))
}

fn context_2d(cv: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    Ok(cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?)
}

fn draw_cell(ctx: &CanvasRenderingContext2d, cell: &HeatCell, x: f64, y: f64) {
    set_fill_style(ctx, &cell.color.to_string());
    ctx.fill_rect(x, y, CELL_PX, CELL_PX);
    set_stroke_style(ctx, "#ffffff");
    ctx.stroke_rect(x, y, CELL_PX, CELL_PX);
    set_fill_style(ctx, "#ffffff");
    let _ = ctx.fill_text(&format_value(cell.value), x + CELL_PX / 2.0, y + CELL_PX / 2.0);
}

/// One strip of cells for the expanded sample, metric names above.
pub fn draw_sample_heatmap(
    canvas: &HtmlCanvasElement,
    ctx: &CanvasRenderingContext2d,
    view: &DatasetView,
    row: Option<usize>,
) {
    let cells = row.and_then(|r| sample_heatmap(view, r)).unwrap_or_default();
    let w = (cells.len() as f64 * CELL_PX).max(1.0);
    canvas.set_width(w as u32);
    canvas.set_height((LABEL_PX + CELL_PX) as u32);
    ctx.clear_rect(0.0, 0.0, w, LABEL_PX + CELL_PX);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font("12px sans-serif");
    for (i, cell) in cells.iter().enumerate() {
        let x = i as f64 * CELL_PX;
        set_fill_style(ctx, "#333333");
        let _ = ctx.fill_text(cell.metric.as_str(), x + CELL_PX / 2.0, LABEL_PX / 2.0);
        draw_cell(ctx, cell, x, LABEL_PX);
    }
}

/// Render the whole dataset grid onto a detached canvas and return it as a
/// PNG data URL.
pub fn dataset_heatmap_png(document: &Document, view: &DatasetView) -> Result<String, JsValue> {
    let grid = dataset_heatmap(view);
    let cv = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    let w = ROW_LABEL_PX + grid.width() as f64 * CELL_PX;
    let h = LABEL_PX + grid.height() as f64 * CELL_PX;
    cv.set_width(w.ceil() as u32);
    cv.set_height(h.ceil() as u32);
    let ctx = context_2d(&cv)?;
    set_fill_style(&ctx, "#ffffff");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_text_baseline("middle");
    ctx.set_font("12px sans-serif");

    ctx.set_text_align("center");
    set_fill_style(&ctx, "#333333");
    for (c, metric) in grid.columns.iter().enumerate() {
        let x = ROW_LABEL_PX + c as f64 * CELL_PX + CELL_PX / 2.0;
        ctx.fill_text(metric.as_str(), x, LABEL_PX / 2.0)?;
    }
    for (r, (label, cells)) in grid.rows.iter().zip(&grid.cells).enumerate() {
        let y = LABEL_PX + r as f64 * CELL_PX;
        ctx.set_text_align("right");
        set_fill_style(&ctx, "#333333");
        ctx.fill_text(label, ROW_LABEL_PX - 6.0, y + CELL_PX / 2.0)?;
        ctx.set_text_align("center");
        for (c, cell) in cells.iter().enumerate() {
            draw_cell(&ctx, cell, ROW_LABEL_PX + c as f64 * CELL_PX, y);
        }
    }
    cv.to_data_url()
}
