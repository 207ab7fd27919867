use std::cell::RefCell;
use std::rc::Rc;

use hmpi_core::metric::element_name;
use hmpi_core::render::palette::tier_class;
use hmpi_core::render::table::{SortKey, TableRow, TableState, headers, table_rows};
use hmpi_core::{DatasetView, SampleId};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, Window};

use crate::canvas::draw_sample_heatmap;
use crate::state::State;
use crate::utils::{html_escape, log};

const CONTAINER_ID: &str = "samples";

/// Sample id, latitude, longitude and HMPI precede the metric columns.
const FIXED_COLUMNS: usize = 4;

fn sort_attr(col: usize) -> String {
    match col {
        0 => "id".to_string(),
        // latitude / longitude are not sortable
        1 | 2 => String::new(),
        3 => "hmpi".to_string(),
        c => format!("m:{}", c - FIXED_COLUMNS),
    }
}

fn parse_sort(attr: &str) -> Option<SortKey> {
    match attr {
        "id" => Some(SortKey::SampleId),
        "hmpi" => Some(SortKey::PollutionIndex),
        _ => attr
            .strip_prefix("m:")
            .and_then(|i| i.parse().ok())
            .map(SortKey::Metric),
    }
}

fn row_html(out: &mut String, row: &TableRow<'_>, columns: usize) {
    let class = if row.expanded { " class=\"expanded\"" } else { "" };
    out.push_str(&format!("<tr data-row=\"{}\"{}>", row.index, class));
    out.push_str(&format!(
        "<td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
        html_escape(row.sample_id.as_str()),
        row.latitude,
        row.longitude,
        row.pollution_index
    ));
    for cell in &row.cells {
        out.push_str(&format!(
            "<td class=\"{}\" title=\"{}\">{}</td>",
            cell.class,
            cell.tier.as_str(),
            cell.text
        ));
    }
    out.push_str("</tr>");

    if row.expanded {
        out.push_str(&format!(
            "<tr class=\"detail\"><td colspan=\"{}\"><ul>",
            columns
        ));
        for cell in &row.cells {
            out.push_str(&format!(
                "<li class=\"{}\">{}: {} ({})</li>",
                tier_class(cell.tier),
                html_escape(cell.metric.as_str()),
                cell.text,
                cell.tier.as_str()
            ));
        }
        out.push_str("</ul></td></tr>");
    }
}

fn header_html(out: &mut String, view: &DatasetView, heads: &[String]) {
    out.push_str("<thead><tr>");
    for (i, h) in heads.iter().enumerate() {
        let attr = sort_attr(i);
        let sort = if attr.is_empty() {
            String::new()
        } else {
            format!(" data-sort=\"{}\"", attr)
        };
        // full element name as a tooltip on metric columns
        let title = i
            .checked_sub(FIXED_COLUMNS)
            .and_then(|m| view.metrics().get(m))
            .and_then(|m| element_name(m.as_str()))
            .map(|name| format!(" title=\"{}\"", name))
            .unwrap_or_default();
        out.push_str(&format!("<th{}{}>{}</th>", sort, title, html_escape(h)));
    }
    out.push_str("</tr></thead>");
}

/// Redraw `#samples` and the expanded sample's heatmap.
pub fn render(state: &mut State) {
    let view = state.view();
    if let Some(container) = state.document.get_element_by_id(CONTAINER_ID) {
        let heads = headers(&view);
        let mut html = String::from("<table>");
        header_html(&mut html, &view, &heads);
        html.push_str("<tbody>");
        if view.is_empty() {
            html.push_str(&format!(
                "<tr><td colspan=\"{}\">No samples loaded</td></tr>",
                heads.len()
            ));
        }
        for row in table_rows(&view, &state.table) {
            row_html(&mut html, &row, heads.len());
        }
        html.push_str("</tbody></table>");
        container.set_inner_html(&html);
    }
    if let Some((canvas, ctx)) = &state.canvas {
        draw_sample_heatmap(canvas, ctx, &view, state.table.expanded);
    }
}

/// Let the host page react to an expanded row (e.g. to draw Chart.js charts)
/// through an optional `window.onSampleExpanded(id)`. The hook may call back
/// into the exported getters, so it must run with the state unborrowed.
fn notify_expanded(window: &Window, id: &str) {
    let Ok(hook) = js_sys::Reflect::get(window, &JsValue::from_str("onSampleExpanded")) else {
        return;
    };
    if let Some(f) = hook.dyn_ref::<js_sys::Function>()
        && let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(id))
    {
        log(&format!("onSampleExpanded failed: {:?}", e));
    }
}

/// Toggle `row` and return its sample id when the toggle opened it.
fn expand_row(table: &mut TableState, view: &DatasetView, row: usize) -> Option<SampleId> {
    table.toggle_expanded(row);
    if table.expanded != Some(row) {
        return None;
    }
    view.row(row).map(|series| series.id().clone())
}

/// Apply a click inside the table. Returns the id of a newly expanded row.
fn on_click(state: &mut State, target: &Element) -> Option<SampleId> {
    if let Ok(Some(th)) = target.closest("[data-sort]") {
        if let Some(key) = th.get_attribute("data-sort").as_deref().and_then(parse_sort) {
            state.table.sort_by(key);
            render(state);
        }
        return None;
    }
    let tr = target.closest("[data-row]").ok()??;
    let row = tr.get_attribute("data-row")?.parse::<usize>().ok()?;
    let view = state.view();
    let opened = expand_row(&mut state.table, &view, row);
    render(state);
    opened
}

/// Sorting and expansion through one delegated click handler on `#samples`.
pub fn attach_table(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(container) = doc.get_element_by_id(CONTAINER_ID) else {
        log("#samples not found; table disabled");
        return Ok(());
    };
    let st = state.clone();
    let onclick = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let (window, opened) = {
            let mut s = st.borrow_mut();
            (s.window.clone(), on_click(&mut s, &target))
        };
        if let Some(id) = opened {
            notify_expanded(&window, id.as_str());
        }
    }));
    container.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}
