//! Browser runtime: loads a dataset, renders the samples table and heatmap,
//! and hands JSON payloads to Chart.js / Leaflet on the host page.

use std::cell::RefCell;
use std::rc::Rc;

use hmpi_core::render::chart::{self as charts, ChartKind};
use hmpi_core::render::heatmap::{dataset_heatmap, sample_heatmap};
use hmpi_core::render::{csv, map, summary as summaries, svg};
use hmpi_core::{EngineConfig, ThresholdTable};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

mod canvas;
mod state;
mod table;
mod upload;
mod utils;

use state::State;
use utils::{
    asset_url, fetch_text_with_fallbacks, get_query_param, js_err, log, save_data_url,
    save_text_as_file, to_json,
};

fn with_state<R>(f: impl FnOnce(&mut State) -> Result<R, JsValue>) -> Result<R, JsValue> {
    let st = state::current().ok_or_else(|| JsValue::from_str("runtime not started"))?;
    let mut s = st
        .try_borrow_mut()
        .map_err(|_| JsValue::from_str("runtime busy: called from inside a state update"))?;
    f(&mut s)
}

/// Load a dataset (upload response or bare record array) and redraw.
/// Returns the number of samples.
#[wasm_bindgen]
pub fn load_dataset_json(text: &str) -> Result<usize, JsValue> {
    with_state(|s| {
        let n = s.load_dataset(text).map_err(js_err)?;
        table::render(s);
        Ok(n)
    })
}

#[wasm_bindgen]
pub fn set_thresholds_json(text: &str) -> Result<(), JsValue> {
    let thresholds = ThresholdTable::from_json(text).map_err(js_err)?;
    with_state(|s| {
        s.set_thresholds(thresholds);
        table::render(s);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn set_elevated_ratio(ratio: f64) -> Result<(), JsValue> {
    with_state(|s| {
        s.set_elevated_ratio(ratio).map_err(js_err)?;
        table::render(s);
        Ok(())
    })
}

/// Ordered metric list as a JSON array.
#[wasm_bindgen]
pub fn metrics() -> Result<String, JsValue> {
    with_state(|s| to_json(&s.view().metrics()))
}

#[wasm_bindgen]
pub fn series(sample_id: &str) -> Result<String, JsValue> {
    with_state(|s| {
        let view = s.view();
        let entries = view
            .series(sample_id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown sample {sample_id}")))?;
        to_json(&entries)
    })
}

/// Chart.js config for one sample; `kind` is bar, line, pie or radar.
#[wasm_bindgen]
pub fn chart(sample_id: &str, kind: &str) -> Result<String, JsValue> {
    let kind: ChartKind = kind.parse().map_err(js_err)?;
    with_state(|s| {
        let view = s.view();
        let row = view
            .sample(sample_id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown sample {sample_id}")))?;
        to_json(&charts::chart(kind, row))
    })
}

/// Heatmap cells of one sample, or the whole samples x metrics grid when
/// no id is given.
#[wasm_bindgen]
pub fn heatmap(sample_id: Option<String>) -> Result<String, JsValue> {
    with_state(|s| {
        let view = s.view();
        match sample_id {
            Some(id) => {
                let cells = view
                    .row_index(&id)
                    .and_then(|row| sample_heatmap(&view, row))
                    .ok_or_else(|| JsValue::from_str(&format!("unknown sample {id}")))?;
                to_json(&cells)
            }
            None => to_json(&dataset_heatmap(&view)),
        }
    })
}

#[derive(Serialize)]
struct MapPayload {
    markers: Vec<map::MapMarker>,
    extent: map::MapExtent,
}

#[wasm_bindgen]
pub fn map_markers() -> Result<String, JsValue> {
    with_state(|s| {
        let markers = map::markers(&s.view());
        let extent = map::extent(&markers);
        to_json(&MapPayload { markers, extent })
    })
}

#[wasm_bindgen]
pub fn summary() -> Result<String, JsValue> {
    with_state(|s| to_json(&summaries::summarize(&s.view())))
}

#[wasm_bindgen]
pub fn charts_csv() -> Result<String, JsValue> {
    with_state(|s| Ok(csv::charts_csv(&s.view())))
}

fn attach_button(
    state: &Rc<RefCell<State>>,
    id: &str,
    action: fn(&mut State) -> Result<(), JsValue>,
) -> Result<(), JsValue> {
    let Some(btn) = state.borrow().document.get_element_by_id(id) else {
        return Ok(());
    };
    let btn: HtmlElement = btn.dyn_into()?;
    let st = state.clone();
    let label = id.to_string();
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        if let Err(e) = action(&mut st.borrow_mut()) {
            log(&format!("{label} failed: {:?}", e));
        }
    }));
    btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
    Ok(())
}

fn export_csv(s: &mut State) -> Result<(), JsValue> {
    let text = csv::charts_csv(&s.view());
    save_text_as_file(&s.document, "hmpi_charts_data.csv", &text)
}

fn export_svg(s: &mut State) -> Result<(), JsValue> {
    let (text, _, _) = svg::heatmap_svg(&s.view(), 40.0);
    save_text_as_file(&s.document, "hmpi_heatmap.svg", &text)
}

fn export_png(s: &mut State) -> Result<(), JsValue> {
    let view = s.view();
    let url = canvas::dataset_heatmap_png(&s.document, &view)?;
    save_data_url(&s.document, "hmpi_heatmap.png", &url)
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    upload::attach_file_input(state.clone())?;
    table::attach_table(state.clone())?;
    attach_button(&state, "exportCsv", export_csv)?;
    attach_button(&state, "exportSvg", export_svg)?;
    attach_button(&state, "exportPng", export_png)?;
    Ok(())
}

/// `?thresholds=<url>` then `?data=<url>`; thresholds first so the first
/// projection already uses them.
async fn load_from_query(window: Window, search: String) {
    if let Some(url) = get_query_param(&search, "thresholds") {
        let text = fetch_text_with_fallbacks(&window, &[&asset_url(&url), &url]).await;
        match text.map(|t| ThresholdTable::from_json(&t)) {
            Some(Ok(t)) => {
                if let Some(st) = state::current() {
                    st.borrow_mut().set_thresholds(t);
                }
            }
            Some(Err(e)) => log(&format!("ignoring thresholds from {url}: {e}")),
            None => log(&format!("could not fetch thresholds from {url}")),
        }
    }
    if let Some(url) = get_query_param(&search, "data") {
        let Some(text) = fetch_text_with_fallbacks(&window, &[&asset_url(&url), &url]).await
        else {
            log(&format!("could not fetch dataset from {url}"));
            return;
        };
        if let Some(st) = state::current() {
            upload::load_text(&mut st.borrow_mut(), &url, &text);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas = match canvas::init_canvas(&document, "heatmap") {
        Ok(c) => Some(c),
        Err(e) => {
            log(&format!("heatmap canvas disabled: {:?}", e));
            None
        }
    };

    let search = window.location().search().unwrap_or_default();
    let mut config = EngineConfig::default();
    if let Some(r) = get_query_param(&search, "ratio") {
        match r.parse::<f64>() {
            Ok(v) => config.elevated_ratio = v,
            Err(_) => log(&format!("ignoring ratio={r}")),
        }
    }
    let state = match State::new(window.clone(), document.clone(), canvas.clone(), &config) {
        Ok(s) => s,
        Err(e) => {
            log(&format!("{e}; using defaults"));
            State::new(window.clone(), document, canvas, &EngineConfig::default())
                .map_err(js_err)?
        }
    };
    let state = Rc::new(RefCell::new(state));
    state::STATE.with(|st| st.replace(Some(state.clone())));

    attach_ui(state.clone())?;
    table::render(&mut state.borrow_mut());

    wasm_bindgen_futures::spawn_local(load_from_query(window, search));
    Ok(())
}
