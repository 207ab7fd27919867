use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, FileReader, HtmlInputElement};

use crate::state::State;
use crate::table;
use crate::utils::log;

/// Parse `text` as a dataset into `state` and redraw; failures are logged
/// and shown to the user, leaving the previous dataset in place.
pub fn load_text(state: &mut State, source: &str, text: &str) {
    match state.load_dataset(text) {
        Ok(n) => {
            log(&format!("loaded {n} samples from {source}"));
            table::render(state);
        }
        Err(e) => {
            log(&format!("failed to load {source}: {e}"));
            let _ = state
                .window
                .alert_with_message(&format!("Could not read dataset: {e}"));
        }
    }
}

// Wires up the file input handler for loading JSON datasets.
pub fn attach_file_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc: Document = state.borrow().document.clone();
    let Some(input) = doc.get_element_by_id("file") else {
        return Ok(());
    };
    let input: HtmlInputElement = input.dyn_into()?;
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(file) = input_for_closure.files().and_then(|files| files.item(0)) else {
            log("No file selected");
            return;
        };
        let reader = match FileReader::new() {
            Ok(r) => r,
            Err(e) => {
                log(&format!("FileReader unavailable: {:?}", e));
                return;
            }
        };
        let st2 = st.clone();
        let name = file.name();
        let reader_for_closure = reader.clone();
        let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_ev: Event| {
            let text = reader_for_closure
                .result()
                .ok()
                .and_then(|r| r.as_string())
                .unwrap_or_default();
            if text.is_empty() {
                log("Selected file is empty or unreadable");
                return;
            }
            load_text(&mut st2.borrow_mut(), &name, &text);
        }));
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        if let Err(e) = reader.read_as_text(&file) {
            log(&format!("Failed to read file: {:?}", e));
        }
        onload.forget();
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}
