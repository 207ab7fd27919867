use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use hmpi_core::render::table::TableState;
use hmpi_core::{
    Classifier, DatasetView, EngineConfig, IngestOptions, Sample, ThresholdTable, ViewCache,
    parse_dataset,
};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    /// `#heatmap`, when the page has one.
    pub canvas: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
    pub samples: Arc<[Sample]>,
    pub thresholds: Arc<ThresholdTable>,
    pub classifier: Classifier,
    pub ingest: IngestOptions,
    pub cache: ViewCache,
    pub table: TableState,
}

impl State {
    pub fn new(
        window: Window,
        document: Document,
        canvas: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
        config: &EngineConfig,
    ) -> hmpi_core::Result<Self> {
        Ok(State {
            window,
            document,
            canvas,
            samples: Arc::from(Vec::new()),
            thresholds: Arc::new(config.thresholds.clone()),
            classifier: config.classifier()?,
            ingest: config.ingest_options(),
            cache: ViewCache::new(),
            table: TableState::default(),
        })
    }

    /// Projection of the current dataset; rebuilt only after a new upload
    /// or a configuration change.
    pub fn view(&mut self) -> Arc<DatasetView> {
        self.cache
            .get_or_project(&self.samples, &self.thresholds, self.classifier)
    }

    /// Replace the dataset. Table sorting and expansion refer to the old
    /// rows, so they are reset too.
    pub fn load_dataset(&mut self, text: &str) -> hmpi_core::Result<usize> {
        let samples = parse_dataset(text, &self.ingest)?;
        let n = samples.len();
        self.samples = Arc::from(samples);
        self.table = TableState::default();
        Ok(n)
    }

    pub fn set_thresholds(&mut self, thresholds: ThresholdTable) {
        self.thresholds = Arc::new(thresholds);
    }

    pub fn set_elevated_ratio(&mut self, ratio: f64) -> hmpi_core::Result<()> {
        self.classifier = Classifier::new(ratio)?;
        Ok(())
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

pub fn current() -> Option<Rc<RefCell<State>>> {
    STATE.with(|st| st.borrow().clone())
}
