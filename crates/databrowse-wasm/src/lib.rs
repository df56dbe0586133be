//! Browser entry point: binds the page's selectors and submit button.
//!
//! Build with `wasm-pack build crates/databrowse-wasm --target web --out-dir
//! ../../static/pkg`; the server serves that directory under `/static`.

use std::rc::Rc;

use console_error_panic_hook::set_once;
use databrowse_core::client::paths;
use databrowse_core::{
    Backend, CascadeAction, Citation, ClientError, DataMatrix, HttpBackend, SubmitOutcome,
    SubmitPipeline, ids, on_category_change, on_context_change,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

mod dom;

use dom::{DomLabels, DomView, log_error};

/// [`HttpBackend`] that reports failed citation fetches on the console.
#[derive(Clone)]
struct ConsoleBackend(HttpBackend);

impl Backend for ConsoleBackend {
    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError> {
        self.0.fetch_fragment(path).await
    }

    async fn fetch_data(
        &self,
        context_id: &str,
        dataset_ids: &[String],
    ) -> Result<DataMatrix, ClientError> {
        self.0.fetch_data(context_id, dataset_ids).await
    }

    async fn fetch_citations(&self, dataset_id: &str) -> Result<Vec<Citation>, ClientError> {
        let result = self.0.fetch_citations(dataset_id).await;
        if let Err(e) = &result {
            log_error(
                &format!("Error fetching citations for dataset {dataset_id}:"),
                &e.to_string(),
            );
        }
        result
    }
}

struct Page {
    document: Document,
    pipeline: SubmitPipeline<ConsoleBackend>,
}

impl Page {
    /// Apply cascade actions in order. Loads run in the background and
    /// leave their target untouched when they fail.
    fn apply(self: &Rc<Self>, actions: Vec<CascadeAction>) {
        for action in actions {
            match action {
                CascadeAction::Reset { target, html } => {
                    dom::set_inner_html(&self.document, target.element_id(), html);
                }
                CascadeAction::Load { target, path } => {
                    self.load_fragment(target.element_id(), path);
                }
            }
        }
    }

    fn load_fragment(self: &Rc<Self>, element_id: &'static str, path: String) {
        let page = Rc::clone(self);
        spawn_local(async move {
            match page.pipeline.backend().fetch_fragment(&path).await {
                Ok(html) => dom::set_inner_html(&page.document, element_id, &html),
                Err(e) => log_error(&format!("Error loading {path}:"), &e.to_string()),
            }
        });
    }

    fn submit(self: &Rc<Self>) {
        let selection = dom::read_selection(&self.document);
        let page = Rc::clone(self);
        spawn_local(async move {
            let labels = DomLabels::new(page.document.clone());
            let view = DomView::new(page.document.clone());
            if let SubmitOutcome::DataFetchFailed(e) =
                page.pipeline.submit(&selection, &labels, &view).await
            {
                log_error("Error fetching data:", &e.to_string());
            }
        });
    }
}

fn on_event(
    document: &Document,
    id: &str,
    event: &str,
    handler: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?;
    let closure = Closure::<dyn FnMut()>::new(handler);
    el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // The listener lives as long as the page.
    closure.forget();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let origin = window.location().origin()?;
    let backend =
        HttpBackend::new(&origin).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let page = Rc::new(Page {
        document: document.clone(),
        pipeline: SubmitPipeline::new(ConsoleBackend(backend)),
    });

    page.load_fragment(ids::CATEGORY_SELECT, paths::CATEGORIES.to_string());

    let p = Rc::clone(&page);
    on_event(&document, ids::CATEGORY_SELECT, "change", move || {
        let category = dom::select_value(&p.document, ids::CATEGORY_SELECT);
        p.apply(on_category_change(&category));
    })?;

    let p = Rc::clone(&page);
    on_event(&document, ids::CONTEXT_SELECT, "change", move || {
        let category = dom::select_value(&p.document, ids::CATEGORY_SELECT);
        let context = dom::select_value(&p.document, ids::CONTEXT_SELECT);
        p.apply(on_context_change(&category, &context));
    })?;

    let p = Rc::clone(&page);
    on_event(&document, ids::SUBMIT_BUTTON, "click", move || p.submit())?;

    Ok(())
}
