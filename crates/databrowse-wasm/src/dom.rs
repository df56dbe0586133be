//! DOM side of the page: reading selections and drawing results.

use databrowse_core::{
    CitationList, DataTable, DatasetLabels, ResultsView, Selection, ids,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

pub fn log_error(message: &str, detail: &str) {
    web_sys::console::error_2(&JsValue::from_str(message), &JsValue::from_str(detail));
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
}

/// Current value of a `<select>`, empty if absent.
pub fn select_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        .map(|select| select.value())
        .unwrap_or_default()
}

pub fn set_inner_html(document: &Document, id: &str, html: &str) {
    match element(document, id) {
        Ok(el) => el.set_inner_html(html),
        Err(e) => log_error("Cannot update container:", &describe(&e)),
    }
}

/// Category, context and checked datasets as the page shows them now.
pub fn read_selection(document: &Document) -> Selection {
    let mut dataset_ids = Vec::new();
    let query = format!(
        "#{} input[type=\"checkbox\"]:checked",
        ids::DATASETS_SELECT
    );
    if let Ok(nodes) = document.query_selector_all(&query) {
        for i in 0..nodes.length() {
            if let Some(input) = nodes
                .item(i)
                .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            {
                dataset_ids.push(input.value());
            }
        }
    }

    Selection::new(
        select_value(document, ids::CATEGORY_SELECT),
        select_value(document, ids::CONTEXT_SELECT),
        dataset_ids,
    )
}

pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Dataset names taken from the label next to each `dataset_<id>` checkbox.
pub struct DomLabels {
    document: Document,
}

impl DomLabels {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl DatasetLabels for DomLabels {
    fn label(&self, dataset_id: &str) -> Option<String> {
        self.document
            .get_element_by_id(&ids::dataset_checkbox(dataset_id))?
            .next_element_sibling()?
            .text_content()
    }
}

/// Draws into `#results-container` and `#citations-container`.
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn draw_table(&self, table: &DataTable) -> Result<(), JsValue> {
        let container = element(&self.document, ids::RESULTS_CONTAINER)?;
        container.set_inner_html("");

        let table_el = self.document.create_element("table")?;
        table_el.set_attribute("border", "1")?;
        table_el.set_attribute("style", "border-collapse: collapse; width: 100%;")?;

        let thead = self.document.create_element("thead")?;
        let header_row = self.document.create_element("tr")?;
        for header in &table.headers {
            let th = self.document.create_element("th")?;
            th.set_text_content(Some(header));
            header_row.append_child(&th)?;
        }
        thead.append_child(&header_row)?;
        table_el.append_child(&thead)?;

        let tbody = self.document.create_element("tbody")?;
        for row in &table.rows {
            let tr = self.document.create_element("tr")?;
            for cell in row {
                let td = self.document.create_element("td")?;
                td.set_text_content(Some(cell));
                tr.append_child(&td)?;
            }
            tbody.append_child(&tr)?;
        }
        table_el.append_child(&tbody)?;

        container.append_child(&table_el)?;
        Ok(())
    }

    fn draw_citations(&self, citations: &CitationList) -> Result<(), JsValue> {
        let container = element(&self.document, ids::CITATIONS_CONTAINER)?;
        container.set_inner_html("");

        let list = self.document.create_element("ul")?;
        for item in &citations.items {
            let li = self.document.create_element("li")?;
            li.set_attribute("style", "margin-bottom: 10px;")?;
            li.set_id(&item.element_id);
            li.set_text_content(Some(&item.text));
            list.append_child(&li)?;
        }
        container.append_child(&list)?;
        Ok(())
    }
}

impl ResultsView for DomView {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn show_table(&self, table: &DataTable) {
        if let Err(e) = self.draw_table(table) {
            log_error("Error rendering table:", &describe(&e));
        }
    }

    fn clear_citations(&self) {
        set_inner_html(&self.document, ids::CITATIONS_CONTAINER, "");
    }

    fn show_citations(&self, citations: &CitationList) {
        if let Err(e) = self.draw_citations(citations) {
            log_error("Error rendering citations:", &describe(&e));
        }
    }
}
