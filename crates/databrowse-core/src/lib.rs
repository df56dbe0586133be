//! Selection, table and citation logic for the databrowse page.
//!
//! Nothing in this crate touches a DOM. Adapters (the wasm page binding and
//! the terminal client) read selection state, hand it to a
//! [`SubmitPipeline`], and draw the [`DataTable`] and [`CitationList`] it
//! produces through their own [`ResultsView`].

pub mod cascade;
pub mod citations;
pub mod client;
pub mod config_file;
pub mod fragments;
pub mod models;
pub mod pipeline;
pub mod selection;
pub mod table;

// Re-export for convenience
pub use cascade::{CascadeAction, CascadeTarget, on_category_change, on_context_change};
pub use citations::{CitationItem, CitationList, DatasetCitations, build_citation_list, format_ieee};
pub use client::{Backend, ClientError, HttpBackend};
pub use models::{Citation, CitationsResponse, DataMatrix, OptionEntry};
pub use pipeline::{ResultsView, SubmitOutcome, SubmitPipeline};
pub use selection::{Selection, SelectionError, ValidSelection};
pub use table::{DataTable, DatasetColumn, DatasetLabels, build_columns, build_table};

/// Element identifiers the page markup provides.
pub mod ids {
    pub const CATEGORY_SELECT: &str = "category-select";
    pub const CONTEXT_SELECT: &str = "context-select";
    pub const DATASETS_SELECT: &str = "datasets-select";
    pub const SUBMIT_BUTTON: &str = "submit-button";
    pub const RESULTS_CONTAINER: &str = "results-container";
    pub const CITATIONS_CONTAINER: &str = "citations-container";

    /// Identifier of the checkbox for one dataset.
    pub fn dataset_checkbox(dataset_id: &str) -> String {
        format!("dataset_{dataset_id}")
    }

    /// Anchor identifier of a citation list item.
    pub fn citation_anchor(index: usize) -> String {
        format!("citation_{index}")
    }
}
