//! Submit → data fetch → table → citations.
//!
//! Every valid submit takes a new generation number. Results are only handed
//! to the view while their generation is still the latest; anything a newer
//! submit has overtaken is dropped. In-flight requests are not cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::citations::{self, CitationList, build_citation_list};
use crate::client::{Backend, ClientError};
use crate::selection::{Selection, SelectionError};
use crate::table::{DataTable, DatasetLabels, build_columns, build_table};

/// Where the pipeline draws its results.
pub trait ResultsView {
    /// Blocking user-visible message for an incomplete selection.
    fn alert(&self, message: &str);
    /// Replace the results container with `table`.
    fn show_table(&self, table: &DataTable);
    /// Empty the citations container before the citation fetches start.
    fn clear_citations(&self);
    /// Replace the citations container with `citations`.
    fn show_citations(&self, citations: &CitationList);
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Selection incomplete; the view was alerted and nothing was requested.
    Invalid(SelectionError),
    /// `/data` failed. Logged only; citations were not fetched.
    DataFetchFailed(ClientError),
    /// A newer submit started while this one was in flight.
    Superseded,
    Rendered {
        table: DataTable,
        citations: CitationList,
    },
}

/// Runs submits against a [`Backend`]. Clones share the generation counter.
#[derive(Debug, Clone)]
pub struct SubmitPipeline<B> {
    backend: B,
    generation: Arc<AtomicU64>,
}

impl<B: Backend> SubmitPipeline<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generation of the most recent valid submit (0 before the first).
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    pub async fn submit<L, V>(&self, selection: &Selection, labels: &L, view: &V) -> SubmitOutcome
    where
        L: DatasetLabels + ?Sized,
        V: ResultsView + ?Sized,
    {
        let valid = match selection.validate() {
            Ok(v) => v,
            Err(e) => {
                view.alert(e.user_message());
                return SubmitOutcome::Invalid(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            generation,
            context_id = valid.context_id(),
            datasets = valid.dataset_ids().len(),
            "submitting selection"
        );

        let matrix = match self
            .backend
            .fetch_data(valid.context_id(), valid.dataset_ids())
            .await
        {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(generation, error = %e, "error fetching data");
                return SubmitOutcome::DataFetchFailed(e);
            }
        };
        if !self.is_current(generation) {
            tracing::debug!(generation, "discarding superseded data");
            return SubmitOutcome::Superseded;
        }

        let columns = build_columns(valid.dataset_ids(), labels);
        let table = build_table(&matrix, &columns);
        view.show_table(&table);
        view.clear_citations();

        let results = citations::fetch_all(&self.backend, valid.dataset_ids()).await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "discarding superseded citations");
            return SubmitOutcome::Superseded;
        }

        let citations = build_citation_list(&results);
        view.show_citations(&citations);
        tracing::debug!(
            generation,
            rows = table.rows.len(),
            citations = citations.len(),
            "submit rendered"
        );

        SubmitOutcome::Rendered { table, citations }
    }
}
