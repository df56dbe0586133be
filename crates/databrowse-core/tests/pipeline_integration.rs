//! Integration tests for [`SubmitPipeline`].
//!
//! A scripted backend answers with per-request latency under tokio's paused
//! clock, so completion order can be forced without real I/O.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use databrowse_core::{
    Backend, Citation, CitationList, ClientError, DataMatrix, DataTable, ResultsView, Selection,
    SelectionError, SubmitOutcome, SubmitPipeline,
};
use serde_json::json;

type Scripted<T> = (Duration, Result<T, u16>);

/// Hand-rolled [`Backend`] with canned answers.
#[derive(Default)]
struct ScriptedBackend {
    /// Keyed by context ID.
    data: HashMap<String, Scripted<DataMatrix>>,
    /// Keyed by dataset ID; unknown IDs answer 404.
    citations: HashMap<String, Scripted<Vec<Citation>>>,
    requests: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn with_data(mut self, context_id: &str, delay_ms: u64, matrix: Result<DataMatrix, u16>) -> Self {
        self.data
            .insert(context_id.to_string(), (Duration::from_millis(delay_ms), matrix));
        self
    }

    fn with_citations(
        mut self,
        dataset_id: &str,
        delay_ms: u64,
        citations: Result<Vec<Citation>, u16>,
    ) -> Self {
        self.citations.insert(
            dataset_id.to_string(),
            (Duration::from_millis(delay_ms), citations),
        );
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

fn status(code: u16, path: String) -> ClientError {
    ClientError::Status { status: code, path }
}

impl Backend for ScriptedBackend {
    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError> {
        self.requests.lock().unwrap().push(format!("GET {path}"));
        Err(status(404, path.to_string()))
    }

    async fn fetch_data(
        &self,
        context_id: &str,
        dataset_ids: &[String],
    ) -> Result<DataMatrix, ClientError> {
        let path = "/data".to_string();
        self.requests
            .lock()
            .unwrap()
            .push(format!("POST /data {context_id} {}", dataset_ids.join(",")));
        let (delay, answer) = self
            .data
            .get(context_id)
            .cloned()
            .unwrap_or((Duration::ZERO, Err(404)));
        tokio::time::sleep(delay).await;
        answer.map_err(|code| status(code, path))
    }

    async fn fetch_citations(&self, dataset_id: &str) -> Result<Vec<Citation>, ClientError> {
        let path = format!("/citations/{dataset_id}");
        self.requests.lock().unwrap().push(format!("GET {path}"));
        let (delay, answer) = self
            .citations
            .get(dataset_id)
            .cloned()
            .unwrap_or((Duration::ZERO, Err(404)));
        tokio::time::sleep(delay).await;
        self.completed.lock().unwrap().push(dataset_id.to_string());
        answer.map_err(|code| status(code, path))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ViewEvent {
    Alert(String),
    Table(DataTable),
    ClearCitations,
    Citations(CitationList),
}

#[derive(Default)]
struct RecordingView {
    events: RefCell<Vec<ViewEvent>>,
}

impl RecordingView {
    fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }
}

impl ResultsView for RecordingView {
    fn alert(&self, message: &str) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Alert(message.to_string()));
    }

    fn show_table(&self, table: &DataTable) {
        self.events.borrow_mut().push(ViewEvent::Table(table.clone()));
    }

    fn clear_citations(&self) {
        self.events.borrow_mut().push(ViewEvent::ClearCitations);
    }

    fn show_citations(&self, citations: &CitationList) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Citations(citations.clone()));
    }
}

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn cite(author: &str) -> Citation {
    Citation {
        citation_id: Some(1),
        text: Some(format!("{author} dataset")),
        author: Some(author.to_string()),
        url: Some(format!("https://{}.example", author.to_lowercase())),
        start_date: Some("2000-01-01".into()),
        end_date: Some("2010-01-01".into()),
        date_accessed: Some("2024-01-01".into()),
    }
}

fn matrix() -> DataMatrix {
    serde_json::from_value(json!({
        "Norway": {"Alpha": 1, "Beta": 2},
        "Chile": {"Alpha": 3}
    }))
    .unwrap()
}

#[tokio::test]
async fn incomplete_selection_alerts_without_requests() {
    let pipeline = SubmitPipeline::new(ScriptedBackend::default());

    let cases = [
        Selection::new("", "", vec![]),
        Selection::new("1", "", vec![]),
        Selection::new("", "2", vec![]),
        Selection::new("", "", ids(&["3"])),
        Selection::new("1", "2", vec![]),
        Selection::new("1", "", ids(&["3"])),
        Selection::new("", "2", ids(&["3"])),
    ];
    for selection in &cases {
        let view = RecordingView::default();
        let outcome = pipeline.submit(selection, &labels(&[]), &view).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(
            view.events(),
            vec![ViewEvent::Alert(
                "Please select a category, context, and at least one dataset.".into()
            )]
        );
    }

    assert!(pipeline.backend().requests().is_empty());
    assert_eq!(pipeline.current_generation(), 0);
}

#[tokio::test]
async fn missing_category_reported_first() {
    let pipeline = SubmitPipeline::new(ScriptedBackend::default());
    let outcome = pipeline
        .submit(&Selection::default(), &labels(&[]), &RecordingView::default())
        .await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Invalid(SelectionError::MissingCategory)
    ));
}

#[tokio::test(start_paused = true)]
async fn renders_table_then_citations() {
    let backend = ScriptedBackend::default()
        .with_data("2", 5, Ok(matrix()))
        .with_citations("10", 1, Ok(vec![cite("Alpha")]))
        .with_citations("11", 1, Ok(vec![]));
    let pipeline = SubmitPipeline::new(backend);
    let view = RecordingView::default();

    let outcome = pipeline
        .submit(
            &Selection::new("1", "2", ids(&["10", "11"])),
            &labels(&[("10", "Alpha"), ("11", "Beta")]),
            &view,
        )
        .await;

    let SubmitOutcome::Rendered { table, citations } = outcome else {
        panic!("expected a rendered outcome");
    };
    assert_eq!(table.headers, vec!["Entity", "Alpha [1]", "Beta [2]"]);
    assert_eq!(table.rows, vec![vec!["Norway", "1", "2"], vec!["Chile", "3", "N/A"]]);
    assert_eq!(citations.len(), 2);
    assert_eq!(citations.items[1].text, "[2] No citation available.");

    let events = view.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ViewEvent::Table(_)));
    assert_eq!(events[1], ViewEvent::ClearCitations);
    assert!(matches!(events[2], ViewEvent::Citations(_)));

    assert_eq!(
        pipeline.backend().requests()[0],
        "POST /data 2 10,11".to_string()
    );
}

#[tokio::test(start_paused = true)]
async fn citation_numbering_ignores_completion_order() {
    let backend = ScriptedBackend::default()
        .with_data("2", 0, Ok(matrix()))
        .with_citations("A", 50, Ok(vec![cite("Alpha")]))
        .with_citations("B", 10, Ok(vec![cite("Beta")]));
    let pipeline = SubmitPipeline::new(backend);

    let outcome = pipeline
        .submit(
            &Selection::new("1", "2", ids(&["A", "B"])),
            &labels(&[("A", "Alpha"), ("B", "Beta")]),
            &RecordingView::default(),
        )
        .await;

    assert_eq!(pipeline.backend().completed(), ids(&["B", "A"]));
    let SubmitOutcome::Rendered { citations, .. } = outcome else {
        panic!("expected a rendered outcome");
    };
    assert!(citations.items[0].text.starts_with("[1] Alpha,"));
    assert_eq!(citations.items[0].element_id, "citation_1");
    assert!(citations.items[1].text.starts_with("[2] Beta,"));
    assert_eq!(citations.items[1].element_id, "citation_2");
}

#[tokio::test(start_paused = true)]
async fn one_failed_citation_fetch_degrades_alone() {
    let backend = ScriptedBackend::default()
        .with_data("2", 0, Ok(matrix()))
        .with_citations("A", 5, Err(500))
        .with_citations("B", 30, Ok(vec![cite("Beta"), cite("Gamma")]));
    let pipeline = SubmitPipeline::new(backend);

    let outcome = pipeline
        .submit(
            &Selection::new("1", "2", ids(&["A", "B"])),
            &labels(&[]),
            &RecordingView::default(),
        )
        .await;

    let SubmitOutcome::Rendered { citations, .. } = outcome else {
        panic!("expected a rendered outcome");
    };
    let texts: Vec<&str> = citations.items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts[0], "[1] No citation available.");
    assert!(texts[1].starts_with("[2] Beta,"));
    assert!(texts[2].starts_with("[2] Gamma,"));
}

#[tokio::test(start_paused = true)]
async fn data_failure_skips_table_and_citations() {
    let backend = ScriptedBackend::default()
        .with_data("2", 0, Err(500))
        .with_citations("A", 0, Ok(vec![cite("Alpha")]));
    let pipeline = SubmitPipeline::new(backend);
    let view = RecordingView::default();

    let outcome = pipeline
        .submit(&Selection::new("1", "2", ids(&["A"])), &labels(&[]), &view)
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::DataFetchFailed(ClientError::Status { status: 500, .. })
    ));
    assert!(view.events().is_empty());
    assert_eq!(pipeline.backend().requests(), vec!["POST /data 2 A".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn stale_submit_is_discarded() {
    let backend = ScriptedBackend::default()
        .with_data("slow", 100, Ok(matrix()))
        .with_data("fast", 10, Ok(matrix()))
        .with_citations("A", 5, Ok(vec![cite("Alpha")]));
    let pipeline = SubmitPipeline::new(backend);
    let first_view = RecordingView::default();
    let second_view = RecordingView::default();
    let names = labels(&[("A", "Alpha")]);

    let first = Selection::new("1", "slow", ids(&["A"]));
    let second = Selection::new("1", "fast", ids(&["A"]));
    let (first_outcome, second_outcome) = tokio::join!(
        pipeline.submit(&first, &names, &first_view),
        pipeline.submit(&second, &names, &second_view),
    );

    assert!(matches!(first_outcome, SubmitOutcome::Superseded));
    assert!(first_view.events().is_empty());
    assert!(matches!(second_outcome, SubmitOutcome::Rendered { .. }));
    assert_eq!(second_view.events().len(), 3);
    assert_eq!(pipeline.current_generation(), 2);
}

#[tokio::test(start_paused = true)]
async fn newer_submit_during_citation_fetch_drops_older_citations() {
    let backend = ScriptedBackend::default()
        .with_data("first", 0, Ok(matrix()))
        .with_data("second", 20, Ok(matrix()))
        .with_citations("slow", 100, Ok(vec![cite("Alpha")]))
        .with_citations("quick", 1, Ok(vec![cite("Beta")]));
    let pipeline = SubmitPipeline::new(backend);
    let first_view = RecordingView::default();
    let second_view = RecordingView::default();
    let names = labels(&[]);

    let first = Selection::new("1", "first", ids(&["slow"]));
    let second = Selection::new("1", "second", ids(&["quick"]));
    let (first_outcome, _) = tokio::join!(
        pipeline.submit(&first, &names, &first_view),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            pipeline.submit(&second, &names, &second_view).await
        },
    );

    assert!(matches!(first_outcome, SubmitOutcome::Superseded));
    // The older table was already drawn; only its citations are dropped.
    let events = first_view.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ViewEvent::Table(_)));
    assert_eq!(events[1], ViewEvent::ClearCitations);
    assert!(matches!(
        second_view.events().last(),
        Some(ViewEvent::Citations(_))
    ));
}
