//! Server access used by the cascade and the submit pipeline.

mod http;

use thiserror::Error;

use crate::models::{Citation, DataMatrix};

pub use http::HttpBackend;

/// Endpoint paths served by `databrowse-web`.
pub mod paths {
    pub const CATEGORIES: &str = "/data_categories";
    pub const DATA: &str = "/data";

    pub fn contexts(category_id: &str) -> String {
        format!("/data_contexts/{category_id}")
    }

    pub fn datasets(category_id: &str, context_id: &str) -> String {
        format!("/data_sets/{category_id}/{context_id}")
    }

    pub fn citations(dataset_id: &str) -> String {
        format!("/citations/{dataset_id}")
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {path}")]
    Status { status: u16, path: String },
    #[error("invalid URL {0}")]
    Url(String),
}

/// The requests the page makes. Implemented over HTTP by [`HttpBackend`];
/// tests script their own.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// GET an HTML fragment (option list or dataset checkboxes).
    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError>;

    /// POST the selection to `/data` and parse the returned matrix.
    async fn fetch_data(
        &self,
        context_id: &str,
        dataset_ids: &[String],
    ) -> Result<DataMatrix, ClientError>;

    /// GET `/citations/{dataset_id}`.
    async fn fetch_citations(&self, dataset_id: &str) -> Result<Vec<Citation>, ClientError>;
}

impl<B: Backend> Backend for std::sync::Arc<B> {
    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError> {
        (**self).fetch_fragment(path).await
    }

    async fn fetch_data(
        &self,
        context_id: &str,
        dataset_ids: &[String],
    ) -> Result<DataMatrix, ClientError> {
        (**self).fetch_data(context_id, dataset_ids).await
    }

    async fn fetch_citations(&self, dataset_id: &str) -> Result<Vec<Citation>, ClientError> {
        (**self).fetch_citations(dataset_id).await
    }
}
