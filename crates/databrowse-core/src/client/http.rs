use std::time::Duration;

use reqwest::{Client, Response, Url};

use super::{Backend, ClientError, paths};
use crate::models::{Citation, CitationsResponse, DataMatrix};

/// [`Backend`] over `reqwest`, rooted at the server's base URL.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(base_url, Client::new())
    }

    /// Build a backend whose requests give up after `timeout`.
    ///
    /// Browsers own request timeouts, so the value only applies natively.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = Client::builder().timeout(timeout).build()?;
        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = timeout;
            Client::new()
        };
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::Url(format!("{base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Url(format!("{path}: {e}")))
    }

    async fn get(&self, path: &str) -> Result<Response, ClientError> {
        let resp = self.client.get(self.url(path)?).send().await?;
        check_status(resp, path)
    }
}

fn check_status(resp: Response, path: &str) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        })
    }
}

impl Backend for HttpBackend {
    async fn fetch_fragment(&self, path: &str) -> Result<String, ClientError> {
        let resp = self.get(path).await?;
        Ok(resp.text().await?)
    }

    async fn fetch_data(
        &self,
        context_id: &str,
        dataset_ids: &[String],
    ) -> Result<DataMatrix, ClientError> {
        let mut form = reqwest::multipart::Form::new().text("context_id", context_id.to_string());
        for id in dataset_ids {
            form = form.text("datasets", id.clone());
        }

        let resp = self
            .client
            .post(self.url(paths::DATA)?)
            .multipart(form)
            .send()
            .await?;
        let resp = check_status(resp, paths::DATA)?;
        Ok(resp.json::<DataMatrix>().await?)
    }

    async fn fetch_citations(&self, dataset_id: &str) -> Result<Vec<Citation>, ClientError> {
        let path = paths::citations(dataset_id);
        let resp = self.get(&path).await?;
        let body: CitationsResponse = resp.json().await?;
        Ok(body.citations)
    }
}
