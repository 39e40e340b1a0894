use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Errors surfaced by the document store. `Conflict` carries unique-index
/// violations so callers can drive conditional-write retries.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("store error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Thin HTTP client for the clinic's JSON document store. Rows live under
/// `/rest/v1/{table}` and are filtered with equality/order/limit query
/// parameters; writes ask for `return=representation` so callers can see
/// exactly what was persisted.
pub struct StoreClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            service_key: config.store_service_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, returning: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key).unwrap());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key)).unwrap(),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if returning {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        returning: bool,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request: {} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers(returning));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::Conflict(error_text),
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                _ => StoreError::Api {
                    status: status.as_u16(),
                    body: error_text,
                },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Fetch rows matching a filtered path, e.g.
    /// `/rest/v1/patients?phone=eq.01711111111&limit=1`.
    pub async fn select<T>(&self, path: &str) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, None, false).await
    }

    /// Insert a document and return the stored representation. A unique-index
    /// violation comes back as `StoreError::Conflict`.
    pub async fn insert<T>(&self, path: &str, doc: Value) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(doc), true).await
    }

    /// Conditionally patch rows matching the filter; the returned vector is
    /// empty when no row satisfied it, which callers use as a compare-and-swap
    /// failure signal.
    pub async fn update<T>(&self, path: &str, patch: Value) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(patch), true).await
    }

    /// Delete rows matching the filter. The store answers 204 with no body,
    /// so only the status is checked.
    pub async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request: DELETE {}", url);

        let response = self
            .client
            .request(Method::DELETE, &url)
            .headers(self.headers(false))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);
            return Err(StoreError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        Ok(())
    }
}
