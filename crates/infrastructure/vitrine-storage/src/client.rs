use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::warn;

const UPLOAD_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("storage rejected {key} with status {status}")]
    Rejected { key: String, status: StatusCode },
    #[error("storage unreachable after {attempts} attempts: {key}")]
    Exhausted { key: String, attempts: u32 },
}

pub fn default_client() -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .build()
}

/// Bucket-backed object store speaking plain HTTP PUT/DELETE. The public URL
/// of an object is derived from bucket, region and key; `endpoint` overrides
/// the derived base for tests and self-hosted gateways.
pub struct HttpObjectStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl HttpObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(base) => format!("{base}/{key}"),
            None => vitrine_core::public_url(&self.bucket, &self.region, key),
        }
    }

    pub async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let url = self.object_url(key);
        let mut last_status: Option<StatusCode> = None;

        for attempt in 1..=UPLOAD_ATTEMPTS {
            let res = self
                .client
                .put(&url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body.clone())
                .send()
                .await;

            match res {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                Ok(resp) if resp.status().is_client_error() => {
                    // 4xx will not improve on retry.
                    return Err(ObjectStoreError::Rejected {
                        key: key.to_string(),
                        status: resp.status(),
                    });
                }
                Ok(resp) => {
                    last_status = Some(resp.status());
                    warn!(key, status = %resp.status(), attempt, "object upload failed");
                }
                Err(err) => {
                    warn!(key, attempt, "object upload error: {err}");
                }
            }
            tokio::time::sleep(RETRY_BACKOFF).await;
        }

        match last_status {
            Some(status) => Err(ObjectStoreError::Rejected {
                key: key.to_string(),
                status,
            }),
            None => Err(ObjectStoreError::Exhausted {
                key: key.to_string(),
                attempts: UPLOAD_ATTEMPTS,
            }),
        }
    }

    /// Deleting an object that is already gone is a success: delete is the
    /// cleanup half of a best-effort cascade and must stay idempotent.
    pub async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        let url = self.object_url(key);
        let resp = self.client.delete(&url).send().await?;
        if resp.status().is_success() || resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(ObjectStoreError::Rejected {
            key: key.to_string(),
            status: resp.status(),
        })
    }
}

#[async_trait::async_trait]
impl vitrine_catalog::ObjectStore for HttpObjectStore {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        Ok(self.put(key, body, content_type).await?)
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        Ok(self.delete(key).await?)
    }

    fn public_url(&self, key: &str) -> String {
        self.object_url(key)
    }
}
