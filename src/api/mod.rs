use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::BackendConfig;

pub mod error;
pub mod types;

pub use error::BackendError;
pub use types::{PrepareRequest, PrepareResponse, SubmissionResult, SubmitRequest, SubmitResponse};

const PREPARE_PATH: &str = "/api/consolidate/prepare";
const SUBMIT_PATH: &str = "/api/bundle/submit";

/// 归集流程依赖的两个后端能力：生成部分签名交易、代理提交批次。
#[async_trait]
pub trait ConsolidationBackend: Send + Sync {
    async fn prepare_transactions(
        &self,
        request: &PrepareRequest,
    ) -> Result<Vec<String>, BackendError>;

    async fn submit_batch(&self, transactions: &[String])
    -> Result<SubmissionResult, BackendError>;
}

#[derive(Clone, Debug)]
pub struct BackendApiClient {
    base_url: String,
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl BackendApiClient {
    pub fn new(client: reqwest::Client, base_url: String, config: &BackendConfig) -> Self {
        let request_timeout =
            (config.request_timeout_ms > 0).then(|| Duration::from_millis(config.request_timeout_ms));
        Self {
            base_url,
            client,
            request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request: RequestBuilder = self.client.post(url).json(body);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        parse_response(url, response).await
    }
}

async fn parse_response<T: DeserializeOwned>(
    url: &str,
    response: Response,
) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::ApiStatus {
            endpoint: url.to_string(),
            status,
            body,
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl ConsolidationBackend for BackendApiClient {
    async fn prepare_transactions(
        &self,
        request: &PrepareRequest,
    ) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(PREPARE_PATH);
        let start = Instant::now();
        let response: PrepareResponse = self.post_json(&url, request).await?;
        let transactions = response.into_transactions()?;

        info!(
            target: "api::backend",
            sources = request.source_addresses.len(),
            percentage = request.percentage,
            transactions = transactions.len(),
            elapsed_ms = start.elapsed().as_micros() as f64 / 1_000.0,
            "已获取部分签名的归集交易"
        );
        Ok(transactions)
    }

    async fn submit_batch(
        &self,
        transactions: &[String],
    ) -> Result<SubmissionResult, BackendError> {
        let url = self.endpoint(SUBMIT_PATH);
        let start = Instant::now();
        let body = SubmitRequest {
            transactions,
            encoding: "base64",
        };
        let response: SubmitResponse = self.post_json(&url, &body).await?;
        let result = SubmissionResult::try_from(response)?;

        debug!(
            target: "api::backend",
            transactions = transactions.len(),
            accepted = result.is_accepted(),
            elapsed_ms = start.elapsed().as_micros() as f64 / 1_000.0,
            "bundle submission answered"
        );
        Ok(result)
    }
}
