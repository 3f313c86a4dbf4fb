use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::api::{ConsolidationBackend, SubmissionResult};
use crate::monitoring::events;

use super::bundle::SubmissionBatch;
use super::error::LanderError;
use super::rate_limit::RateLimiter;

/// 经限流后把批次交给后端提交。限流器由调用方共享，所有提交方共用同一个窗口。
pub struct BundleLander<B: ?Sized> {
    backend: Arc<B>,
    limiter: Arc<RateLimiter>,
}

impl<B: ?Sized> Clone for BundleLander<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

impl<B> BundleLander<B>
where
    B: ConsolidationBackend + ?Sized,
{
    pub fn new(backend: Arc<B>, limiter: Arc<RateLimiter>) -> Self {
        Self { backend, limiter }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub async fn submit(&self, batch: &SubmissionBatch) -> Result<SubmissionResult, LanderError> {
        debug_assert!(!batch.is_empty(), "batch #{} has no transactions", batch.index());

        self.limiter.permit().await;

        let started = Instant::now();
        let encoded = batch.encoded_transactions();
        let result = match self.backend.submit_batch(&encoded).await {
            Ok(result) => result,
            Err(err) => {
                events::batch_failed(batch.index(), batch.len(), &err);
                return Err(err.into());
            }
        };
        let elapsed = started.elapsed();

        match &result {
            SubmissionResult::Accepted { bundle_id } => info!(
                target: "lander::bundle",
                batch = batch.index(),
                transactions = batch.len(),
                bundle_id = %bundle_id,
                "bundle accepted"
            ),
            SubmissionResult::Rejected { code, message } => warn!(
                target: "lander::bundle",
                batch = batch.index(),
                transactions = batch.len(),
                code,
                message = %message,
                "bundle rejected by backend"
            ),
        }
        events::batch_submitted(batch.index(), batch.len(), &result, elapsed);

        Ok(result)
    }
}
