use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::api::{ConsolidationBackend, PrepareRequest, SubmissionResult};
use crate::config::SubmissionConfig;
use crate::lander::{BundleLander, DEFAULT_MAX_BATCH_SIZE, RateLimiter, build_batches};
use crate::monitoring::events;
use crate::wallet::{BalanceBook, WalletRecord};

use super::completer::complete_transactions;
use super::error::EngineResult;
use super::identity::SignerRegistry;
use super::scheduler::BatchPacer;
use super::types::ConsolidationOutcome;
use super::validation::validate_inputs;

const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug)]
pub struct ConsolidationSettings {
    pub max_batch_size: usize,
    pub inter_batch_delay: Duration,
}

impl Default for ConsolidationSettings {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            inter_batch_delay: DEFAULT_INTER_BATCH_DELAY,
        }
    }
}

impl From<&SubmissionConfig> for ConsolidationSettings {
    fn from(config: &SubmissionConfig) -> Self {
        Self {
            max_batch_size: config.max_batch_size.max(1),
            inter_batch_delay: config.inter_batch_delay(),
        }
    }
}

/// 归集流程入口：校验 → 拉取部分签名交易 → 补签 → 分批 → 限流顺序提交。
///
/// 批次严格串行；多个并发调用共享同一个限流器，彼此之间不做隔离。
pub struct ConsolidationEngine<B: ?Sized> {
    lander: BundleLander<B>,
    pacer: BatchPacer,
    settings: ConsolidationSettings,
}

impl<B> ConsolidationEngine<B>
where
    B: ConsolidationBackend + ?Sized,
{
    pub fn new(
        backend: Arc<B>,
        limiter: Arc<RateLimiter>,
        settings: ConsolidationSettings,
    ) -> Self {
        Self {
            lander: BundleLander::new(backend, limiter),
            pacer: BatchPacer::new(settings.inter_batch_delay),
            settings,
        }
    }

    pub async fn consolidate(
        &self,
        sources: &[WalletRecord],
        receiver: &WalletRecord,
        percentage: f64,
        balances: &BalanceBook,
    ) -> ConsolidationOutcome {
        let started = Instant::now();
        events::consolidation_started(sources.len(), percentage);

        match self.run(sources, receiver, percentage, balances).await {
            Ok(results) => {
                let accepted = results.iter().filter(|r| r.is_accepted()).count();
                events::consolidation_finished(results.len(), accepted, started.elapsed());
                ConsolidationOutcome::Success { results }
            }
            Err(err) => {
                let message = err.to_string();
                events::consolidation_failed(err.stage(), &message);
                ConsolidationOutcome::Failure { message }
            }
        }
    }

    async fn run(
        &self,
        sources: &[WalletRecord],
        receiver: &WalletRecord,
        percentage: f64,
        balances: &BalanceBook,
    ) -> EngineResult<Vec<SubmissionResult>> {
        validate_inputs(sources, receiver, percentage, balances)?;

        let request = PrepareRequest {
            source_addresses: sources.iter().map(|w| w.address.clone()).collect(),
            receiver_address: receiver.address.clone(),
            percentage,
        };
        let encoded = self
            .lander
            .backend()
            .prepare_transactions(&request)
            .await?;
        debug!(
            target: "engine::orchestrator",
            transactions = encoded.len(),
            "收到部分签名交易"
        );

        let signed = {
            let signers = SignerRegistry::from_wallets(receiver, sources)?;
            complete_transactions(&encoded, &signers)?
        };

        let batches = build_batches(signed, self.settings.max_batch_size);
        events::transactions_prepared(encoded.len(), batches.len());
        if batches.is_empty() {
            warn!(
                target: "engine::orchestrator",
                "后端未返回任何交易，无需提交"
            );
        }

        let total = batches.len();
        let mut results = Vec::with_capacity(total);
        for batch in &batches {
            let result = self.lander.submit(batch).await?;
            results.push(result);
            self.pacer.pause_after(batch.index(), total).await;
        }

        info!(
            target: "engine::orchestrator",
            batches = total,
            receiver = %receiver.address,
            "全部批次已提交"
        );
        Ok(results)
    }
}
