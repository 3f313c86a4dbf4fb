use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::info;
use url::Url;

use crate::api::BackendApiClient;
use crate::cli::args::{BalancesCmd, ConsolidateCmd};
use crate::cli::context::resolve_rpc_client;
use crate::config::SweeperConfig;
use crate::engine::{
    ConsolidationEngine, ConsolidationOutcome, ConsolidationSettings, address_preview,
    precheck_inputs,
};
use crate::lander::RateLimiter;
use crate::monitoring::events;
use crate::wallet::{BalanceFetcher, load_wallet_file};

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

pub async fn handle_consolidate(
    args: ConsolidateCmd,
    config: &SweeperConfig,
    limiter: Arc<RateLimiter>,
) -> Result<()> {
    let wallets = load_wallet_file(&args.wallets)?;
    let base_url = resolve_backend_url(args.backend_url.as_deref(), config)?;

    let http_client = reqwest::Client::builder().build()?;
    let backend = Arc::new(BackendApiClient::new(
        http_client,
        base_url,
        &config.backend,
    ));
    info!(
        target: "cli",
        backend = backend.base_url(),
        sources = wallets.sources.len(),
        percentage = args.percentage,
        "开始归集"
    );

    // 不依赖余额的输入问题在查询余额之前就报告
    let outcome = match precheck_inputs(&wallets.sources, &wallets.receiver, args.percentage) {
        Err(err) => {
            let message = err.to_string();
            events::consolidation_failed("validation", &message);
            ConsolidationOutcome::Failure { message }
        }
        Ok(()) => {
            let balances = BalanceFetcher::new(resolve_rpc_client(&config.global))
                .fetch(&wallets.sources)
                .await?;
            let engine = ConsolidationEngine::new(
                backend,
                limiter,
                ConsolidationSettings::from(&config.submission),
            );
            engine
                .consolidate(
                    &wallets.sources,
                    &wallets.receiver,
                    args.percentage,
                    &balances,
                )
                .await
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    match outcome {
        ConsolidationOutcome::Success { results } => {
            info!(target: "cli", batches = results.len(), "归集完成");
            Ok(())
        }
        ConsolidationOutcome::Failure { message } => Err(anyhow!("归集失败: {message}")),
    }
}

pub async fn handle_balances(args: BalancesCmd, config: &SweeperConfig) -> Result<()> {
    let wallets = load_wallet_file(&args.wallets)?;
    let balances = BalanceFetcher::new(resolve_rpc_client(&config.global))
        .fetch(&wallets.sources)
        .await?;

    let mut total = 0u64;
    for wallet in &wallets.sources {
        let lamports = balances.get(&wallet.address);
        total = total.saturating_add(lamports);
        println!(
            "{:<8} {:>20} lamports  {:>14.9} SOL",
            address_preview(&wallet.address),
            lamports,
            lamports as f64 / LAMPORTS_PER_SOL
        );
    }
    println!(
        "合计 {} 个源钱包: {} lamports ({:.9} SOL)",
        wallets.sources.len(),
        total,
        total as f64 / LAMPORTS_PER_SOL
    );
    Ok(())
}

fn resolve_backend_url(override_url: Option<&str>, config: &SweeperConfig) -> Result<String> {
    match override_url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => {
            Url::parse(url).map_err(|err| anyhow!("后端地址无效 {url}: {err}"))?;
            Ok(url.to_string())
        }
        None => Ok(config.backend.base_url.trim().to_string()),
    }
}
