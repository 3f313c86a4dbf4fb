use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::args::{Cli, Command};
use crate::cli::consolidate::{handle_balances, handle_consolidate};
use crate::cli::context::{init_configs, init_tracing};
use crate::config::load_config;
use crate::lander::RateLimiter;

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.clone())?;
    init_tracing(&config.global.logging)?;
    match &config.source_path {
        Some(path) => info!(target: "config", path = %path.display(), "已加载配置文件"),
        None => info!(target: "config", "未找到配置文件，使用默认配置"),
    }
    crate::monitoring::try_init_prometheus(&config.bot.prometheus)?;

    // 进程内唯一的限流器，所有提交共用
    let limiter = Arc::new(RateLimiter::new(
        config.submission.max_per_window,
        config.submission.window(),
    ));
    debug!(
        target: "cli",
        max_per_window = limiter.max_per_window(),
        window_ms = limiter.window().as_millis() as u64,
        "rate limiter ready"
    );

    match cli.command {
        Command::Consolidate(args) => handle_consolidate(args, &config, limiter).await,
        Command::Balances(args) => handle_balances(args, &config).await,
        Command::Init(args) => init_configs(args),
    }
}
