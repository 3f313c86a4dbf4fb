use std::fs;
use std::sync::Arc;

use anyhow::Result;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;

use crate::cli::args::InitCmd;
use crate::config::{GlobalConfig, LoggingConfig};

const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .init();
    } else {
        fmt().with_env_filter(filter).init();
    }
    Ok(())
}

pub fn resolve_rpc_client(global: &GlobalConfig) -> Arc<RpcClient> {
    let url = global
        .rpc_url
        .clone()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    Arc::new(RpcClient::new_with_commitment(
        url,
        CommitmentConfig::confirmed(),
    ))
}

pub fn init_configs(args: InitCmd) -> Result<()> {
    let output_dir = match args.output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    fs::create_dir_all(&output_dir)?;

    let templates: [(&str, &str); 2] = [
        (
            "sweeper.yaml",
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sweeper.yaml")),
        ),
        (
            crate::wallet::DEFAULT_WALLETS_PATH,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/wallets.example.yaml")),
        ),
    ];

    for (filename, contents) in templates {
        let target_path = output_dir.join(filename);
        if target_path.exists() && !args.force {
            println!(
                "跳过 {}（文件已存在，如需覆盖请加 --force）",
                target_path.display()
            );
            continue;
        }

        fs::write(&target_path, contents)?;
        println!("已写入 {}", target_path.display());
    }

    Ok(())
}
