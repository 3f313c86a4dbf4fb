use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sweeper", version, about = "多钱包余额归集工具")]
pub struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径（默认查找 sweeper.yaml 或 config/sweeper.yaml）"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 将源钱包余额归集到接收钱包
    Consolidate(ConsolidateCmd),
    /// 查询钱包文件中各源钱包的余额
    Balances(BalancesCmd),
    /// 初始化配置模版文件
    Init(InitCmd),
}

#[derive(Args, Debug)]
pub struct ConsolidateCmd {
    #[arg(
        long,
        value_name = "FILE",
        default_value = crate::wallet::DEFAULT_WALLETS_PATH,
        help = "钱包文件（receiver + sources）"
    )]
    pub wallets: PathBuf,
    #[arg(long, help = "归集比例，取值 (0, 100]")]
    pub percentage: f64,
    #[arg(long, value_name = "URL", help = "覆盖配置中的后端地址")]
    pub backend_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct BalancesCmd {
    #[arg(
        long,
        value_name = "FILE",
        default_value = crate::wallet::DEFAULT_WALLETS_PATH,
        help = "钱包文件（receiver + sources）"
    )]
    pub wallets: PathBuf,
}

#[derive(Args, Debug)]
pub struct InitCmd {
    #[arg(long, value_name = "DIR", help = "可选输出目录（默认当前目录）")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "若文件存在则覆盖")]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_consolidate_arguments() {
        let cli = Cli::try_parse_from([
            "sweeper",
            "consolidate",
            "--wallets",
            "my-wallets.yaml",
            "--percentage",
            "42.5",
        ])
        .expect("parse args");
        match cli.command {
            Command::Consolidate(cmd) => {
                assert_eq!(cmd.wallets, PathBuf::from("my-wallets.yaml"));
                assert_eq!(cmd.percentage, 42.5);
                assert!(cmd.backend_url.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
