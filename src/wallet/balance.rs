use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use super::{WalletError, WalletRecord};

/// 源钱包地址到余额（lamports）的映射，缺失的地址视为 0。
#[derive(Debug, Clone, Default)]
pub struct BalanceBook {
    balances: HashMap<String, u64>,
}

impl BalanceBook {
    pub fn insert(&mut self, address: impl Into<String>, lamports: u64) {
        self.balances.insert(address.into(), lamports);
    }

    pub fn get(&self, address: &str) -> u64 {
        self.balances.get(address).copied().unwrap_or(0)
    }
}

impl FromIterator<(String, u64)> for BalanceBook {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone)]
pub struct BalanceFetcher {
    rpc: Arc<RpcClient>,
}

impl BalanceFetcher {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    /// 逐个查询源钱包余额；地址无法解析的钱包不写入，由校验阶段按 0 余额处理。
    pub async fn fetch(&self, wallets: &[WalletRecord]) -> Result<BalanceBook, WalletError> {
        let mut book = BalanceBook::default();
        for wallet in wallets {
            let address = wallet.address.trim();
            if address.is_empty() {
                continue;
            }
            let pubkey = match Pubkey::from_str(address) {
                Ok(pubkey) => pubkey,
                Err(err) => {
                    warn!(
                        target: "wallet::balance",
                        address,
                        error = %err,
                        "源钱包地址非法，跳过余额查询"
                    );
                    continue;
                }
            };
            let lamports = self.rpc.get_balance(&pubkey).await?;
            debug!(target: "wallet::balance", address, lamports, "已查询余额");
            book.insert(address, lamports);
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_address_reads_as_zero() {
        let mut book = BalanceBook::default();
        book.insert("A", 42);
        assert_eq!(book.get("A"), 42);
        assert_eq!(book.get("B"), 0);
    }
}
