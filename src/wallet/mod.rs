use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use solana_sdk::signature::Keypair;
use thiserror::Error;
use zeroize::Zeroizing;

pub mod balance;

pub use balance::{BalanceBook, BalanceFetcher};

pub const DEFAULT_WALLETS_PATH: &str = "wallets.yaml";

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("读取钱包文件失败 {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("解析钱包文件失败 {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("私钥格式非法: {0}")]
    InvalidKey(String),
    #[error("查询余额失败: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),
}

/// 一个参与归集的钱包（源钱包或接收钱包）。
#[derive(Clone, Default, Deserialize)]
pub struct WalletRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub private_key: String,
}

impl WalletRecord {
    #[cfg(test)]
    pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            private_key: private_key.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && !self.private_key.trim().is_empty()
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletFile {
    #[serde(default)]
    pub receiver: WalletRecord,
    #[serde(default)]
    pub sources: Vec<WalletRecord>,
}

pub fn load_wallet_file(path: &Path) -> Result<WalletFile, WalletError> {
    let contents = fs::read_to_string(path).map_err(|source| WalletError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| WalletError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 支持 base58 私钥、JSON 字节数组以及逗号分隔的字节串。
pub fn parse_keypair_string(raw: &str) -> Result<Keypair, WalletError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WalletError::InvalidKey("私钥为空".to_string()));
    }

    let bytes: Zeroizing<Vec<u8>> = if trimmed.starts_with('[') {
        Zeroizing::new(
            serde_json::from_str(trimmed)
                .map_err(|err| WalletError::InvalidKey(format!("JSON 字节数组解析失败: {err}")))?,
        )
    } else if trimmed.contains(',') {
        Zeroizing::new(
            trimmed
                .split(',')
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .map(|part| part.parse::<u8>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| WalletError::InvalidKey(format!("字节串解析失败: {err}")))?,
        )
    } else {
        Zeroizing::new(
            bs58::decode(trimmed)
                .into_vec()
                .map_err(|err| WalletError::InvalidKey(format!("base58 解码失败: {err}")))?,
        )
    };

    Keypair::try_from(bytes.as_slice())
        .map_err(|err| WalletError::InvalidKey(format!("无法构造密钥对: {err}")))
}
