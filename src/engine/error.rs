use bincode::error::{DecodeError, EncodeError};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::api::BackendError;
use crate::lander::LanderError;
use crate::wallet::WalletError;

use super::validation::ValidationError;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("交易 base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("交易反序列化失败: {0}")]
    Decode(#[from] DecodeError),
    #[error("交易序列化失败: {0}")]
    Encode(#[from] EncodeError),
    #[error("交易尾部存在多余字节: 解析 {expected} 字节，实际 {actual} 字节")]
    TrailingBytes { expected: usize, actual: usize },
    #[error("账户 {0} 不是该交易的签名者")]
    NotSigner(Pubkey),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Backend(#[from] BackendError),
    #[error("{0}")]
    Wallet(#[from] WalletError),
    #[error("钱包 {address} 的私钥与地址不匹配（私钥对应 {derived}）")]
    KeyMismatch { address: String, derived: Pubkey },
    #[error("第 {index} 笔交易签名失败: {source}")]
    Completion {
        index: usize,
        #[source]
        source: CompletionError,
    },
    #[error("批次提交失败: {0}")]
    Landing(#[from] LanderError),
}

impl EngineError {
    pub fn stage(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation",
            EngineError::Backend(_) => "prepare",
            EngineError::Wallet(_) | EngineError::KeyMismatch { .. } => "keys",
            EngineError::Completion { .. } => "signing",
            EngineError::Landing(_) => "submission",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
