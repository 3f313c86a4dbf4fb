use thiserror::Error;

use crate::wallet::{BalanceBook, WalletRecord};

const ADDRESS_PREVIEW_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("接收钱包缺少地址或私钥")]
    IncompleteReceiver,
    #[error("未提供任何源钱包")]
    NoSourceWallets,
    #[error("源钱包 #{index} 缺少地址或私钥")]
    IncompleteSource { index: usize },
    #[error("源钱包 {address}... 余额为 0，无法归集")]
    EmptyBalance { address: String },
    #[error("归集比例必须大于 0 且不超过 100，当前为 {0}")]
    InvalidPercentage(f64),
}

/// 在任何签名或网络操作之前校验输入，按固定优先级返回第一个错误。
pub fn validate_inputs(
    sources: &[WalletRecord],
    receiver: &WalletRecord,
    percentage: f64,
    balances: &BalanceBook,
) -> Result<(), ValidationError> {
    check_wallets(sources, receiver)?;
    check_balances(sources, balances)?;
    check_percentage(percentage)
}

/// 不依赖余额的那部分校验，供查询余额之前调用；顺序与 `validate_inputs` 一致。
pub fn precheck_inputs(
    sources: &[WalletRecord],
    receiver: &WalletRecord,
    percentage: f64,
) -> Result<(), ValidationError> {
    check_wallets(sources, receiver)?;
    check_percentage(percentage)
}

fn check_wallets(sources: &[WalletRecord], receiver: &WalletRecord) -> Result<(), ValidationError> {
    if !receiver.is_complete() {
        return Err(ValidationError::IncompleteReceiver);
    }

    if sources.is_empty() {
        return Err(ValidationError::NoSourceWallets);
    }

    if let Some(index) = sources.iter().position(|wallet| !wallet.is_complete()) {
        return Err(ValidationError::IncompleteSource { index: index + 1 });
    }
    Ok(())
}

fn check_balances(sources: &[WalletRecord], balances: &BalanceBook) -> Result<(), ValidationError> {
    match sources
        .iter()
        .find(|wallet| balances.get(&wallet.address) == 0)
    {
        Some(wallet) => Err(ValidationError::EmptyBalance {
            address: address_preview(&wallet.address),
        }),
        None => Ok(()),
    }
}

fn check_percentage(percentage: f64) -> Result<(), ValidationError> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return Err(ValidationError::InvalidPercentage(percentage));
    }
    Ok(())
}

pub fn address_preview(address: &str) -> String {
    address.chars().take(ADDRESS_PREVIEW_CHARS).collect()
}
