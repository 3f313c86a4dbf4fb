use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::api::SubmissionResult;

/// 补全签名后的交易，`encoded` 可直接提交。
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub encoded: String,
    /// 手续费支付方签名，即交易签名。
    pub signature: Signature,
    /// 本地补签的公钥，接收钱包总在首位。
    pub signers: Vec<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsolidationOutcome {
    Success { results: Vec<SubmissionResult> },
    Failure { message: String },
}
