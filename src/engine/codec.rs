use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use bincode::config::legacy;
use bincode::serde::{decode_from_slice, encode_to_vec};
use solana_sdk::transaction::VersionedTransaction;

use super::error::CompletionError;

/// 解码后端下发的 base64 交易（Solana 线上格式）。
pub fn decode_transaction(encoded: &str) -> Result<VersionedTransaction, CompletionError> {
    let bytes = BASE64_STANDARD.decode(encoded.trim())?;
    let (tx, consumed) = decode_from_slice::<VersionedTransaction, _>(&bytes, legacy())?;
    if consumed != bytes.len() {
        return Err(CompletionError::TrailingBytes {
            expected: consumed,
            actual: bytes.len(),
        });
    }
    Ok(tx)
}

pub fn encode_transaction(tx: &VersionedTransaction) -> Result<String, CompletionError> {
    let bytes = encode_to_vec(tx, legacy())?;
    Ok(BASE64_STANDARD.encode(bytes))
}
