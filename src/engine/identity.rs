use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::wallet::{WalletRecord, parse_keypair_string};

use super::error::{EngineError, EngineResult};

/// 单次归集调用内持有的签名密钥：接收钱包（手续费支付方）与源钱包地址到密钥对的映射。
///
/// 仅在调用期间存在，调用结束即释放。
pub struct SignerRegistry {
    receiver: Keypair,
    sources: HashMap<Pubkey, Keypair>,
}

impl SignerRegistry {
    pub fn from_wallets(receiver: &WalletRecord, sources: &[WalletRecord]) -> EngineResult<Self> {
        let receiver = derive_keypair(receiver)?;
        let mut lookup = HashMap::with_capacity(sources.len());
        for wallet in sources {
            let keypair = derive_keypair(wallet)?;
            lookup.insert(keypair.pubkey(), keypair);
        }
        Ok(Self {
            receiver,
            sources: lookup,
        })
    }

    pub fn receiver(&self) -> &Keypair {
        &self.receiver
    }

    pub fn receiver_pubkey(&self) -> Pubkey {
        self.receiver.pubkey()
    }

    pub fn source(&self, address: &Pubkey) -> Option<&Keypair> {
        self.sources.get(address)
    }
}

fn derive_keypair(wallet: &WalletRecord) -> EngineResult<Keypair> {
    let keypair = parse_keypair_string(&wallet.private_key)?;
    let derived = keypair.pubkey();
    if derived.to_string() != wallet.address.trim() {
        return Err(EngineError::KeyMismatch {
            address: wallet.address.clone(),
            derived,
        });
    }
    Ok(keypair)
}
