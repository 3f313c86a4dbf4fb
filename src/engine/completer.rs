use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;
use tracing::debug;

use super::codec::{decode_transaction, encode_transaction};
use super::error::{CompletionError, EngineError, EngineResult};
use super::identity::SignerRegistry;
use super::types::SignedTransaction;

/// 为后端下发的部分签名交易补齐接收钱包与相关源钱包的签名。
///
/// 任意一笔失败即整体失败，不返回部分结果。
pub fn complete_transactions(
    encoded: &[String],
    signers: &SignerRegistry,
) -> EngineResult<Vec<SignedTransaction>> {
    encoded
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            complete_one(raw, signers).map_err(|source| EngineError::Completion { index, source })
        })
        .collect()
}

fn complete_one(
    encoded: &str,
    signers: &SignerRegistry,
) -> Result<SignedTransaction, CompletionError> {
    let mut tx = decode_transaction(encoded)?;
    let signer_set = collect_signers(&tx, signers);
    let signer_keys: Vec<Pubkey> = signer_set.iter().map(|kp| kp.pubkey()).collect();

    sign_in_place(&mut tx, &signer_set)?;

    let signature = tx.signatures.first().copied().unwrap_or_default();
    debug!(
        target: "engine::completer",
        signature = %signature,
        signers = signer_keys.len(),
        "交易签名已补全"
    );

    Ok(SignedTransaction {
        encoded: encode_transaction(&tx)?,
        signature,
        signers: signer_keys,
    })
}

fn collect_signers<'a>(
    tx: &VersionedTransaction,
    signers: &'a SignerRegistry,
) -> Vec<&'a Keypair> {
    let receiver = signers.receiver_pubkey();
    let mut set = vec![signers.receiver()];
    for key in tx.message.static_account_keys() {
        if *key == receiver {
            continue;
        }
        if let Some(keypair) = signers.source(key) {
            if !set.iter().any(|existing| existing.pubkey() == *key) {
                set.push(keypair);
            }
        }
    }
    set
}

fn sign_in_place(
    tx: &mut VersionedTransaction,
    signer_set: &[&Keypair],
) -> Result<(), CompletionError> {
    let required = usize::from(tx.message.header().num_required_signatures);
    if tx.signatures.len() < required {
        tx.signatures.resize(required, Signature::default());
    }

    let message_bytes = tx.message.serialize();
    let account_keys = tx.message.static_account_keys();
    let signer_keys = &account_keys[..required.min(account_keys.len())];

    let mut slots = Vec::with_capacity(signer_set.len());
    for keypair in signer_set {
        let pubkey = keypair.pubkey();
        let slot = signer_keys
            .iter()
            .position(|key| *key == pubkey)
            .ok_or(CompletionError::NotSigner(pubkey))?;
        slots.push((slot, keypair.sign_message(&message_bytes)));
    }

    for (slot, signature) in slots {
        tx.signatures[slot] = signature;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use solana_sdk::signature::Keypair;

    use super::*;
    use crate::engine::test_support::{partial_transaction, transfer_to, wallet_for};

    struct Fixture {
        receiver: Keypair,
        sources: Vec<Keypair>,
        registry: SignerRegistry,
    }

    fn fixture() -> Fixture {
        let receiver = Keypair::new();
        let sources: Vec<Keypair> = (0..3).map(|_| Keypair::new()).collect();
        let records: Vec<_> = sources.iter().map(wallet_for).collect();
        let registry =
            SignerRegistry::from_wallets(&wallet_for(&receiver), &records).expect("registry");
        Fixture {
            receiver,
            sources,
            registry,
        }
    }

    #[test]
    fn signs_with_receiver_and_referenced_sources_only() {
        let fx = fixture();
        let receiver = fx.receiver.pubkey();
        let first = fx.sources[0].pubkey();
        let third = fx.sources[2].pubkey();
        let encoded = partial_transaction(
            &receiver,
            &[transfer_to(&first, &receiver), transfer_to(&third, &receiver)],
            &[],
        );

        let signed = complete_transactions(&[encoded], &fx.registry).expect("complete");
        assert_eq!(signed.len(), 1);

        let tx = &signed[0];
        assert_eq!(tx.signers[0], receiver);
        let set: HashSet<_> = tx.signers.iter().copied().collect();
        assert_eq!(set, HashSet::from([receiver, first, third]));
        assert_eq!(tx.signers.len(), 3);
        assert!(!set.contains(&fx.sources[1].pubkey()));

        let decoded = decode_transaction(&tx.encoded).expect("decode signed");
        assert!(decoded.verify_with_results().iter().all(|ok| *ok));
        assert_eq!(decoded.signatures[0], tx.signature);
    }

    #[test]
    fn preserves_backend_signatures() {
        let fx = fixture();
        let receiver = fx.receiver.pubkey();
        let source = fx.sources[1].pubkey();
        let authority = Keypair::new();
        let encoded = partial_transaction(
            &receiver,
            &[
                transfer_to(&source, &receiver),
                transfer_to(&authority.pubkey(), &receiver),
            ],
            &[&authority],
        );

        let signed = complete_transactions(&[encoded], &fx.registry).expect("complete");
        let decoded = decode_transaction(&signed[0].encoded).expect("decode signed");
        assert_eq!(decoded.signatures.len(), 3);
        assert!(decoded.verify_with_results().iter().all(|ok| *ok));
        assert!(!signed[0].signers.contains(&authority.pubkey()));
    }

    #[test]
    fn output_keeps_input_order() {
        let fx = fixture();
        let receiver = fx.receiver.pubkey();
        let encoded: Vec<String> = fx
            .sources
            .iter()
            .map(|source| {
                partial_transaction(&receiver, &[transfer_to(&source.pubkey(), &receiver)], &[])
            })
            .collect();

        let signed = complete_transactions(&encoded, &fx.registry).expect("complete");
        let owners: Vec<Pubkey> = signed.iter().map(|tx| tx.signers[1]).collect();
        let expected: Vec<Pubkey> = fx.sources.iter().map(|kp| kp.pubkey()).collect();
        assert_eq!(owners, expected);
    }

    #[test]
    fn undecodable_transaction_aborts_batch() {
        let fx = fixture();
        let receiver = fx.receiver.pubkey();
        let good = partial_transaction(
            &receiver,
            &[transfer_to(&fx.sources[0].pubkey(), &receiver)],
            &[],
        );

        let result = complete_transactions(
            &[good, "not-base64!!".to_string(), "AAAA".to_string()],
            &fx.registry,
        );
        match result {
            Err(EngineError::Completion { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected completion error, got {other:?}"),
        }
    }

    #[test]
    fn source_referenced_as_non_signer_is_rejected() {
        let fx = fixture();
        let receiver = fx.receiver.pubkey();
        let source = fx.sources[0].pubkey();
        // receiver pays into the source, so the source is only a writable non-signer
        let encoded = partial_transaction(&receiver, &[transfer_to(&receiver, &source)], &[]);

        let result = complete_transactions(&[encoded], &fx.registry);
        assert!(matches!(
            result,
            Err(EngineError::Completion {
                source: CompletionError::NotSigner(key),
                ..
            }) if key == source
        ));
    }
}
