use crate::engine::SignedTransaction;

pub const DEFAULT_MAX_BATCH_SIZE: usize = 5;

/// 一次提交请求中打包的已签名交易，按原顺序排列，使用后即丢弃。
#[derive(Debug, Clone)]
pub struct SubmissionBatch {
    index: usize,
    transactions: Vec<SignedTransaction>,
}

impl SubmissionBatch {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn encoded_transactions(&self) -> Vec<String> {
        self.transactions
            .iter()
            .map(|tx| tx.encoded.clone())
            .collect()
    }
}

/// 将已签名交易按 `max_batch_size` 切分；除最后一批外每批都是满的。
pub fn build_batches(
    transactions: Vec<SignedTransaction>,
    max_batch_size: usize,
) -> Vec<SubmissionBatch> {
    let size = max_batch_size.max(1);
    let mut batches = Vec::with_capacity(transactions.len().div_ceil(size));
    let mut current = Vec::with_capacity(size);

    for tx in transactions {
        current.push(tx);
        if current.len() == size {
            batches.push(SubmissionBatch {
                index: batches.len(),
                transactions: std::mem::replace(&mut current, Vec::with_capacity(size)),
            });
        }
    }

    if !current.is_empty() {
        batches.push(SubmissionBatch {
            index: batches.len(),
            transactions: current,
        });
    }

    batches
}

#[cfg(test)]
mod tests {
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Signature;

    use super::*;

    fn signed(tag: usize) -> SignedTransaction {
        SignedTransaction {
            encoded: format!("tx-{tag}"),
            signature: Signature::default(),
            signers: vec![Pubkey::new_unique()],
        }
    }

    fn flatten(batches: &[SubmissionBatch]) -> Vec<String> {
        batches
            .iter()
            .flat_map(|batch| batch.encoded_transactions())
            .collect()
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(build_batches(Vec::new(), DEFAULT_MAX_BATCH_SIZE).is_empty());
    }

    #[test]
    fn batches_partition_input_in_order() {
        for total in 1..=17 {
            for size in 1..=6 {
                let input: Vec<_> = (0..total).map(signed).collect();
                let expected: Vec<_> = input.iter().map(|tx| tx.encoded.clone()).collect();
                let batches = build_batches(input, size);

                assert_eq!(flatten(&batches), expected, "total={total} size={size}");
                assert_eq!(batches.len(), total.div_ceil(size));
                let (last, full) = batches.split_last().expect("non-empty batches");
                assert!(full.iter().all(|batch| batch.len() == size));
                assert!((1..=size).contains(&last.len()));
                for (idx, batch) in batches.iter().enumerate() {
                    assert_eq!(batch.index(), idx);
                }
            }
        }
    }

    #[test]
    fn seven_transactions_split_five_and_two() {
        let batches = build_batches((0..7).map(signed).collect(), DEFAULT_MAX_BATCH_SIZE);
        let sizes: Vec<_> = batches.iter().map(SubmissionBatch::len).collect();
        assert_eq!(sizes, vec![5, 2]);
    }
}
