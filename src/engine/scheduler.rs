use std::time::Duration;

/// 批次之间的固定间隔，最后一个批次之后不再等待。
#[derive(Clone, Copy, Debug)]
pub struct BatchPacer {
    delay: Duration,
}

impl BatchPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn pause_after(&self, batch_index: usize, total_batches: usize) {
        if batch_index + 1 >= total_batches || self.delay.is_zero() {
            return;
        }
        tokio::time::sleep(self.delay).await;
    }
}
