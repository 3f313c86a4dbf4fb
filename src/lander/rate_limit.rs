use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_MAX_PER_WINDOW: u32 = 2;
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1_000);

/// 固定窗口计数限流器，进程内只构造一次，通过 `Arc` 共享给所有提交方。
///
/// 窗口耗尽后，同一窗口内排队的调用方会在窗口边界被同时放行，不做平滑。
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

struct WindowState {
    count: u32,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window: max_per_window.max(1),
            window,
            state: Mutex::new(WindowState {
                count: 0,
                window_start: Instant::now(),
            }),
        }
    }

    pub fn max_per_window(&self) -> u32 {
        self.max_per_window
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 获取一次提交许可；配额耗尽时挂起到当前窗口结束。
    pub async fn permit(&self) {
        let wait = {
            let mut state = self.state.lock();
            let now = Instant::now();
            if now.duration_since(state.window_start) >= self.window {
                state.count = 0;
                state.window_start = now;
            }

            if state.count >= self.max_per_window {
                Some(
                    self.window
                        .saturating_sub(now.duration_since(state.window_start)),
                )
            } else {
                state.count += 1;
                None
            }
        };

        let Some(remaining) = wait else {
            return;
        };

        debug!(
            target: "lander::rate_limit",
            wait_ms = remaining.as_millis() as u64,
            max_per_window = self.max_per_window,
            "submission quota exhausted, waiting for next window"
        );
        if !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }

        let mut state = self.state.lock();
        state.count = 0;
        state.window_start = Instant::now();
        state.count += 1;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn two_permits_within_window_are_immediate() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.permit().await;
        limiter.permit().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn third_permit_waits_for_window_boundary() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.permit().await;
        limiter.permit().await;
        limiter.permit().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= DEFAULT_WINDOW, "elapsed {elapsed:?}");
        assert!(elapsed < DEFAULT_WINDOW + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn partial_window_wait_only_covers_remainder() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        limiter.permit().await;
        tokio::time::advance(Duration::from_millis(400)).await;
        limiter.permit().await;
        limiter.permit().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= DEFAULT_WINDOW);
        assert!(elapsed < DEFAULT_WINDOW + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_window_resets_quota() {
        let limiter = RateLimiter::default();
        limiter.permit().await;
        limiter.permit().await;
        tokio::time::advance(DEFAULT_WINDOW).await;
        let start = Instant::now();
        limiter.permit().await;
        limiter.permit().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_callers_are_released_together() {
        let limiter = Arc::new(RateLimiter::default());
        limiter.permit().await;
        limiter.permit().await;

        let start = Instant::now();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.permit().await;
                    Instant::now()
                })
            })
            .collect();

        let mut released = Vec::new();
        for handle in handles {
            released.push(handle.await.expect("join permit task"));
        }
        for at in released {
            assert_eq!(at.duration_since(start), DEFAULT_WINDOW);
        }
    }
}
