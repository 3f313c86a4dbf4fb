use std::time::Duration;

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

pub(crate) fn default_logging_level() -> String {
    "info".to_string()
}

pub(crate) fn default_backend_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

pub(crate) fn default_max_batch_size() -> usize {
    5
}

pub(crate) fn default_max_per_window() -> u32 {
    2
}

pub(crate) fn default_window_ms() -> u64 {
    1_000
}

pub(crate) fn default_inter_batch_delay_ms() -> u64 {
    500
}

pub(crate) fn default_prometheus_listen() -> String {
    "0.0.0.0:9898".to_string()
}

impl SubmissionConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }
}
