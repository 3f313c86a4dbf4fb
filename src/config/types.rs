use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweeperConfig {
    /// 实际加载的配置文件；全部使用默认值时为空。
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "super::default_logging_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: super::default_logging_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "super::default_backend_url")]
    pub base_url: String,
    /// 0 表示不设置超时。
    #[serde(default)]
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: super::default_backend_url(),
            request_timeout_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "super::default_max_batch_size")]
    pub max_batch_size: usize,
    #[serde(default = "super::default_max_per_window")]
    pub max_per_window: u32,
    #[serde(default = "super::default_window_ms")]
    pub window_ms: u64,
    #[serde(default = "super::default_inter_batch_delay_ms")]
    pub inter_batch_delay_ms: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_batch_size: super::default_max_batch_size(),
            max_per_window: super::default_max_per_window(),
            window_ms: super::default_window_ms(),
            inter_batch_delay_ms: super::default_inter_batch_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrometheusConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default = "super::default_prometheus_listen")]
    pub listen: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enable: false,
            listen: super::default_prometheus_listen(),
        }
    }
}
