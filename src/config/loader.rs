use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use super::SweeperConfig;

pub const DEFAULT_CONFIG_PATHS: &[&str] = &["sweeper.yaml", "config/sweeper.yaml"];

pub const BACKEND_URL_ENV: &str = "SWEEPER_BACKEND_URL";
pub const RPC_URL_ENV: &str = "SWEEPER_RPC_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("配置非法: {0}")]
    Invalid(String),
}

pub fn load_config(path: Option<PathBuf>) -> Result<SweeperConfig, ConfigError> {
    let candidate_paths = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::Io {
                    path: p.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                });
            }
            vec![p]
        }
        None => DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .collect::<Vec<PathBuf>>(),
    };

    let mut config = None;
    for candidate in candidate_paths {
        if let Some(mut loaded) = try_load_file(&candidate)? {
            loaded.source_path = Some(candidate);
            config = Some(loaded);
            break;
        }
    }

    let config = apply_overrides(
        config.unwrap_or_default(),
        env_override(BACKEND_URL_ENV),
        env_override(RPC_URL_ENV),
    );
    validate(&config)?;
    Ok(config)
}

fn try_load_file(path: &Path) -> Result<Option<SweeperConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: SweeperConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(config))
}

fn env_override(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn apply_overrides(
    mut config: SweeperConfig,
    backend_url: Option<String>,
    rpc_url: Option<String>,
) -> SweeperConfig {
    if let Some(url) = backend_url {
        config.backend.base_url = url;
    }
    if let Some(url) = rpc_url {
        config.global.rpc_url = Some(url);
    }
    config
}

pub fn validate(config: &SweeperConfig) -> Result<(), ConfigError> {
    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Invalid("backend.base_url 不能为空".into()));
    }
    Url::parse(base_url)
        .map_err(|err| ConfigError::Invalid(format!("backend.base_url 无法解析 {base_url}: {err}")))?;

    let submission = &config.submission;
    if submission.max_batch_size == 0 {
        return Err(ConfigError::Invalid(
            "submission.max_batch_size 必须大于 0".into(),
        ));
    }
    if submission.max_per_window == 0 {
        return Err(ConfigError::Invalid(
            "submission.max_per_window 必须大于 0".into(),
        ));
    }
    if submission.window_ms == 0 {
        return Err(ConfigError::Invalid("submission.window_ms 必须大于 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "backend:\n  base_url: https://sweep.example.com\n  request_timeout_ms: 1500"
        )
        .expect("write config");

        let config = load_config(Some(file.path().to_path_buf())).expect("load config");
        assert_eq!(config.source_path.as_deref(), Some(file.path()));
        assert_eq!(config.backend.request_timeout_ms, 1500);
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let result = load_config(Some(PathBuf::from("/definitely/not/here/sweeper.yaml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = apply_overrides(
            SweeperConfig::default(),
            Some("https://override.example.com".to_string()),
            Some("http://localhost:8899".to_string()),
        );
        assert_eq!(config.backend.base_url, "https://override.example.com");
        assert_eq!(config.global.rpc_url.as_deref(), Some("http://localhost:8899"));
    }

    #[test]
    fn invalid_submission_settings_are_rejected() {
        let mut config = SweeperConfig::default();
        config.submission.max_batch_size = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));

        let mut config = SweeperConfig::default();
        config.backend.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Invalid(_))));

        assert!(validate(&SweeperConfig::default()).is_ok());
    }
}
