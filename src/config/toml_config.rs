use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "calculations";
pub const DEFAULT_SINK_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const MAX_DEBOUNCE_MS: u64 = 10_000;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CalcError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CalcError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SINK_API_KEY})，未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CalcError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 沒有明確設定 enabled 時，有 endpoint 即啟用
    pub fn sink_enabled(&self) -> bool {
        self.sink
            .enabled
            .unwrap_or_else(|| self.sink.endpoint.is_some())
    }

    pub fn sink_table(&self) -> &str {
        self.sink.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn sink_timeout(&self) -> Duration {
        Duration::from_secs(
            self.sink
                .timeout_seconds
                .unwrap_or(DEFAULT_SINK_TIMEOUT_SECONDS),
        )
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.session.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn share_base_url(&self) -> Option<&str> {
        self.share.base_url.as_deref()
    }

    pub fn output_path(&self) -> &str {
        self.export
            .output_path
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.sink_enabled() {
            let endpoint = validation::validate_required_field("sink.endpoint", &self.sink.endpoint)?;
            validation::validate_url("sink.endpoint", endpoint)?;

            let api_key = validation::validate_required_field("sink.api_key", &self.sink.api_key)?;
            validation::validate_non_empty_string("sink.api_key", api_key)?;
            validation::validate_resolved("sink.api_key", api_key)?;

            validation::validate_non_empty_string("sink.table", self.sink_table())?;

            if let Some(timeout) = self.sink.timeout_seconds {
                validation::validate_range("sink.timeout_seconds", timeout, 1, 120)?;
            }
        }

        if let Some(base_url) = self.share_base_url() {
            validation::validate_url("share.base_url", base_url)?;
        }

        if let Some(debounce) = self.session.debounce_ms {
            validation::validate_range("session.debounce_ms", debounce, 0, MAX_DEBOUNCE_MS)?;
        }

        validation::validate_path("export.output_path", self.output_path())?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
