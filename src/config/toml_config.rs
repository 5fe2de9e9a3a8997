use crate::adapters::http::{DEFAULT_CONCURRENCY, DEFAULT_ENDPOINT, DEFAULT_HYDRATION_LIMIT};
use crate::core::store::DEFAULT_PLAN_KEY;
use crate::core::ConfigProvider;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "meal-planner.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub directory: DirectoryConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub concurrent_requests: usize,
    pub hydration_limit: usize,
    pub random_count: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 10,
            concurrent_requests: DEFAULT_CONCURRENCY,
            hydration_limit: DEFAULT_HYDRATION_LIMIT,
            random_count: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    pub data_dir: String,
    pub plan_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: "./data".to_string(),
            plan_key: DEFAULT_PLAN_KEY.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Explicit paths must exist; without one the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                tracing::debug!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MEALDB_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlannerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("directory.endpoint", &self.directory.endpoint)?;
        validation::validate_range(
            "directory.concurrent_requests",
            self.directory.concurrent_requests,
            1,
            32,
        )?;
        validation::validate_range(
            "directory.hydration_limit",
            self.directory.hydration_limit,
            1,
            50,
        )?;
        validation::validate_range("directory.timeout_seconds", self.directory.timeout_seconds, 1, 300)?;
        validation::validate_range("directory.random_count", self.directory.random_count, 1, 50)?;

        if self.storage.enabled {
            validation::validate_data_dir("storage.data_dir", &self.storage.data_dir)?;
            validation::validate_storage_key("storage.plan_key", &self.storage.plan_key)?;
        }

        Ok(())
    }

    pub fn random_count(&self) -> usize {
        self.directory.random_count
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.directory.endpoint
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn plan_key(&self) -> &str {
        &self.storage.plan_key
    }

    fn storage_enabled(&self) -> bool {
        self.storage.enabled
    }

    fn concurrent_requests(&self) -> usize {
        self.directory.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.directory.timeout_seconds)
    }

    fn hydration_limit(&self) -> usize {
        self.directory.hydration_limit
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
