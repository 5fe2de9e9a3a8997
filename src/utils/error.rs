use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Malformed persisted state: {message}")]
    MalformedPersistedState { message: String },

    #[error("Failed to fetch recipe '{recipe_id}': {message}")]
    DirectoryFetchFailure { recipe_id: String, message: String },

    #[error("Invalid slot key: '{key}'")]
    InvalidSlotKey { key: String },

    #[error("Invalid recipe: {reason}")]
    InvalidRecipe { reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Directory,
    Input,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StorageUnavailable { .. }
            | Self::MalformedPersistedState { .. }
            | Self::IoError(_) => ErrorCategory::Storage,
            Self::DirectoryFetchFailure { .. } | Self::ApiError(_) => ErrorCategory::Directory,
            Self::InvalidSlotKey { .. } | Self::InvalidRecipe { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // the plan keeps working in memory
            Self::StorageUnavailable { .. } | Self::MalformedPersistedState { .. } => {
                ErrorSeverity::Low
            }
            Self::DirectoryFetchFailure { .. } | Self::ApiError(_) => ErrorSeverity::Medium,
            Self::InvalidSlotKey { .. }
            | Self::InvalidRecipe { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => {
                "Check that the data directory is writable, or run with --no-storage"
            }
            Self::MalformedPersistedState { .. } => {
                "The saved plan was reset; run `clear` to overwrite the damaged file"
            }
            Self::DirectoryFetchFailure { .. } | Self::ApiError(_) => {
                "Check your network connection and the recipe directory endpoint, then retry"
            }
            Self::InvalidSlotKey { .. } => {
                "Use a slot such as Monday-breakfast, Tuesday-lunch or today-dinner"
            }
            Self::InvalidRecipe { .. } => "Recipes need a non-empty id and name",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or CLI arguments",
            Self::IoError(_) => "Check file permissions and available disk space",
            Self::SerializationError(_) | Self::CsvError(_) => {
                "This is likely a bug; re-run with --verbose and report the log"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::StorageUnavailable { .. } => {
                "Your meal plan could not be saved; changes only live for this run".to_string()
            }
            Self::MalformedPersistedState { .. } => {
                "The saved meal plan was unreadable and has been reset".to_string()
            }
            Self::DirectoryFetchFailure { recipe_id, .. } => {
                format!("Recipe {} could not be loaded from the directory", recipe_id)
            }
            Self::ApiError(_) => "The recipe directory could not be reached".to_string(),
            Self::InvalidSlotKey { key } => format!("'{}' is not a meal slot", key),
            Self::InvalidRecipe { reason } => format!("That recipe cannot be planned: {}", reason),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
