use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Failed to load {artifact} from '{path}': {reason}")]
    ArtifactLoad {
        artifact: String,
        path: String,
        reason: String,
    },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Inference failed: {message}")]
    Inference { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Nothing can be served until the process is restarted.
    Startup,
    /// Affects one submission only.
    Submission,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictError {
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ArtifactLoad { .. } => ErrorCategory::Startup,
            Self::Validation { .. } | Self::Inference { .. } => ErrorCategory::Submission,
            Self::Config { .. } | Self::Toml(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) | Self::Csv(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } => ErrorSeverity::Low,
            Self::Inference { .. } => ErrorSeverity::Medium,
            Self::Config { .. } | Self::Toml(_) | Self::Csv(_) => ErrorSeverity::High,
            Self::ArtifactLoad { .. } | Self::Io(_) | Self::Serialization(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Per-submission errors leave the predictor usable for the next attempt.
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Submission
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation { field, reason, .. } => match field.as_str() {
                "fare" => "⚠️ Fare must be greater than 0!".to_string(),
                "age" => "⚠️ Please enter a valid age (0-100)".to_string(),
                _ => format!("⚠️ {}", reason),
            },
            Self::Inference { message } => format!("❌ Error in prediction: {}", message),
            Self::ArtifactLoad { artifact, path, .. } => {
                format!("Could not load the {} from {}", artifact, path)
            }
            Self::Config { message } => format!("Configuration problem: {}", message),
            Self::Toml(e) => format!("Configuration file is not valid TOML: {}", e),
            Self::Io(e) => format!("File access failed: {}", e),
            Self::Serialization(e) => format!("Could not encode output: {}", e),
            Self::Csv(e) => format!("Could not read or write CSV: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ArtifactLoad { .. } => {
                "Check --artifact-dir and that both model and scaler JSON files exist and match the expected layout"
            }
            Self::Validation { .. } => "Correct the highlighted field and submit again",
            Self::Inference { .. } => {
                "Make sure the model and scaler were exported from the same training run"
            }
            Self::Config { .. } | Self::Toml(_) => "Review the configuration file and CLI flags",
            Self::Io(_) => "Check that the path exists and is readable",
            Self::Serialization(_) => "Retry with --format text",
            Self::Csv(_) => "Check the CSV header and column values",
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
