use crate::utils::error::{PredictError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional configuration file. Every key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    pub dir: Option<String>,
    pub model_file: Option<String>,
    pub scaler_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| PredictError::Config {
            message: format!(
                "cannot read config file '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[artifacts]
dir = "/srv/models"
model_file = "lr.json"
scaler_file = "std.json"

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        assert_eq!(config.artifacts.dir.as_deref(), Some("/srv/models"));
        assert_eq!(config.artifacts.model_file.as_deref(), Some("lr.json"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.json, Some(true));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.artifacts.dir.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TITANIC_TEST_MODEL_DIR", "/opt/titanic");

        let config = TomlConfig::from_toml_str(
            r#"
[artifacts]
dir = "${TITANIC_TEST_MODEL_DIR}/v2"
scaler_file = "${TITANIC_TEST_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.artifacts.dir.as_deref(), Some("/opt/titanic/v2"));
        assert_eq!(config.artifacts.scaler_file.as_deref(), Some("${TITANIC_TEST_UNSET_VAR}"));

        std::env::remove_var("TITANIC_TEST_MODEL_DIR");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[artifacts\ndir = 1").unwrap_err();
        assert!(matches!(err, PredictError::Toml(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[artifacts]\nmodel_file = \"model.json\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.artifacts.model_file.as_deref(), Some("model.json"));
        assert!(TomlConfig::from_file("/nonexistent/titanic.toml").is_err());
    }
}
