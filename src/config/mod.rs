pub mod cli;
pub mod toml_config;

use crate::artifacts::{DEFAULT_ARTIFACT_DIR, DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use toml_config::TomlConfig;

/// Where the artifacts live and how to log, after merging CLI flags over the
/// config file over built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub artifact_dir: String,
    pub model_file: String,
    pub scaler_file: String,
    pub log_level: Option<String>,
    pub log_json: bool,
}

/// Values given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub artifact_dir: Option<String>,
    pub model_file: Option<String>,
    pub scaler_file: Option<String>,
    pub log_json: bool,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: Option<TomlConfig>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            artifact_dir: overrides
                .artifact_dir
                .or(file.artifacts.dir)
                .unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string()),
            model_file: overrides
                .model_file
                .or(file.artifacts.model_file)
                .unwrap_or_else(|| DEFAULT_MODEL_FILE.to_string()),
            scaler_file: overrides
                .scaler_file
                .or(file.artifacts.scaler_file)
                .unwrap_or_else(|| DEFAULT_SCALER_FILE.to_string()),
            log_level: file.logging.level,
            log_json: overrides.log_json || file.logging.json.unwrap_or(false),
        }
    }
}

impl ConfigProvider for Settings {
    fn artifact_dir(&self) -> &str {
        &self.artifact_dir
    }

    fn model_file(&self) -> &str {
        &self.model_file
    }

    fn scaler_file(&self) -> &str {
        &self.scaler_file
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("artifacts.dir", &self.artifact_dir)?;
        validate_path("artifacts.model_file", &self.model_file)?;
        validate_path("artifacts.scaler_file", &self.scaler_file)?;
        validate_file_extension("artifacts.model_file", &self.model_file, &["json"])?;
        validate_file_extension("artifacts.scaler_file", &self.scaler_file, &["json"])?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command, OutputFormat, PassengerArgs};

#[cfg(feature = "cli")]
mod args {
    use super::Overrides;
    use crate::core::form::default_fare;
    use crate::domain::model::{EmbarkPort, PassengerInput, Sex, TicketClass, Title};
    use crate::utils::validation::{parse_measure, MAX_FARE};
    use clap::{Args, Parser, Subcommand, ValueEnum};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "titanic-predict")]
    #[command(about = "Predict Titanic passenger survival from a pre-trained classifier")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<String>,

        /// Directory holding the model and scaler artifacts
        #[arg(long, global = true)]
        pub artifact_dir: Option<String>,

        #[arg(long, global = true)]
        pub model_file: Option<String>,

        #[arg(long, global = true)]
        pub scaler_file: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    impl CliConfig {
        pub fn overrides(&self) -> Overrides {
            Overrides {
                artifact_dir: self.artifact_dir.clone(),
                model_file: self.model_file.clone(),
                scaler_file: self.scaler_file.clone(),
                log_json: self.log_json,
            }
        }
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Predict one passenger given as flags
        Predict {
            #[command(flatten)]
            passenger: PassengerArgs,

            #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
            format: OutputFormat,
        },
        /// Fill in the passenger form interactively
        Form,
        /// Predict every row of a CSV file
        Batch {
            #[arg(short, long)]
            input: String,

            #[arg(short, long)]
            output: String,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum OutputFormat {
        Text,
        Json,
    }

    #[derive(Debug, Clone, Args)]
    pub struct PassengerArgs {
        /// 1 = 1st Class, 2 = 2nd Class, 3 = 3rd Class
        #[arg(long, default_value = "1")]
        pub ticket_class: TicketClass,

        #[arg(long, default_value_t = 25.0, value_parser = parse_age)]
        pub age: f64,

        #[arg(long, default_value = "Female")]
        pub sex: Sex,

        /// Fare in pounds (0-600); defaults to a typical fare for the ticket class
        #[arg(long, value_parser = parse_fare)]
        pub fare: Option<f64>,

        /// Social title from the passenger name
        #[arg(long, default_value = "Mr")]
        pub title: Title,

        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
        pub siblings_spouses: u8,

        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=10))]
        pub parents_children: u8,

        /// S = Southampton, C = Cherbourg, Q = Queenstown
        #[arg(long, default_value = "Southampton")]
        pub embark_port: EmbarkPort,
    }

    impl PassengerArgs {
        pub fn to_input(&self) -> PassengerInput {
            PassengerInput {
                ticket_class: self.ticket_class,
                age: self.age,
                sex: self.sex,
                fare: self.fare.unwrap_or_else(|| default_fare(self.ticket_class)),
                title: self.title,
                siblings_spouses: self.siblings_spouses,
                parents_children: self.parents_children,
                embark_port: self.embark_port,
            }
        }
    }

    fn parse_age(value: &str) -> Result<f64, String> {
        parse_measure("age", value, None).map_err(|e| e.to_string())
    }

    fn parse_fare(value: &str) -> Result<f64, String> {
        parse_measure("fare", value, Some(MAX_FARE)).map_err(|e| e.to_string())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_file_overrides_defaults() {
        let file = TomlConfig::from_toml_str(
            "[artifacts]\ndir = \"/etc/models\"\nmodel_file = \"file.json\"\n",
        )
        .unwrap();
        let overrides = Overrides {
            model_file: Some("cli.json".to_string()),
            ..Default::default()
        };

        let settings = Settings::resolve(overrides, Some(file));
        assert_eq!(settings.artifact_dir, "/etc/models");
        assert_eq!(settings.model_file, "cli.json");
        assert_eq!(settings.scaler_file, DEFAULT_SCALER_FILE);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_pickle_artifacts_rejected() {
        let overrides = Overrides {
            model_file: Some("titanic_survival_model.pkl".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(overrides, None).validate().is_err());
    }
}
