use std::fs::File;
use std::io::{BufReader, BufWriter};

use clap::Parser;
use titanic_predict::config::toml_config::TomlConfig;
use titanic_predict::config::{Command, OutputFormat};
use titanic_predict::core::batch::run_batch;
use titanic_predict::core::ConfigProvider;
use titanic_predict::core::form::PassengerForm;
use titanic_predict::core::renderer::{render_json, render_text};
use titanic_predict::utils::error::ErrorSeverity;
use titanic_predict::utils::{logger, validation::Validate};
use titanic_predict::{ArtifactLoader, CliConfig, LocalStorage, PredictError, Settings};

fn exit_code(e: &PredictError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &PredictError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file_config = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };
    let settings = Settings::resolve(cli.overrides(), file_config);

    if settings.log_json {
        logger::init_json_logger(cli.verbose, settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, settings.log_level.as_deref());
    }

    tracing::info!("🚢 Starting titanic-predict");
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        fail(&e);
    }

    // Nothing is served unless both artifacts load.
    let storage = LocalStorage::new(settings.artifact_dir());
    let loader = ArtifactLoader::from_config(storage, &settings);
    let artifacts = match loader.load().await {
        Ok(artifacts) => artifacts,
        Err(e) => fail(&e),
    };
    let predictor = artifacts.predictor();

    match cli.command {
        Command::Predict { passenger, format } => {
            let input = passenger.to_input();
            match predictor.predict(&input) {
                Ok(result) => match format {
                    OutputFormat::Text => println!("{}", render_text(&result)),
                    OutputFormat::Json => println!("{}", render_json(&result)?),
                },
                Err(e) => {
                    tracing::warn!("Submission not predicted: {}", e);
                    eprintln!("{}", e.user_friendly_message());
                    std::process::exit(exit_code(&e));
                }
            }
        }
        Command::Form => {
            println!("🚢 Titanic Survival Predictor");
            println!("Predict your chances of surviving the Titanic disaster based on passenger details!");
            println!("Press Enter to accept the value in brackets.\n");

            let stdin = std::io::stdin();
            let mut form = PassengerForm::new(stdin.lock(), std::io::stdout());
            match form.run(&predictor) {
                Ok(summary) => tracing::info!(
                    "Session ended: {} predicted, {} rejected, {} failed",
                    summary.predicted,
                    summary.rejected,
                    summary.failed
                ),
                Err(e) => fail(&e),
            }
        }
        Command::Batch { input, output } => {
            let reader = match File::open(&input) {
                Ok(file) => BufReader::new(file),
                Err(e) => fail(&PredictError::Io(e)),
            };
            let writer = match File::create(&output) {
                Ok(file) => BufWriter::new(file),
                Err(e) => fail(&PredictError::Io(e)),
            };
            match run_batch(&predictor, reader, writer) {
                Ok(summary) => {
                    println!(
                        "✅ {} rows processed ({} predicted, {} rejected)",
                        summary.processed, summary.predicted, summary.rejected
                    );
                    println!("📁 Output saved to: {}", output);
                }
                Err(e) => fail(&e),
            }
        }
    }

    Ok(())
}
