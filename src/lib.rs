pub mod artifacts;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use artifacts::{ArtifactLoader, Artifacts};
pub use config::{cli::LocalStorage, Settings};
pub use core::predictor::SurvivalPredictor;
pub use utils::error::{PredictError, Result};

#[cfg(feature = "cli")]
pub use config::CliConfig;
