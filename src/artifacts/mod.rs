pub mod loader;
pub mod models;

pub use loader::{ArtifactLoader, Artifacts};
pub use models::{ClassifierArtifact, LogisticRegression, ScalerArtifact, StandardScaler};

pub const DEFAULT_ARTIFACT_DIR: &str = "./models";
pub const DEFAULT_MODEL_FILE: &str = "titanic_survival_model.json";
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
