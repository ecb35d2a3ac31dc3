use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::artifacts::models::{ClassifierArtifact, ScalerArtifact};
use crate::core::predictor::SurvivalPredictor;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{PredictError, Result};

/// Classifier and scaler as loaded from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub classifier: ClassifierArtifact,
    pub scaler: ScalerArtifact,
}

impl Artifacts {
    pub fn predictor(&self) -> SurvivalPredictor<&ClassifierArtifact, &ScalerArtifact> {
        SurvivalPredictor::new(&self.classifier, &self.scaler)
    }
}

/// Reads both artifacts once. Later calls to [`ArtifactLoader::load`] hand out
/// the cached pair without touching storage again.
pub struct ArtifactLoader<S: Storage> {
    storage: S,
    model_file: String,
    scaler_file: String,
    cache: OnceCell<Arc<Artifacts>>,
}

impl<S: Storage> ArtifactLoader<S> {
    pub fn new(storage: S, model_file: impl Into<String>, scaler_file: impl Into<String>) -> Self {
        Self {
            storage,
            model_file: model_file.into(),
            scaler_file: scaler_file.into(),
            cache: OnceCell::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::new(storage, config.model_file(), config.scaler_file())
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    pub async fn load(&self) -> Result<Arc<Artifacts>> {
        let artifacts = self
            .cache
            .get_or_try_init(|| async {
                tracing::info!("📦 Loading classifier from {}", self.model_file);
                let classifier: ClassifierArtifact =
                    self.read_artifact("classifier", &self.model_file).await?;
                classifier
                    .check()
                    .map_err(|reason| load_error("classifier", &self.model_file, reason))?;

                tracing::info!("📦 Loading scaler from {}", self.scaler_file);
                let scaler: ScalerArtifact = self.read_artifact("scaler", &self.scaler_file).await?;
                scaler
                    .check()
                    .map_err(|reason| load_error("scaler", &self.scaler_file, reason))?;

                tracing::info!("✅ Artifacts loaded");
                Ok::<_, PredictError>(Arc::new(Artifacts { classifier, scaler }))
            })
            .await?;
        Ok(Arc::clone(artifacts))
    }

    async fn read_artifact<T: DeserializeOwned>(&self, artifact: &str, path: &str) -> Result<T> {
        let bytes = self
            .storage
            .read_file(path)
            .await
            .map_err(|e| load_error(artifact, path, e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| load_error(artifact, path, e.to_string()))
    }
}

fn load_error(artifact: &str, path: &str, reason: impl Into<String>) -> PredictError {
    PredictError::ArtifactLoad {
        artifact: artifact.to_string(),
        path: path.to_string(),
        reason: reason.into(),
    }
}
