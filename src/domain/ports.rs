use crate::domain::model::FeatureVector;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Pre-trained binary classifier. Label 1 means survived.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<u8>;

    /// `[p(not survive), p(survive)]`
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]>;
}

/// Pre-fit rescaling of the numeric columns, in the column order it was fit on.
pub trait Scaler: Send + Sync {
    fn transform(&self, columns: &[f64]) -> Result<Vec<f64>>;
}

impl<T: Classifier + ?Sized> Classifier for &T {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        (**self).predict(features)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        (**self).predict_proba(features)
    }
}

impl<T: Scaler + ?Sized> Scaler for &T {
    fn transform(&self, columns: &[f64]) -> Result<Vec<f64>> {
        (**self).transform(columns)
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn artifact_dir(&self) -> &str;
    fn model_file(&self) -> &str;
    fn scaler_file(&self) -> &str;
}
