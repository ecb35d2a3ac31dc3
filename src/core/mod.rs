pub mod batch;
pub mod encoder;
pub mod form;
pub mod predictor;
pub mod renderer;

pub use crate::domain::model::{FeatureVector, PassengerInput, PredictionResult};
pub use crate::domain::ports::{Classifier, ConfigProvider, Scaler, Storage};
pub use crate::utils::error::Result;
