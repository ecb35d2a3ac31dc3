use crate::core::encoder::FeatureEncoder;
use crate::core::renderer;
use crate::domain::model::{PassengerInput, PredictionResult};
use crate::domain::ports::{Classifier, Scaler};
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Read-only prediction context, built once at startup and shared by every
/// submission.
pub struct SurvivalPredictor<C: Classifier, S: Scaler> {
    classifier: C,
    scaler: S,
}

impl<C: Classifier, S: Scaler> SurvivalPredictor<C, S> {
    pub fn new(classifier: C, scaler: S) -> Self {
        Self { classifier, scaler }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    /// Handles one submission. Validation failures return before any
    /// encoding or inference happens.
    pub fn predict(&self, input: &PassengerInput) -> Result<PredictionResult> {
        input.validate()?;

        let features = FeatureEncoder::new(&self.scaler).encode(input)?;
        let result = renderer::render(
            &features,
            &self.classifier,
            input.sex,
            input.ticket_class,
            input.age,
        )?;

        tracing::debug!(
            "Prediction: {} ({:.3}), rationale: {:?}",
            result.outcome(),
            result.probability,
            result.rationale_labels()
        );
        Ok(result)
    }
}
