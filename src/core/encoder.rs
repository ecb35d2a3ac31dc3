use crate::domain::model::{EmbarkPort, FeatureVector, PassengerInput, Sex, Title};
use crate::domain::ports::Scaler;
use crate::utils::error::{PredictError, Result};

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Builds the unscaled vector in training column order.
///
/// Sex drops `Female` and port drops `Cherbourg` as baselines, while all five
/// title indicators are kept. The model was trained on that layout.
pub fn raw_features(input: &PassengerInput) -> FeatureVector {
    FeatureVector::new([
        f64::from(input.ticket_class.as_number()),
        input.age,
        f64::from(input.siblings_spouses),
        f64::from(input.parents_children),
        input.fare,
        indicator(input.sex == Sex::Male),
        indicator(input.embark_port == EmbarkPort::Queenstown),
        indicator(input.embark_port == EmbarkPort::Southampton),
        indicator(input.title == Title::Mr),
        indicator(input.title == Title::Mrs),
        indicator(input.title == Title::Miss),
        indicator(input.title == Title::Master),
        indicator(input.title == Title::Other),
    ])
}

/// Replaces the age and fare slots with the scaler's output. Every other
/// slot is left untouched.
pub fn apply_scaler<S: Scaler + ?Sized>(mut vector: FeatureVector, scaler: &S) -> Result<FeatureVector> {
    let columns: Vec<f64> = FeatureVector::SCALED
        .iter()
        .map(|&index| vector.as_slice()[index])
        .collect();

    let scaled = scaler.transform(&columns)?;
    if scaled.len() != columns.len() {
        return Err(PredictError::inference(format!(
            "scaler returned {} columns, expected {}",
            scaled.len(),
            columns.len()
        )));
    }

    for (&index, value) in FeatureVector::SCALED.iter().zip(scaled) {
        vector.set(index, value);
    }
    Ok(vector)
}

pub struct FeatureEncoder<'a, S: Scaler + ?Sized> {
    scaler: &'a S,
}

impl<'a, S: Scaler + ?Sized> FeatureEncoder<'a, S> {
    pub fn new(scaler: &'a S) -> Self {
        Self { scaler }
    }

    /// Expects input that already passed validation.
    pub fn encode(&self, input: &PassengerInput) -> Result<FeatureVector> {
        // Not a model column; only logged.
        let family_size = input.family_size();
        tracing::debug!("Encoding passenger (family size {})", family_size);

        let raw = raw_features(input);
        tracing::debug!("Raw features: {:?}", raw.named().collect::<Vec<_>>());

        apply_scaler(raw, self.scaler)
    }
}
