use crate::domain::model::{
    FeatureVector, Outcome, PredictionResult, Rationale, Sex, TicketClass,
};
use crate::domain::ports::Classifier;
use crate::utils::error::{PredictError, Result};
use serde::Serialize;

/// Rationale bullets are fixed heuristics on the raw form values, not model
/// feature importances.
pub fn rationale(outcome: Outcome, sex: Sex, ticket_class: TicketClass, age: f64) -> Vec<Rationale> {
    let rules: [(bool, Rationale); 3] = match outcome {
        Outcome::Survived => [
            (sex == Sex::Female, Rationale::FemaleGender),
            (ticket_class == TicketClass::First, Rationale::HigherClassTicket),
            (age < 18.0, Rationale::YoungerAge),
        ],
        Outcome::DidNotSurvive => [
            (sex == Sex::Male, Rationale::MaleGender),
            (ticket_class == TicketClass::Third, Rationale::LowerClassTicket),
            (age > 50.0, Rationale::OlderAge),
        ],
    };

    rules
        .into_iter()
        .filter_map(|(holds, bullet)| holds.then_some(bullet))
        .collect()
}

pub fn render<C: Classifier + ?Sized>(
    vector: &FeatureVector,
    classifier: &C,
    sex: Sex,
    ticket_class: TicketClass,
    age: f64,
) -> Result<PredictionResult> {
    let label = classifier.predict(vector)?;
    if label > 1 {
        return Err(PredictError::inference(format!(
            "classifier returned unknown label {}",
            label
        )));
    }

    let [_, p_survive] = classifier.predict_proba(vector)?;
    if !(0.0..=1.0).contains(&p_survive) {
        return Err(PredictError::inference(format!(
            "survival probability {} is outside [0, 1]",
            p_survive
        )));
    }

    let outcome = Outcome::from_label(label);
    let probability = match outcome {
        Outcome::Survived => p_survive,
        Outcome::DidNotSurvive => 1.0 - p_survive,
    };

    Ok(PredictionResult {
        survived: outcome == Outcome::Survived,
        probability,
        rationale: rationale(outcome, sex, ticket_class, age),
    })
}

/// `87.3%`
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

pub fn render_text(result: &PredictionResult) -> String {
    let (headline, header) = match result.outcome() {
        Outcome::Survived => ("✅", "Higher chances likely due to:"),
        Outcome::DidNotSurvive => ("❌", "Lower chances likely due to:"),
    };

    let mut lines = vec![
        "Prediction Result".to_string(),
        format!(
            "{} {} (Probability: {})",
            headline,
            result.outcome(),
            format_probability(result.probability)
        ),
        header.to_string(),
    ];
    lines.extend(
        result
            .rationale
            .iter()
            .map(|r| format!("- {} {}", r.icon(), capitalize(r.label()))),
    );
    lines.join("\n")
}

/// Machine-readable form of a prediction, with rationale as display labels.
#[derive(Debug, Serialize)]
pub struct PredictionReport {
    pub outcome: Outcome,
    pub survived: bool,
    pub probability: f64,
    pub rationale: Vec<&'static str>,
}

impl From<&PredictionResult> for PredictionReport {
    fn from(result: &PredictionResult) -> Self {
        Self {
            outcome: result.outcome(),
            survived: result.survived,
            probability: result.probability,
            rationale: result.rationale_labels(),
        }
    }
}

pub fn render_json(result: &PredictionResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&PredictionReport::from(result))?)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
