use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::core::predictor::SurvivalPredictor;
use crate::domain::model::{PassengerInput, PredictionResult};
use crate::domain::ports::{Classifier, Scaler};
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::{parse_measure, parse_relatives, MAX_FARE};

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "ticket_class",
    "age",
    "sex",
    "fare",
    "title",
    "siblings_spouses",
    "parents_children",
    "embark_port",
];

/// One CSV row, kept as text so that a bad value rejects the row instead of
/// the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRow {
    pub ticket_class: String,
    pub age: String,
    pub sex: String,
    pub fare: String,
    pub title: String,
    pub siblings_spouses: String,
    pub parents_children: String,
    pub embark_port: String,
}

impl BatchRow {
    /// Applies the same bounds as the command line and the form: age and
    /// fare finite and non-negative, fare at most 600, relatives 0 to 10.
    /// Age above 100 and a zero fare are left to submission validation.
    pub fn to_input(&self) -> Result<PassengerInput> {
        Ok(PassengerInput {
            ticket_class: self.ticket_class.parse()?,
            age: parse_measure("age", &self.age, None)?,
            sex: self.sex.parse()?,
            fare: parse_measure("fare", &self.fare, Some(MAX_FARE))?,
            title: self.title.parse()?,
            siblings_spouses: parse_relatives("siblings_spouses", &self.siblings_spouses)?,
            parents_children: parse_relatives("parents_children", &self.parents_children)?,
            embark_port: self.embark_port.parse()?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutputRow {
    pub ticket_class: String,
    pub age: String,
    pub sex: String,
    pub fare: String,
    pub title: String,
    pub siblings_spouses: String,
    pub parents_children: String,
    pub embark_port: String,
    pub survived: Option<bool>,
    pub probability: Option<String>,
    pub status: String,
}

impl BatchOutputRow {
    fn from_row(row: BatchRow, outcome: &Result<PredictionResult>) -> Self {
        let (survived, probability, status) = match outcome {
            Ok(result) => (
                Some(result.survived),
                Some(format!("{:.4}", result.probability)),
                "ok".to_string(),
            ),
            Err(e) => (None, None, e.to_string()),
        };
        Self {
            ticket_class: row.ticket_class,
            age: row.age,
            sex: row.sex,
            fare: row.fare,
            title: row.title,
            siblings_spouses: row.siblings_spouses,
            parents_children: row.parents_children,
            embark_port: row.embark_port,
            survived,
            probability,
            status,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub predicted: usize,
    pub rejected: usize,
}

fn check_header(headers: &csv::StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PredictError::Config {
            message: format!("batch input is missing columns: {}", missing.join(", ")),
        })
    }
}

/// Predicts every row of `reader` and writes the annotated rows to `writer`.
///
/// A row that cannot be read as a passenger (bad number, unknown category,
/// short row, invalid UTF-8) or that fails validation is written with its
/// error as status and the run continues. Only an unreadable input, a header
/// without the passenger columns, or a failing model aborts.
pub fn run_batch<C, S, R, W>(
    predictor: &SurvivalPredictor<C, S>,
    reader: R,
    writer: W,
) -> Result<BatchSummary>
where
    C: Classifier,
    S: Scaler,
    R: Read,
    W: Write,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    check_header(&headers)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut summary = BatchSummary::default();

    for (index, record) in csv_reader.records().enumerate() {
        let parsed = match record {
            Ok(record) => record
                .deserialize::<BatchRow>(Some(&headers))
                .map_err(|e| row_error(e.to_string())),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => Err(row_error(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        summary.processed += 1;

        let (row, outcome) = match parsed {
            Ok(row) => {
                let outcome = row.to_input().and_then(|input| predictor.predict(&input));
                (row, outcome)
            }
            Err(e) => (BatchRow::default(), Err(e)),
        };

        let outcome = match outcome {
            Ok(result) => {
                summary.predicted += 1;
                Ok(result)
            }
            Err(e) if e.is_recoverable() => {
                summary.rejected += 1;
                tracing::warn!("Row {} rejected: {}", index + 1, e);
                Err(e)
            }
            Err(e) => return Err(e),
        };
        csv_writer.serialize(BatchOutputRow::from_row(row, &outcome))?;
    }

    csv_writer.flush()?;
    tracing::info!(
        "📊 Batch finished: {} rows, {} predicted, {} rejected",
        summary.processed,
        summary.predicted,
        summary.rejected
    );
    Ok(summary)
}

fn row_error(reason: String) -> PredictError {
    PredictError::Validation {
        field: "row".to_string(),
        value: String::new(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FeatureVector;

    struct ByClass;

    impl Classifier for ByClass {
        fn predict(&self, features: &FeatureVector) -> Result<u8> {
            Ok(u8::from(features.get(FeatureVector::TICKET_CLASS) == Some(1.0)))
        }

        fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
            let p = if self.predict(features)? == 1 { 0.9 } else { 0.3 };
            Ok([1.0 - p, p])
        }
    }

    struct Identity;

    impl Scaler for Identity {
        fn transform(&self, columns: &[f64]) -> Result<Vec<f64>> {
            Ok(columns.to_vec())
        }
    }

    const HEADER: &str = "ticket_class,age,sex,fare,title,siblings_spouses,parents_children,embark_port\n";

    fn run(rows: &str) -> (BatchSummary, Vec<String>) {
        let input = format!("{}{}", HEADER, rows);
        let predictor = SurvivalPredictor::new(ByClass, Identity);
        let mut out = Vec::new();
        let summary = run_batch(&predictor, input.as_bytes(), &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (summary, lines)
    }

    #[test]
    fn test_batch_annotates_each_row() {
        let (summary, lines) = run(
            "1,25,Female,50,Mrs,0,0,Southampton\n3,60,Male,7,Mr,0,0,Q\n2,30,Female,0,Miss,1,0,C\n1,40,Male,30,Dr,0,0,S\n",
        );
        assert_eq!(summary, BatchSummary { processed: 4, predicted: 2, rejected: 2 });

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("survived,probability,status"));
        assert!(lines[1].starts_with("1,25,Female,50,Mrs,0,0,Southampton,"));
        assert!(lines[1].ends_with("true,0.9000,ok"));
        assert!(lines[2].ends_with("false,0.7000,ok"));
        assert!(lines[3].contains("Fare must be greater than 0"));
        assert!(lines[4].contains("title"));
    }

    #[test]
    fn test_out_of_range_family_count_is_rejected() {
        let (summary, lines) = run("3,20,Male,8,Mr,12,0,S\n");
        assert_eq!(summary.rejected, 1);
        assert!(lines[1].contains("siblings_spouses"));
    }

    #[test]
    fn test_bad_numbers_reject_only_their_row() {
        let (summary, lines) = run(
            "1,25,Female,50,Mrs,0,0,S\n1,abc,Female,50,Mrs,0,0,S\n3,20,Male,8,Mr,300,0,S\n1,30,Female,40,Miss,0,0,C\n",
        );
        assert_eq!(summary, BatchSummary { processed: 4, predicted: 2, rejected: 2 });

        assert_eq!(lines.len(), 5);
        assert!(lines[1].ends_with("true,0.9000,ok"));
        assert!(lines[2].starts_with("1,abc,"));
        assert!(lines[2].contains("age"));
        assert!(lines[3].starts_with("3,20,Male,8,Mr,300,"));
        assert!(lines[3].contains("siblings_spouses"));
        assert!(lines[4].ends_with("true,0.9000,ok"));
    }

    #[test]
    fn test_batch_applies_input_bounds() {
        let (summary, lines) = run(
            "3,-5,Male,8,Mr,0,0,S\n3,NaN,Male,8,Mr,0,0,S\n1,30,Female,700,Mrs,0,0,S\n1,30,Female,600,Mrs,0,0,S\n",
        );
        assert_eq!(summary, BatchSummary { processed: 4, predicted: 1, rejected: 3 });
        assert!(lines[1].contains("age"));
        assert!(lines[2].contains("age"));
        assert!(lines[3].contains("fare"));
        assert!(lines[4].ends_with("true,0.9000,ok"));
    }

    #[test]
    fn test_short_row_is_rejected_and_run_continues() {
        let (summary, lines) = run("1,25,Female\n3,20,Male,8,Mr,0,0,S\n");
        assert_eq!(summary, BatchSummary { processed: 2, predicted: 1, rejected: 1 });
        assert!(!lines[1].ends_with(",ok"));
        assert!(lines[2].ends_with("false,0.7000,ok"));
    }

    #[test]
    fn test_missing_column_aborts() {
        let input = "ticket_class,age,sex,title,siblings_spouses,parents_children,embark_port\n1,25,Female,Mrs,0,0,S\n";
        let predictor = SurvivalPredictor::new(ByClass, Identity);
        let err = run_batch(&predictor, input.as_bytes(), Vec::new()).unwrap_err();
        assert!(matches!(err, PredictError::Config { ref message } if message.contains("fare")));
    }
}
