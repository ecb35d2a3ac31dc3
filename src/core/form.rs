use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::core::predictor::SurvivalPredictor;
use crate::core::renderer::render_text;
use crate::domain::model::{EmbarkPort, PassengerInput, Sex, TicketClass, Title};
use crate::domain::ports::{Classifier, Scaler};
use crate::utils::error::{PredictError, Result};

/// Typical fare for a ticket class, used to prefill the fare field.
pub fn default_fare(ticket_class: TicketClass) -> f64 {
    match ticket_class {
        TicketClass::First => 32.20,
        TicketClass::Second => 15.75,
        TicketClass::Third => 8.05,
    }
}

pub const DEFAULT_AGE: f64 = 25.0;

/// Interactive passenger form on a line-based terminal.
pub struct PassengerForm<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

/// Count of submissions handled in one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub predicted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl<R: BufRead, W: Write> PassengerForm<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// `None` once the input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until the answer parses. An empty answer takes the default.
    fn ask<T, F>(&mut self, prompt: &str, default: T, parse: F) -> Result<Option<T>>
    where
        T: std::fmt::Display,
        F: Fn(&str) -> std::result::Result<T, String>,
    {
        loop {
            write!(self.writer, "{} [{}]: ", prompt, default)?;
            self.writer.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => writeln!(self.writer, "  {}", message)?,
            }
        }
    }

    pub fn fill(&mut self) -> Result<Option<PassengerInput>> {
        writeln!(self.writer, "🧑 Passenger Details")?;
        let Some(ticket_class) = self.ask("Ticket Class (1, 2, 3)", TicketClass::First, parse_choice)? else {
            return Ok(None);
        };
        let Some(age) = self.ask("Age", DEFAULT_AGE, |s| parse_bounded(s, 0.0, 100.0))? else {
            return Ok(None);
        };
        let Some(sex) = self.ask("Gender (Female, Male)", Sex::Female, parse_choice)? else {
            return Ok(None);
        };
        let Some(fare) = self.ask("Fare (£)", default_fare(ticket_class), |s| parse_bounded(s, 0.0, 600.0))? else {
            return Ok(None);
        };
        let Some(title) = self.ask("Title (Mr, Mrs, Miss, Master, Other)", Title::Mr, parse_choice)? else {
            return Ok(None);
        };

        writeln!(self.writer, "👨‍👩‍👧‍👦 Family Members")?;
        let Some(siblings_spouses) = self.ask("Siblings/Spouses Aboard", 0u8, parse_count)? else {
            return Ok(None);
        };
        let Some(parents_children) = self.ask("Parents/Children Aboard", 0u8, parse_count)? else {
            return Ok(None);
        };

        writeln!(self.writer, "⚓ Embarkation Information")?;
        let Some(embark_port) = self.ask("Port of Embarkation (S, C, Q)", EmbarkPort::Southampton, parse_choice)? else {
            return Ok(None);
        };

        Ok(Some(PassengerInput {
            ticket_class,
            age,
            sex,
            fare,
            title,
            siblings_spouses,
            parents_children,
            embark_port,
        }))
    }

    /// Fills the form and predicts until the input runs out or the user
    /// declines another passenger. Submission errors are shown and the
    /// session carries on.
    pub fn run<C: Classifier, S: Scaler>(
        &mut self,
        predictor: &SurvivalPredictor<C, S>,
    ) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        while let Some(input) = self.fill()? {
            match predictor.predict(&input) {
                Ok(result) => {
                    summary.predicted += 1;
                    writeln!(self.writer, "\n{}\n", render_text(&result))?;
                }
                Err(e) if e.is_recoverable() => {
                    if matches!(e, PredictError::Validation { .. }) {
                        summary.rejected += 1;
                        tracing::warn!("Submission rejected: {}", e);
                    } else {
                        summary.failed += 1;
                        tracing::error!("Prediction failed: {}", e);
                    }
                    writeln!(self.writer, "\n{}\n", e.user_friendly_message())?;
                }
                Err(e) => return Err(e),
            }

            let again = self.ask("Predict another passenger? (y/n)", 'y', |s| {
                match s.to_ascii_lowercase().as_str() {
                    "y" | "yes" => Ok('y'),
                    "n" | "no" => Ok('n'),
                    _ => Err("Please answer y or n".to_string()),
                }
            })?;
            if again != Some('y') {
                break;
            }
        }

        Ok(summary)
    }
}

fn parse_choice<T: FromStr<Err = PredictError>>(value: &str) -> std::result::Result<T, String> {
    value.parse::<T>().map_err(|e| match e {
        PredictError::Validation { reason, .. } => reason,
        other => other.to_string(),
    })
}

fn parse_bounded(value: &str, min: f64, max: f64) -> std::result::Result<f64, String> {
    let number: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !number.is_finite() || number < min || number > max {
        return Err(format!("Enter a value between {} and {}", min, max));
    }
    Ok(number)
}

fn parse_count(value: &str) -> std::result::Result<u8, String> {
    match value.parse::<u8>() {
        Ok(n) if n <= 10 => Ok(n),
        _ => Err("Enter a whole number between 0 and 10".to_string()),
    }
}
