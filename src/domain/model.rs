use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PredictError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TicketClass {
    First,
    Second,
    Third,
}

impl TicketClass {
    pub const ALL: [TicketClass; 3] = [Self::First, Self::Second, Self::Third];

    pub fn as_number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

impl TryFrom<u8> for TicketClass {
    type Error = PredictError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(PredictError::Validation {
                field: "ticket_class".to_string(),
                value: other.to_string(),
                reason: "Ticket class must be 1, 2 or 3".to_string(),
            }),
        }
    }
}

impl From<TicketClass> for u8 {
    fn from(value: TicketClass) -> Self {
        value.as_number()
    }
}

impl FromStr for TicketClass {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s.trim().parse::<u8>().map_err(|_| PredictError::Validation {
            field: "ticket_class".to_string(),
            value: s.to_string(),
            reason: "Ticket class must be 1, 2 or 3".to_string(),
        })?;
        Self::try_from(number)
    }
}

impl fmt::Display for TicketClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl FromStr for Sex {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Self::Female),
            "male" | "m" => Ok(Self::Male),
            _ => Err(unknown_choice("sex", s, "Female, Male")),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
        }
    }
}

/// Social title taken from the passenger name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    Mr,
    Mrs,
    Miss,
    Master,
    Other,
}

impl Title {
    pub const ALL: [Title; 5] = [Self::Mr, Self::Mrs, Self::Miss, Self::Master, Self::Other];
}

impl FromStr for Title {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "mr" => Ok(Self::Mr),
            "mrs" => Ok(Self::Mrs),
            "miss" => Ok(Self::Miss),
            "master" => Ok(Self::Master),
            "other" => Ok(Self::Other),
            _ => Err(unknown_choice("title", s, "Mr, Mrs, Miss, Master, Other")),
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mr => "Mr",
            Self::Mrs => "Mrs",
            Self::Miss => "Miss",
            Self::Master => "Master",
            Self::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbarkPort {
    Southampton,
    Cherbourg,
    Queenstown,
}

impl EmbarkPort {
    pub fn code(self) -> char {
        match self {
            Self::Southampton => 'S',
            Self::Cherbourg => 'C',
            Self::Queenstown => 'Q',
        }
    }
}

impl FromStr for EmbarkPort {
    type Err = PredictError;

    /// Accepts `Southampton`, `S` and the form label `Southampton (S)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.split('(').next().unwrap_or(s).trim().to_ascii_lowercase();
        match name.as_str() {
            "southampton" | "s" => Ok(Self::Southampton),
            "cherbourg" | "c" => Ok(Self::Cherbourg),
            "queenstown" | "q" => Ok(Self::Queenstown),
            _ => Err(unknown_choice(
                "embark_port",
                s,
                "Southampton (S), Cherbourg (C), Queenstown (Q)",
            )),
        }
    }
}

impl fmt::Display for EmbarkPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Southampton => "Southampton",
            Self::Cherbourg => "Cherbourg",
            Self::Queenstown => "Queenstown",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

fn unknown_choice(field: &str, value: &str, choices: &str) -> PredictError {
    PredictError::Validation {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!("Expected one of: {}", choices),
    }
}

/// One form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerInput {
    pub ticket_class: TicketClass,
    pub age: f64,
    pub sex: Sex,
    pub fare: f64,
    pub title: Title,
    pub siblings_spouses: u8,
    pub parents_children: u8,
    pub embark_port: EmbarkPort,
}

impl PassengerInput {
    /// Relatives aboard plus the passenger. The trained model does not take
    /// this column, so it never reaches the feature vector.
    pub fn family_size(&self) -> u32 {
        u32::from(self.siblings_spouses) + u32::from(self.parents_children) + 1
    }
}

/// Number of columns the classifier was trained on.
pub const FEATURE_COUNT: usize = 13;

/// Column order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Pclass",
    "Age",
    "SibSp",
    "Parch",
    "Fare",
    "Sex_male",
    "Embarked_Q",
    "Embarked_S",
    "Title_Mr",
    "Title_Mrs",
    "Title_Miss",
    "Title_Master",
    "Title_Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const TICKET_CLASS: usize = 0;
    pub const AGE: usize = 1;
    pub const SIBLINGS_SPOUSES: usize = 2;
    pub const PARENTS_CHILDREN: usize = 3;
    pub const FARE: usize = 4;
    pub const IS_MALE: usize = 5;
    pub const EMBARK_QUEENSTOWN: usize = 6;
    pub const EMBARK_SOUTHAMPTON: usize = 7;
    pub const TITLE_MR: usize = 8;
    pub const TITLE_MRS: usize = 9;
    pub const TITLE_MISS: usize = 10;
    pub const TITLE_MASTER: usize = 11;
    pub const TITLE_OTHER: usize = 12;

    /// Slots passed through the scaler, in the order the scaler was fit on.
    pub const SCALED: [usize; 2] = [Self::AGE, Self::FARE];

    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Pairs each slot with its training column name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, value: f64) {
        self.0[index] = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Survived,
    DidNotSurvive,
}

impl Outcome {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Self::Survived
        } else {
            Self::DidNotSurvive
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survived => write!(f, "Survived"),
            Self::DidNotSurvive => write!(f, "Did Not Survive"),
        }
    }
}

/// Fixed presentation heuristics shown under a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rationale {
    FemaleGender,
    HigherClassTicket,
    YoungerAge,
    MaleGender,
    LowerClassTicket,
    OlderAge,
}

impl Rationale {
    pub fn label(self) -> &'static str {
        match self {
            Self::FemaleGender => "female gender",
            Self::HigherClassTicket => "higher class ticket",
            Self::YoungerAge => "younger age",
            Self::MaleGender => "male gender",
            Self::LowerClassTicket => "lower class ticket",
            Self::OlderAge => "older age",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::FemaleGender => "🚺",
            Self::HigherClassTicket => "🎫",
            Self::YoungerAge => "👶",
            Self::MaleGender => "🚹",
            Self::LowerClassTicket => "🎟️",
            Self::OlderAge => "👴",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub survived: bool,
    /// Probability of the predicted outcome.
    pub probability: f64,
    pub rationale: Vec<Rationale>,
}

impl PredictionResult {
    pub fn outcome(&self) -> Outcome {
        if self.survived {
            Outcome::Survived
        } else {
            Outcome::DidNotSurvive
        }
    }

    pub fn rationale_labels(&self) -> Vec<&'static str> {
        self.rationale.iter().map(|r| r.label()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choices_case_insensitively() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!(" Female ".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("MASTER".parse::<Title>().unwrap(), Title::Master);
        assert_eq!("Mrs.".parse::<Title>().unwrap(), Title::Mrs);
        assert!("Dr".parse::<Title>().is_err());
    }

    #[test]
    fn test_parse_embark_port_forms() {
        assert_eq!("Queenstown (Q)".parse::<EmbarkPort>().unwrap(), EmbarkPort::Queenstown);
        assert_eq!("c".parse::<EmbarkPort>().unwrap(), EmbarkPort::Cherbourg);
        assert_eq!("southampton".parse::<EmbarkPort>().unwrap(), EmbarkPort::Southampton);
        assert!("Belfast".parse::<EmbarkPort>().is_err());
    }

    #[test]
    fn test_ticket_class_bounds() {
        assert_eq!("2".parse::<TicketClass>().unwrap(), TicketClass::Second);
        assert!("0".parse::<TicketClass>().is_err());
        assert!("4".parse::<TicketClass>().is_err());
        assert!("first".parse::<TicketClass>().is_err());
    }

    #[test]
    fn test_family_size_counts_passenger() {
        let input = PassengerInput {
            ticket_class: TicketClass::Third,
            age: 30.0,
            sex: Sex::Male,
            fare: 8.05,
            title: Title::Mr,
            siblings_spouses: 2,
            parents_children: 3,
            embark_port: EmbarkPort::Southampton,
        };
        assert_eq!(input.family_size(), 6);
    }

    #[test]
    fn test_passenger_json_uses_numeric_class() {
        let json = r#"{"ticket_class":1,"age":25.0,"sex":"Female","fare":50.0,"title":"Mrs",
            "siblings_spouses":0,"parents_children":0,"embark_port":"Southampton"}"#;
        let input: PassengerInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.ticket_class, TicketClass::First);
        assert!(serde_json::from_str::<PassengerInput>(&json.replace("\"ticket_class\":1", "\"ticket_class\":5")).is_err());
    }
}
