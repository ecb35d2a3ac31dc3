use crate::domain::model::PassengerInput;
use crate::utils::error::{PredictError, Result};

pub const MAX_AGE: f64 = 100.0;
pub const MAX_FARE: f64 = 600.0;
pub const MAX_RELATIVES: u8 = 10;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// The two submission checks: fare must be positive, age at most 100.
/// Anything else is constrained by the input surface.
impl Validate for PassengerInput {
    fn validate(&self) -> Result<()> {
        if self.fare <= 0.0 {
            return Err(PredictError::Validation {
                field: "fare".to_string(),
                value: self.fare.to_string(),
                reason: "Fare must be greater than 0".to_string(),
            });
        }

        if self.age > MAX_AGE {
            return Err(PredictError::Validation {
                field: "age".to_string(),
                value: self.age.to_string(),
                reason: format!("Age must be between 0 and {}", MAX_AGE),
            });
        }

        Ok(())
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid_config(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid_config(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(invalid_config(
            field_name,
            file,
            &format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        )),
        None => Err(invalid_config(
            field_name,
            file,
            "File has no extension or invalid filename",
        )),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PredictError::Validation {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Input-surface bound for age and fare: a finite number, at least 0 and at
/// most `max` when given. Age is left unbounded above so that values over 100
/// reach submission validation.
pub fn parse_measure(field_name: &str, raw: &str, max: Option<f64>) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| PredictError::Validation {
        field: field_name.to_string(),
        value: raw.to_string(),
        reason: "Value is not a number".to_string(),
    })?;
    if !value.is_finite() {
        return Err(PredictError::Validation {
            field: field_name.to_string(),
            value: raw.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    validate_range(field_name, value, 0.0, max.unwrap_or(f64::MAX))?;
    Ok(value)
}

/// Siblings/spouses or parents/children aboard, 0 to 10.
pub fn parse_relatives(field_name: &str, raw: &str) -> Result<u8> {
    let value: u8 = raw.trim().parse().map_err(|_| PredictError::Validation {
        field: field_name.to_string(),
        value: raw.to_string(),
        reason: format!("Value must be a whole number between 0 and {}", MAX_RELATIVES),
    })?;
    validate_range(field_name, value, 0, MAX_RELATIVES)?;
    Ok(value)
}

fn invalid_config(field_name: &str, value: &str, reason: &str) -> PredictError {
    PredictError::Config {
        message: format!("{} = '{}': {}", field_name, value, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EmbarkPort, Sex, TicketClass, Title};

    fn passenger(age: f64, fare: f64) -> PassengerInput {
        PassengerInput {
            ticket_class: TicketClass::Second,
            age,
            sex: Sex::Female,
            fare,
            title: Title::Miss,
            siblings_spouses: 0,
            parents_children: 1,
            embark_port: EmbarkPort::Cherbourg,
        }
    }

    #[test]
    fn test_fare_must_be_positive() {
        assert!(passenger(25.0, 15.75).validate().is_ok());
        let err = passenger(25.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, PredictError::Validation { ref field, .. } if field == "fare"));
        assert!(passenger(25.0, -3.0).validate().is_err());
    }

    #[test]
    fn test_age_upper_bound() {
        assert!(passenger(100.0, 10.0).validate().is_ok());
        assert!(passenger(0.0, 10.0).validate().is_ok());
        let err = passenger(150.0, 10.0).validate().unwrap_err();
        assert!(matches!(err, PredictError::Validation { ref field, .. } if field == "age"));
    }

    #[test]
    fn test_fare_checked_before_age() {
        let err = passenger(150.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, PredictError::Validation { ref field, .. } if field == "fare"));
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("artifacts.dir", "./models").is_ok());
        assert!(validate_path("artifacts.dir", "").is_err());
        assert!(validate_path("artifacts.dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("model_file", "model.json", &["json"]).is_ok());
        assert!(validate_file_extension("model_file", "model.pkl", &["json"]).is_err());
        assert!(validate_file_extension("model_file", "model", &["json"]).is_err());
    }

    #[test]
    fn test_parse_measure_bounds() {
        assert_eq!(parse_measure("age", " 42.5 ", None).unwrap(), 42.5);
        assert_eq!(parse_measure("age", "150", None).unwrap(), 150.0);
        assert!(parse_measure("age", "-5", None).is_err());
        assert!(parse_measure("age", "NaN", None).is_err());
        assert!(parse_measure("age", "abc", None).is_err());
        assert!(parse_measure("fare", "600", Some(MAX_FARE)).is_ok());
        assert!(parse_measure("fare", "600.5", Some(MAX_FARE)).is_err());
        assert!(parse_measure("fare", "inf", Some(MAX_FARE)).is_err());
    }

    #[test]
    fn test_parse_relatives() {
        assert_eq!(parse_relatives("siblings_spouses", "3").unwrap(), 3);
        assert!(parse_relatives("siblings_spouses", "11").is_err());
        assert!(parse_relatives("siblings_spouses", "300").is_err());
        let err = parse_relatives("parents_children", "-1").unwrap_err();
        assert!(matches!(err, PredictError::Validation { ref field, .. } if field == "parents_children"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("siblings_spouses", 3u8, 0, 10).is_ok());
        assert!(validate_range("siblings_spouses", 11u8, 0, 10).is_err());
    }
}
