//! Input Forms
//!
//! Structured user input for every create operation. Each form is validated
//! into the request DTO before any network call is made, so input gathering
//! (CLI flags, prompts) stays separate from the API client.

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::api::{AlarmStatus, LoginRequest, NewAlarm, NewCaregiver, NewMedication, SignupRequest};

/// Validation failures
#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid time {0:?}, expected HH:MM (24-hour)")]
    InvalidTime(String),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Validation pattern error: {0}")]
    Pattern(String),
}

pub type FormResult<T> = Result<T, FormError>;

fn required(value: &str, field: &'static str) -> FormResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Blank optional inputs are sent as absent
fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn matches(pattern: &str, value: &str) -> FormResult<bool> {
    let re = Regex::new(pattern).map_err(|e| FormError::Pattern(e.to_string()))?;
    Ok(re.is_match(value))
}

/// Validate a 24-hour "HH:MM" time
pub fn validate_time(value: &str) -> FormResult<String> {
    let value = value.trim();
    if matches(r"^([01]\d|2[0-3]):[0-5]\d$", value)? {
        Ok(value.to_string())
    } else {
        Err(FormError::InvalidTime(value.to_string()))
    }
}

/// Parse a "YYYY-MM-DD" date
pub fn parse_date(value: &str) -> FormResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}

fn validate_email(value: String) -> FormResult<String> {
    if matches(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", &value)? {
        Ok(value)
    } else {
        Err(FormError::InvalidEmail(value))
    }
}

fn validate_phone(value: String) -> FormResult<String> {
    if matches(r"^\+?[0-9][0-9 ()\-]{5,}$", &value)? {
        Ok(value)
    } else {
        Err(FormError::InvalidPhone(value))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email address or phone number
    pub identifier: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FormResult<LoginRequest> {
        let identifier = required(&self.identifier, "Email or phone")?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }

        Ok(LoginRequest {
            identifier,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    /// Email address or phone number
    pub identifier: String,
    pub password: String,
    pub full_name: Option<String>,
    pub username: String,
    /// Date of birth, "YYYY-MM-DD"
    pub dob: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> FormResult<SignupRequest> {
        let identifier = required(&self.identifier, "Email or phone")?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }
        let username = required(&self.username, "Username")?;
        let dob = optional(&self.dob).map(|d| parse_date(&d)).transpose()?;

        Ok(SignupRequest {
            identifier,
            password: self.password.clone(),
            full_name: optional(&self.full_name),
            username,
            dob,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MedicationForm {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    /// "HH:MM", 24-hour
    pub time: String,
    pub instructions: Option<String>,
    pub start_date: Option<NaiveDate>,
}

impl MedicationForm {
    /// Validate into a new active medication starting on `start_date` or `today`
    pub fn validate(&self, today: NaiveDate) -> FormResult<NewMedication> {
        Ok(NewMedication {
            name: required(&self.name, "Medication name")?,
            dosage: required(&self.dosage, "Dosage")?,
            frequency: required(&self.frequency, "Frequency")?,
            time: validate_time(&self.time)?,
            instructions: optional(&self.instructions),
            active: true,
            start_date: self.start_date.unwrap_or(today),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaregiverForm {
    pub name: String,
    pub relation: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_primary: bool,
}

impl CaregiverForm {
    pub fn validate(&self) -> FormResult<NewCaregiver> {
        Ok(NewCaregiver {
            name: required(&self.name, "Caregiver name")?,
            relation: optional(&self.relation),
            phone: optional(&self.phone).map(validate_phone).transpose()?,
            email: optional(&self.email).map(validate_email).transpose()?,
            is_primary: self.is_primary,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlarmForm {
    pub medication_name: String,
    pub dose: Option<String>,
    pub scheduled_time: String,
}

impl AlarmForm {
    pub fn validate(&self) -> FormResult<NewAlarm> {
        Ok(NewAlarm {
            medication_name: required(&self.medication_name, "Medication name")?,
            dose: optional(&self.dose),
            scheduled_time: validate_time(&self.scheduled_time)?,
            status: AlarmStatus::Upcoming,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_validate_time() {
        assert_eq!(validate_time("08:30").unwrap(), "08:30");
        assert_eq!(validate_time(" 23:59 ").unwrap(), "23:59");
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("8:30").is_err());
        assert!(validate_time("12:60").is_err());
        assert!(validate_time("noon").is_err());
    }

    #[test]
    fn test_medication_form() {
        let form = MedicationForm {
            name: " Metformin ".to_string(),
            dosage: "500mg".to_string(),
            frequency: "Twice daily".to_string(),
            time: "08:00".to_string(),
            instructions: Some("   ".to_string()),
            start_date: None,
        };

        let med = form.validate(today()).unwrap();
        assert_eq!(med.name, "Metformin");
        assert_eq!(med.instructions, None);
        assert!(med.active);
        assert_eq!(med.start_date, today());
    }

    #[test]
    fn test_medication_form_rejects_missing_name() {
        let form = MedicationForm {
            dosage: "5mg".to_string(),
            frequency: "Daily".to_string(),
            time: "09:00".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(today()).unwrap_err(),
            FormError::Required("Medication name")
        );
    }

    #[test]
    fn test_caregiver_form() {
        let form = CaregiverForm {
            name: "Grace".to_string(),
            relation: Some("Daughter".to_string()),
            phone: Some("+1 (555) 010-2030".to_string()),
            email: Some("grace@example.com".to_string()),
            is_primary: true,
        };
        let caregiver = form.validate().unwrap();
        assert_eq!(caregiver.relation.as_deref(), Some("Daughter"));
        assert!(caregiver.is_primary);

        let bad_email = CaregiverForm {
            name: "Grace".to_string(),
            email: Some("grace-at-example".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_email.validate().unwrap_err(),
            FormError::InvalidEmail(_)
        ));

        let bad_phone = CaregiverForm {
            name: "Grace".to_string(),
            phone: Some("call me".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_phone.validate().unwrap_err(),
            FormError::InvalidPhone(_)
        ));
    }

    #[test]
    fn test_signup_form() {
        let form = SignupForm {
            identifier: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            username: "ada".to_string(),
            dob: Some("1815-12-10".to_string()),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.dob, NaiveDate::from_ymd_opt(1815, 12, 10));

        let missing_username = SignupForm {
            identifier: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        assert_eq!(
            missing_username.validate().unwrap_err(),
            FormError::Required("Username")
        );
    }

    #[test]
    fn test_login_form() {
        let form = LoginForm {
            identifier: "  ".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(form.validate().unwrap_err(), FormError::Required("Email or phone"));
    }

    #[test]
    fn test_alarm_form() {
        let alarm = AlarmForm {
            medication_name: "Aspirin".to_string(),
            dose: None,
            scheduled_time: "21:15".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(alarm.status, AlarmStatus::Upcoming);
        assert_eq!(alarm.scheduled_time, "21:15");
    }
}
