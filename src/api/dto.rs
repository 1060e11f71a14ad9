//! Data Transfer Objects
//!
//! Request and response types for the MediReminder API.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::de::value::StrDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a backend record. The backend does not fix a type, so both
/// integer and string keys are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(id) => RecordId::Int(id),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

// ============================================
// AUTH DTOs
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub identifier: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
}

/// Profile fields the backend stores alongside the account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    /// Join month, formatted by the backend as "Mon YYYY"
    #[serde(default)]
    pub joined: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    /// Name shown in greetings and the profile card
    pub fn display_name(&self) -> &str {
        fn non_empty(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|v| !v.trim().is_empty())
        }

        non_empty(&self.user_metadata.full_name)
            .or_else(|| non_empty(&self.user_metadata.username))
            .or_else(|| non_empty(&self.email))
            .or_else(|| non_empty(&self.phone))
            .unwrap_or("User")
    }

    pub fn joined(&self) -> Option<&str> {
        self.user_metadata.joined.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

// ============================================
// MEDICATION DTOs
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    /// "HH:MM", 24-hour
    pub time: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub active: bool,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MedicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

// ============================================
// CAREGIVER DTOs
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCaregiver {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaregiverUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

// ============================================
// ALARM DTOs
// ============================================

/// Acknowledgment status of an alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    Upcoming,
    Taken,
    Snoozed,
    Missed,
    #[serde(other)]
    Unknown,
}

impl AlarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmStatus::Upcoming => "upcoming",
            AlarmStatus::Taken => "taken",
            AlarmStatus::Snoozed => "snoozed",
            AlarmStatus::Missed => "missed",
            AlarmStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub medication_name: String,
    #[serde(default)]
    pub dose: Option<String>,
    /// "HH:MM", 24-hour
    pub scheduled_time: String,
    #[serde(default, deserialize_with = "blank_status_as_none")]
    pub status: Option<AlarmStatus>,
}

/// An empty status string means the alarm was never acknowledged
fn blank_status_as_none<'de, D>(deserializer: D) -> Result<Option<AlarmStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: StrDeserializer<'_, D::Error> = value.into_deserializer();
            AlarmStatus::deserialize(value).map(Some)
        }
    }
}

impl Alarm {
    /// Whether the alarm still waits for the user (status unset or upcoming)
    pub fn is_pending(&self) -> bool {
        matches!(self.status, None | Some(AlarmStatus::Upcoming))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlarm {
    pub medication_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    pub scheduled_time: String,
    pub status: AlarmStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlarmUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AlarmStatus>,
}

impl AlarmUpdate {
    pub fn status(status: AlarmStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl MedicationUpdate {
    /// True when no field is set; the backend rejects empty updates
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dosage.is_none()
            && self.frequency.is_none()
            && self.time.is_none()
            && self.instructions.is_none()
            && self.active.is_none()
            && self.start_date.is_none()
    }
}

impl CaregiverUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.relation.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.is_primary.is_none()
    }
}

impl AlarmUpdate {
    pub fn is_empty(&self) -> bool {
        self.medication_name.is_none()
            && self.dose.is_none()
            && self.scheduled_time.is_none()
            && self.status.is_none()
    }
}

fn default_true() -> bool {
    true
}
