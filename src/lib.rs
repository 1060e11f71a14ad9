//! # MediReminder
//!
//! Client for the MediReminder medication-reminder service: authenticates
//! against the REST API, renders medications, caregivers and a calendar as
//! HTML, and rings an alarm when a dose is due.
//!
//! ## Modules
//!
//! - [`api`]: typed REST client with bearer auth and uniform error extraction
//! - [`session`]: persisted token, user record and current alarm
//! - [`forms`]: validated input for every create operation
//! - [`render`]: record to HTML fragment renderers
//! - [`alarm`]: alarm poller, acknowledgement state machine and audio alerter
//! - [`calendar`]: month grid and demo daily schedule
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medireminder::{ApiClient, Config, LoginForm, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let session = Session::in_memory();
//!
//!     let mut client = ApiClient::new(&config.api)?;
//!     let form = LoginForm {
//!         identifier: "ana@example.com".into(),
//!         password: "secret".into(),
//!     };
//!     let auth = client.login(&form.validate()?).await?;
//!     session.establish(&auth)?;
//!     client.set_token(Some(auth.access_token));
//!
//!     for med in client.list_medicines().await? {
//!         println!("{} {} at {}", med.name, med.dosage, med.time);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod alarm;
pub mod api;
pub mod calendar;
pub mod config;
pub mod forms;
pub mod render;
pub mod session;

pub use alarm::{
    AckOutcome, AlarmApi, AlarmController, AlarmPoller, AlarmState, AudioAlerter, Clock,
    Navigator, PollOutcome, PollerHandle, SystemClock, View,
};

pub use api::{
    Alarm, AlarmStatus, ApiClient, ApiError, ApiResult, AuthResponse, AuthUser, Caregiver,
    Medication, RecordId,
};

pub use calendar::{CalendarState, MonthGrid};

pub use config::{Config, ConfigError};

pub use forms::{AlarmForm, CaregiverForm, FormError, LoginForm, MedicationForm, SignupForm};

pub use session::{FileStore, Session, SessionError};
