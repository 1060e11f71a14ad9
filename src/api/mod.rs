//! MediReminder API
//!
//! Client side of the MediReminder REST API.
//!
//! ## Endpoints
//!
//! - `POST /auth/login`, `POST /auth/signup`, `GET /auth/me`
//! - `GET/POST /medicines`, `PUT/DELETE /medicines/{id}`
//! - `GET/POST /caregivers`, `PUT/DELETE /caregivers/{id}`
//! - `GET/POST /alarms`, `PUT/DELETE /alarms/{id}`
//!
//! Failures carry the message the backend put in its `detail` field.

mod client;
pub mod dto;
mod error;

pub use client::ApiClient;
pub use dto::*;
pub use error::{extract_error_message, ApiError, ApiResult};
