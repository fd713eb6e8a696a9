//! Appointment-booking wizard types.
//!
//! The wizard collects name, contact, and time across sequential turns.
//! Each transition is driven purely by whatever the user types next; no
//! format validation beyond non-empty input.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Stage of the booking wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStage {
    Idle,
    Name,
    Contact,
    Time,
    Done,
}

impl Default for BookingStage {
    fn default() -> Self {
        BookingStage::Idle
    }
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStage::Idle => write!(f, "idle"),
            BookingStage::Name => write!(f, "name"),
            BookingStage::Contact => write!(f, "contact"),
            BookingStage::Time => write!(f, "time"),
            BookingStage::Done => write!(f, "done"),
        }
    }
}

impl FromStr for BookingStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(BookingStage::Idle),
            "name" => Ok(BookingStage::Name),
            "contact" => Ok(BookingStage::Contact),
            "time" => Ok(BookingStage::Time),
            "done" => Ok(BookingStage::Done),
            other => Err(format!("invalid booking stage: '{other}'")),
        }
    }
}

/// Fields collected so far by the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub contact: String,
    pub time: String,
}

/// The payload posted to the external form-intake endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub contact: String,
    pub time: String,
    pub message: String,
}

impl BookingRequest {
    /// Assemble the outbound request from a completed form.
    pub fn from_form(form: &BookingForm) -> Self {
        Self {
            name: form.name.clone(),
            contact: form.contact.clone(),
            time: form.time.clone(),
            message: format!(
                "Appointment request from {} at {}. Contact: {}",
                form.name, form.time, form.contact
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_stage_roundtrip() {
        for stage in [
            BookingStage::Idle,
            BookingStage::Name,
            BookingStage::Contact,
            BookingStage::Time,
            BookingStage::Done,
        ] {
            let s = stage.to_string();
            let parsed: BookingStage = s.parse().unwrap();
            assert_eq!(stage, parsed);
        }
    }

    #[test]
    fn test_booking_request_message_line() {
        let form = BookingForm {
            name: "Sam".to_string(),
            contact: "sam@example.com".to_string(),
            time: "Tuesday 3pm".to_string(),
        };
        let req = BookingRequest::from_form(&form);
        assert_eq!(
            req.message,
            "Appointment request from Sam at Tuesday 3pm. Contact: sam@example.com"
        );
    }
}
