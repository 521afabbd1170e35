// Request/response types for the JSON endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database_ops::contact::NewContactMessage;

/// Envelope shared by every JSON endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(Meta::now()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            meta: Some(Meta::now()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub version: String,
}

impl Meta {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub uptime_seconds: u64,
}

/// Body of `POST /api/contact`. Missing fields deserialize as empty and are
/// caught by [`ContactRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

const MAX_FIELD_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("{0} is too long")]
    TooLong(&'static str),
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

impl ContactRequest {
    /// Trim every field and check it; returns the row to store.
    pub fn validate(&self) -> Result<NewContactMessage, ContactError> {
        let msg = NewContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        };
        for (field, value) in [
            ("Name", &msg.name),
            ("Email", &msg.email),
            ("Subject", &msg.subject),
            ("Message", &msg.message),
        ] {
            if value.is_empty() {
                return Err(ContactError::Missing(field));
            }
        }
        if !looks_like_email(&msg.email) {
            return Err(ContactError::InvalidEmail);
        }
        for (field, value) in [("Name", &msg.name), ("Email", &msg.email), ("Subject", &msg.subject)] {
            if value.chars().count() > MAX_FIELD_LEN {
                return Err(ContactError::TooLong(field));
            }
        }
        if msg.message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ContactError::TooLong("Message"));
        }
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> ContactRequest {
        ContactRequest {
            name: "  Ann ".into(),
            email: "ann@example.com".into(),
            subject: "Photo Submission".into(),
            message: "Here is Donard at dawn.".into(),
        }
    }

    #[test]
    fn valid_request_is_trimmed() {
        let msg = req().validate().unwrap();
        assert_eq!(msg.name, "Ann");
        assert_eq!(msg.subject, "Photo Submission");
    }

    #[test]
    fn each_field_is_required() {
        let mut r = req();
        r.subject = "   ".into();
        assert_eq!(r.validate(), Err(ContactError::Missing("Subject")));
        assert_eq!(
            ContactRequest::default().validate().unwrap_err().to_string(),
            "Name is required"
        );
    }

    #[test]
    fn rejects_bad_emails() {
        for bad in ["ann", "ann@", "@example.com", "ann@example", "ann @example.com", "ann@.com"] {
            let mut r = req();
            r.email = bad.into();
            assert_eq!(r.validate(), Err(ContactError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn rejects_oversized_message() {
        let mut r = req();
        r.message = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert_eq!(r.validate(), Err(ContactError::TooLong("Message")));
    }

    #[test]
    fn error_envelope_omits_data() {
        let v = serde_json::to_value(ApiResponse::<()>::error("Name is required")).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "Name is required");
        assert!(v.get("data").is_none());
    }
}
