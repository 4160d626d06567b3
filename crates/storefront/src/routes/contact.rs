//! Contact form route handler.
//!
//! Relays a contact-form submission to the operator inbox. Unlike order
//! notifications this endpoint's whole job is the email, so a missing
//! SMTP configuration is a hard 503 rather than a logged warning.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use fresca_core::{Email, ValidationError};

use crate::error::AppError;
use crate::services::email::ContactMessage;
use crate::state::AppState;

/// Contact form submission. Fields default to empty so validation can
/// name the missing field instead of the deserializer rejecting the body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        Email::parse(self.email.trim()).map_err(|e| ValidationError::InvalidField {
            field: "email",
            reason: e.to_string(),
        })?;
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField("subject"));
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingField("message"));
        }
        Ok(())
    }
}

/// Delivery confirmation.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Relay a contact form submission to the operator inbox.
#[instrument(skip(state, body))]
pub async fn send_contact_email(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    body.validate()?;

    let Some(email) = state.email() else {
        return Err(AppError::EmailNotConfigured);
    };

    let contact = ContactMessage {
        name: body.name.trim().to_owned(),
        email: body.email.trim().to_owned(),
        phone: body
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned),
        subject: body.subject.trim().to_owned(),
        message: body.message,
    };
    email.send_contact_message(&contact).await?;

    info!(subject = %contact.subject, "Contact form relayed");

    Ok(Json(ContactResponse {
        success: true,
        message: "Email sent successfully",
    }))
}
