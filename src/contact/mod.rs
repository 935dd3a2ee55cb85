//! Lead capture: contact form validation and submission payloads

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status every new submission is filed under
pub const NEW_STATUS: &str = "new";

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),

    #[error("Submission rejected (status {status})")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),
}

impl ContactError {
    /// Message shown next to the form
    pub fn user_message(&self) -> String {
        match self {
            ContactError::Validation(msg) => msg.clone(),
            ContactError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ContactError::Rejected { .. } | ContactError::Network(_) => {
                "We couldn't send your request right now. Please try again or call us.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ContactError {
    fn from(err: reqwest::Error) -> Self {
        ContactError::Network(err.to_string())
    }
}

/// Services offered in the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    #[default]
    #[serde(rename = "Waste Collection")]
    WasteCollection,
    #[serde(rename = "Site Clearance")]
    SiteClearance,
    #[serde(rename = "On-Call Pickup")]
    OnCallPickup,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::WasteCollection,
        ServiceType::SiteClearance,
        ServiceType::OnCallPickup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ServiceType::WasteCollection => "Waste Collection",
            ServiceType::SiteClearance => "Site Clearance",
            ServiceType::OnCallPickup => "On-Call Pickup",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label.trim())
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw form fields as posted by the browser or given on the command line
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub service_type: String,
    pub message: String,
}

impl ContactForm {
    /// Check required fields and build the API payload
    pub fn validate(&self) -> Result<ContactSubmission, ContactError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("message", &self.message),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ContactError::Validation(format!(
                "Please fill in your {}.",
                field
            )));
        }

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(user, domain)| !user.is_empty() && !domain.is_empty())
            .unwrap_or(false);
        if !valid_email {
            return Err(ContactError::Validation(
                "Please enter a valid email address.".to_string(),
            ));
        }

        let service_type = if self.service_type.trim().is_empty() {
            ServiceType::default()
        } else {
            ServiceType::from_label(&self.service_type).ok_or_else(|| {
                ContactError::Validation(format!("Unknown service type: {}", self.service_type))
            })?
        };

        let company = Some(self.company.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(ContactSubmission {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: email.to_string(),
            company,
            service_type,
            message: self.message.trim().to_string(),
            status: NEW_STATUS.to_string(),
        })
    }
}

/// Body of `POST /api/contact-submissions`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub service_type: ServiceType,
    pub message: String,
    pub status: String,
}
