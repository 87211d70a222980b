use serde::{Deserialize, Serialize};

use super::super::domain::LeadInfo;

const PHONE_MIN_DIGITS: usize = 6;
const PHONE_MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Email,
    Phone,
}

impl LeadField {
    pub const fn label(self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Phone => "phone",
        }
    }
}

/// Inline message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: LeadField,
    pub message: String,
}

/// Raised before any submission when the lead form is incomplete or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid lead details: {}", field_list(.fields))]
pub struct LeadValidationError {
    pub fields: Vec<FieldError>,
}

impl LeadValidationError {
    pub fn has(&self, field: LeadField) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }
}

fn field_list(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|error| error.field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Gate that normalizes lead details and rejects incomplete ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadGuard;

impl LeadGuard {
    pub fn new() -> Self {
        Self
    }

    /// Trim every field and check name, email, and optional phone.
    pub fn validate(&self, lead: LeadInfo) -> Result<LeadInfo, LeadValidationError> {
        let name = lead.name.trim().to_string();
        let email = lead.email.trim().to_string();
        let phone = lead
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        let mut fields = Vec::new();

        if name.is_empty() {
            fields.push(FieldError {
                field: LeadField::Name,
                message: "Ime je obavezno.".to_string(),
            });
        }

        if email.is_empty() {
            fields.push(FieldError {
                field: LeadField::Email,
                message: "Email je obavezan.".to_string(),
            });
        } else if !is_well_formed_email(&email) {
            fields.push(FieldError {
                field: LeadField::Email,
                message: "Unesite ispravnu email adresu.".to_string(),
            });
        }

        if let Some(phone) = &phone {
            if !is_plausible_phone(phone) {
                fields.push(FieldError {
                    field: LeadField::Phone,
                    message: "Unesite ispravan broj telefona.".to_string(),
                });
            }
        }

        if fields.is_empty() {
            Ok(LeadInfo { name, email, phone })
        } else {
            Err(LeadValidationError { fields })
        }
    }
}

pub(crate) fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub(crate) fn is_plausible_phone(phone: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '/' | '(' | ')');
    if !phone.chars().all(allowed) {
        return false;
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}
