//! Field checks applied before any write reaches the store.

use crate::error::AppError;
use common::requests::leads::LeadFields;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Optional `+`, then 10 to 13 digits once spaces and dashes are removed.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,13}$").expect("valid phone regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn normalize_phone(phone: &str) -> Option<String> {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    PHONE_RE.is_match(&compact).then_some(compact)
}

/// Checks the format of whichever fields are present and normalizes them.
pub fn check_formats(fields: &mut LeadFields) -> Result<(), AppError> {
    if let Some(email) = fields.email.as_deref().map(str::trim) {
        if !email.is_empty() && !is_valid_email(email) {
            return Err(AppError::Validation(format!("Invalid email address '{}'", email)));
        }
        fields.email = Some(email.to_string());
    }
    if let Some(phone) = fields.phone_number.as_deref() {
        let normalized = normalize_phone(phone)
            .ok_or_else(|| AppError::Validation(format!("Invalid phone number '{}'", phone.trim())))?;
        fields.phone_number = Some(normalized);
    }
    if let Some(name) = fields.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }
    }
    Ok(())
}

/// Creation additionally requires a name and a phone number.
pub fn check_new_lead(fields: &mut LeadFields) -> Result<(), AppError> {
    if fields.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("Name is required".into()));
    }
    if fields.phone_number.as_deref().is_none_or(|p| p.trim().is_empty()) {
        return Err(AppError::Validation("Phone number is required".into()));
    }
    check_formats(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers_are_compacted() {
        assert_eq!(normalize_phone("98765 43210").as_deref(), Some("9876543210"));
        assert_eq!(normalize_phone("+91-98765-43210").as_deref(), Some("+919876543210"));
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("98765abc10"), None);
    }

    #[test]
    fn emails_need_a_domain() {
        assert!(is_valid_email("a@school.in"));
        assert!(!is_valid_email("a@school"));
        assert!(!is_valid_email("a b@school.in"));
    }

    #[test]
    fn new_leads_need_name_and_phone() {
        let mut missing_phone = LeadFields {
            name: Some("Asha".into()),
            ..LeadFields::default()
        };
        assert!(check_new_lead(&mut missing_phone).is_err());

        let mut ok = LeadFields {
            name: Some("Asha".into()),
            phone_number: Some("98765 43210".into()),
            email: Some(" asha@mail.com ".into()),
            ..LeadFields::default()
        };
        check_new_lead(&mut ok).unwrap();
        assert_eq!(ok.phone_number.as_deref(), Some("9876543210"));
        assert_eq!(ok.email.as_deref(), Some("asha@mail.com"));
    }
}
