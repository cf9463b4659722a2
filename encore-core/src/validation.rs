use crate::postcode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    Step1,
    Step2,
    Step3,
    Step4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Step1,
        WizardStep::Step2,
        WizardStep::Step3,
        WizardStep::Step4,
    ];

    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Step1 => Some(WizardStep::Step2),
            WizardStep::Step2 => Some(WizardStep::Step3),
            WizardStep::Step3 => Some(WizardStep::Step4),
            WizardStep::Step4 => None,
        }
    }

    pub fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Step1 => None,
            WizardStep::Step2 => Some(WizardStep::Step1),
            WizardStep::Step3 => Some(WizardStep::Step2),
            WizardStep::Step4 => Some(WizardStep::Step3),
        }
    }

    /// Fields that must be populated before this step can be left.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            WizardStep::Step1 => &["event_date", "start_time", "end_time", "event_type"],
            WizardStep::Step2 => &["resource_id"],
            WizardStep::Step3 => &["client_name", "client_email", "venue_postcode"],
            // Step4 is a read-only summary.
            WizardStep::Step4 => &[],
        }
    }
}

/// Accumulated event request, built up across wizard steps. Serializable so
/// it can round-trip between client and server without relying on ambient
/// page state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    fields: BTreeMap<String, String>,
}

impl BookingRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Explicit field entry. Re-entering a field overwrites its value.
    pub fn set(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    /// Merge another field set in. Existing values win: later steps never
    /// clobber earlier answers except through an explicit `set`.
    pub fn merge(&mut self, incoming: &BookingRequest) {
        for (k, v) in &incoming.fields {
            self.fields.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    pub fn is_populated(&self, field: &str) -> bool {
        self.get(field).map(|v| !v.trim().is_empty()).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Pure per-step validation. One error per empty required field; domain
/// checks run only on populated fields. The same rule set runs on the
/// client wizard and again server-side at submission, where the server
/// result wins.
pub fn validate_step(step: WizardStep, request: &BookingRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for field in step.required_fields() {
        if !request.is_populated(field) {
            errors.push(FieldError::new(field, "This field is required"));
        }
    }

    if request.is_populated("event_date")
        && step == WizardStep::Step1
        && chrono::NaiveDate::parse_from_str(request.get("event_date").unwrap_or_default(), "%Y-%m-%d")
            .is_err()
    {
        errors.push(FieldError::new("event_date", "Expected a YYYY-MM-DD date"));
    }

    if step == WizardStep::Step1 {
        for field in ["start_time", "end_time"] {
            if request.is_populated(field)
                && chrono::NaiveTime::parse_from_str(request.get(field).unwrap_or_default(), "%H:%M").is_err()
            {
                errors.push(FieldError::new(field, "Expected a HH:MM time"));
            }
        }
    }

    if step == WizardStep::Step2
        && request.is_populated("resource_id")
        && request.get("resource_id").unwrap_or_default().parse::<i64>().is_err()
    {
        errors.push(FieldError::new("resource_id", "Unknown resource"));
    }

    if step == WizardStep::Step3 {
        if request.is_populated("venue_postcode")
            && !postcode::is_valid(request.get("venue_postcode").unwrap_or_default())
        {
            errors.push(FieldError::new(
                "venue_postcode",
                "Not a valid UK postcode",
            ));
        }
        if request.is_populated("client_email") {
            let email = request.get("client_email").unwrap_or_default();
            if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
                errors.push(FieldError::new("client_email", "Not a valid email address"));
            }
        }
    }

    errors
}

/// Full-request validation used server-side before submission.
pub fn validate_all(request: &BookingRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for step in WizardStep::ALL {
        errors.extend(validate_step(step, request));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_request() -> BookingRequest {
        let mut req = BookingRequest::new();
        req.set("event_date", "2025-06-01");
        req.set("start_time", "18:00");
        req.set("end_time", "23:30");
        req.set("event_type", "wedding");
        req.set("resource_id", "5");
        req.set("client_name", "Jo Client");
        req.set("client_email", "jo@example.com");
        req.set("venue_postcode", "AL1 1AA");
        req
    }

    #[test]
    fn test_missing_event_date_reports_field_error() {
        let mut req = filled_request();
        req.set("event_date", "");
        let errors = validate_step(WizardStep::Step1, &req);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "event_date");
    }

    #[test]
    fn test_one_error_per_empty_required_field() {
        let errors = validate_step(WizardStep::Step1, &BookingRequest::new());
        assert_eq!(errors.len(), WizardStep::Step1.required_fields().len());
    }

    #[test]
    fn test_domain_checks_skip_empty_fields() {
        // Empty postcode reports only the required-field error, not the
        // pattern error.
        let mut req = filled_request();
        req.set("venue_postcode", "");
        let errors = validate_step(WizardStep::Step3, &req);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "This field is required");
    }

    #[test]
    fn test_postcode_pattern_on_populated_field() {
        let mut req = filled_request();
        req.set("venue_postcode", "XYZ");
        let errors = validate_step(WizardStep::Step3, &req);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "venue_postcode");
    }

    #[test]
    fn test_lowercase_postcode_passes() {
        let mut req = filled_request();
        req.set("venue_postcode", "al1 1aa");
        assert!(validate_step(WizardStep::Step3, &req).is_empty());
    }

    #[test]
    fn test_full_request_passes_all_steps() {
        assert!(validate_all(&filled_request()).is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_values() {
        let mut base = BookingRequest::new();
        base.set("event_date", "2025-06-01");
        let mut incoming = BookingRequest::new();
        incoming.set("event_date", "2030-01-01");
        incoming.set("event_type", "party");
        base.merge(&incoming);
        assert_eq!(base.get("event_date"), Some("2025-06-01"));
        assert_eq!(base.get("event_type"), Some("party"));
    }
}
