use encore_core::validation::{validate_step, BookingRequest, FieldError, WizardStep};
use serde::{Deserialize, Serialize};

/// Result of asking the wizard to advance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Validation passed; now on the given step. Arriving at Step2 is the
    /// caller's cue to probe availability for each visible resource candidate;
    /// arriving at Step4 needs no network call at all.
    Advanced(WizardStep),
    /// Validation failed; still on the same step, with inline field errors.
    Rejected(Vec<FieldError>),
    /// Step4 passed validation; the request is ready for submission.
    ReadyToSubmit,
}

/// Single-threaded cooperative four-step controller. State is additive:
/// revisiting a step keeps everything previously entered, and only explicit
/// field re-entry overwrites a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wizard {
    step: WizardStep,
    request: BookingRequest,
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Step1,
            request: BookingRequest::new(),
        }
    }

    /// Resume from a previously serialized request, starting back at Step1.
    pub fn resume(request: BookingRequest) -> Self {
        Self {
            step: WizardStep::Step1,
            request,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn request(&self) -> &BookingRequest {
        &self.request
    }

    /// Explicit field entry on the current step.
    pub fn set_field(&mut self, field: &str, value: &str) {
        self.request.set(field, value);
    }

    pub fn errors_for_current_step(&self) -> Vec<FieldError> {
        validate_step(self.step, &self.request)
    }

    /// Validate the current step; stay put and surface errors on failure,
    /// otherwise move forward. Leaving Step4 signals readiness to submit.
    pub fn next(&mut self) -> WizardOutcome {
        let errors = validate_step(self.step, &self.request);
        if !errors.is_empty() {
            return WizardOutcome::Rejected(errors);
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                WizardOutcome::Advanced(step)
            }
            None => WizardOutcome::ReadyToSubmit,
        }
    }

    /// Backward navigation is unguarded: no re-validation, nothing is lost.
    pub fn prev(&mut self) -> WizardStep {
        if let Some(step) = self.step.prev() {
            self.step = step;
        }
        self.step
    }

    /// Read-only Step4 summary of everything accumulated so far.
    pub fn summary(&self) -> &BookingRequest {
        &self.request
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_step1(wizard: &mut Wizard) {
        wizard.set_field("event_date", "2025-06-01");
        wizard.set_field("start_time", "18:00");
        wizard.set_field("end_time", "23:30");
        wizard.set_field("event_type", "wedding");
    }

    fn fill_step3(wizard: &mut Wizard) {
        wizard.set_field("client_name", "Jo Client");
        wizard.set_field("client_email", "jo@example.com");
        wizard.set_field("venue_postcode", "AL1 1AA");
    }

    #[test]
    fn test_empty_event_date_blocks_step1() {
        let mut wizard = Wizard::new();
        fill_step1(&mut wizard);
        wizard.set_field("event_date", "");

        match wizard.next() {
            WizardOutcome::Rejected(errors) => {
                assert!(errors.iter().any(|e| e.field == "event_date"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(wizard.step(), WizardStep::Step1);
    }

    #[test]
    fn test_full_walk_reaches_submission() {
        let mut wizard = Wizard::new();
        fill_step1(&mut wizard);
        assert_eq!(wizard.next(), WizardOutcome::Advanced(WizardStep::Step2));

        wizard.set_field("resource_id", "5");
        assert_eq!(wizard.next(), WizardOutcome::Advanced(WizardStep::Step3));

        fill_step3(&mut wizard);
        assert_eq!(wizard.next(), WizardOutcome::Advanced(WizardStep::Step4));
        assert_eq!(wizard.next(), WizardOutcome::ReadyToSubmit);
    }

    #[test]
    fn test_prev_is_unguarded_and_preserves_values() {
        let mut wizard = Wizard::new();
        fill_step1(&mut wizard);
        wizard.next();
        wizard.set_field("resource_id", "5");
        wizard.next();

        // Walk back past a step that would currently fail validation.
        assert_eq!(wizard.prev(), WizardStep::Step2);
        assert_eq!(wizard.prev(), WizardStep::Step1);
        assert_eq!(wizard.prev(), WizardStep::Step1);

        // Everything entered so far is still there.
        assert_eq!(wizard.request().get("resource_id"), Some("5"));
        assert_eq!(wizard.request().get("event_date"), Some("2025-06-01"));
    }

    #[test]
    fn test_re_entry_overwrites_explicitly() {
        let mut wizard = Wizard::new();
        fill_step1(&mut wizard);
        wizard.next();
        wizard.prev();
        wizard.set_field("event_date", "2025-07-12");
        assert_eq!(wizard.request().get("event_date"), Some("2025-07-12"));
    }

    #[test]
    fn test_resume_starts_over_with_saved_values() {
        let mut wizard = Wizard::new();
        fill_step1(&mut wizard);
        let saved = wizard.request().clone();

        let resumed = Wizard::resume(saved);
        assert_eq!(resumed.step(), WizardStep::Step1);
        assert_eq!(resumed.request().get("event_type"), Some("wedding"));
        assert!(resumed.errors_for_current_step().is_empty());
    }

    #[test]
    fn test_summary_reflects_accumulated_request() {
        let mut wizard = Wizard::new();
        fill_step1(&mut wizard);
        wizard.next();
        wizard.set_field("resource_id", "5");
        wizard.next();
        fill_step3(&mut wizard);
        wizard.next();

        assert_eq!(wizard.step(), WizardStep::Step4);
        let summary = wizard.summary();
        assert_eq!(summary.get("event_type"), Some("wedding"));
        assert_eq!(summary.get("venue_postcode"), Some("AL1 1AA"));
    }
}
