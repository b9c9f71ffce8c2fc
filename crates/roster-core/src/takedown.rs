//! Take-down / appeal form.
//!
//! Submission is a demo: the request is validated and logged, and the user
//! gets an acknowledgement. Nothing leaves the process.

use thiserror::Error;

/// Acknowledgement shown after a successful submission.
pub const ACKNOWLEDGEMENT: &str =
  "Submitted (demo): we will process your request as soon as possible.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TakedownError {
  #[error("please describe the reason for your request")]
  MissingReason,
}

/// Form state, pre-filled with the target's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TakedownForm {
  pub target_name: String,
  /// How to reach the requester. Optional.
  pub contact:     String,
  pub reason:      String,
}

impl TakedownForm {
  pub fn for_person(display_name: impl Into<String>) -> Self {
    Self { target_name: display_name.into(), ..Default::default() }
  }

  pub fn submit(&self) -> Result<&'static str, TakedownError> {
    if self.reason.trim().is_empty() {
      return Err(TakedownError::MissingReason);
    }
    tracing::info!(
      target_name = %self.target_name,
      has_contact = !self.contact.trim().is_empty(),
      "take-down request submitted"
    );
    Ok(ACKNOWLEDGEMENT)
  }
}
