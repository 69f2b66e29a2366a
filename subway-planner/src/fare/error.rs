//! Fare policy errors.

use thiserror::Error;

/// A policy value that cannot describe a sensible fare.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fare policy: {reason}")]
pub struct InvalidFarePolicy {
    reason: &'static str,
}

impl InvalidFarePolicy {
    pub(crate) fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// Errors from loading a fare policy.
#[derive(Debug, Error)]
pub enum FarePolicyError {
    #[error("failed to parse fare policy: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] InvalidFarePolicy),
}
