//! Campaign visibility and field validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub const VISIBILITY_PUBLIC: &str = "public";
pub const VISIBILITY_PRIVATE: &str = "private";

pub const VALID_VISIBILITIES: &[&str] = &[VISIBILITY_PUBLIC, VISIBILITY_PRIVATE];

/// Maximum length of a campaign name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Who may discover a campaign and apply to it.
///
/// Only public campaigns accept influencer applications or show up in search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            VISIBILITY_PUBLIC => Ok(Self::Public),
            VISIBILITY_PRIVATE => Ok(Self::Private),
            _ => Err(CoreError::Validation(format!(
                "Invalid visibility '{s}'. Must be one of: {}",
                VALID_VISIBILITIES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => VISIBILITY_PUBLIC,
            Self::Private => VISIBILITY_PRIVATE,
        }
    }
}

/// Budgets are non-negative finite amounts.
pub fn validate_budget(budget: f64) -> Result<(), CoreError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(CoreError::Validation(format!(
            "Invalid budget {budget}. Must be a non-negative number"
        )));
    }
    Ok(())
}

/// A campaign may not end before it starts.
pub fn validate_dates(start: Timestamp, end: Option<Timestamp>) -> Result<(), CoreError> {
    if let Some(end) = end {
        if end < start {
            return Err(CoreError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Campaign name must not be empty".into()));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Campaign name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
