//! Party directory rules: registration input checks, sponsor approval, and
//! account moderation.
//!
//! These functions decide whether a moderation step is allowed given the
//! account's current flags. The repository layer performs the write.

use crate::error::CoreError;
use crate::roles::Role;

/// Minimum password length for self-registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted password, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Snapshot of the account flags moderation decisions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFlags {
    pub role: Role,
    pub is_active: bool,
    pub sponsor_approved: bool,
}

/// Status filter for the admin user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatusFilter {
    Active,
    Inactive,
    /// Active sponsors awaiting approval.
    PendingApproval,
    /// Active, approved sponsors.
    Approved,
}

impl AccountStatusFilter {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending_approval" => Ok(Self::PendingApproval),
            "approved" => Ok(Self::Approved),
            _ => Err(CoreError::Validation(format!(
                "Invalid status filter '{s}'. Must be one of: active, inactive, pending_approval, approved"
            ))),
        }
    }
}

/// Whether a freshly registered account starts approved.
///
/// Sponsors need an admin's approval before they can log in.
pub fn initial_approval(role: Role) -> bool {
    !matches!(role, Role::Sponsor)
}

/// Validate the role requested at self-registration.
pub fn validate_registration_role(role: Role) -> Result<(), CoreError> {
    if !role.is_self_registrable() {
        return Err(CoreError::Validation("Invalid role".into()));
    }
    Ok(())
}

/// Decide whether an account may log in.
pub fn ensure_can_login(flags: AccountFlags) -> Result<(), CoreError> {
    if !flags.is_active {
        return Err(CoreError::Forbidden("Account deactivated".into()));
    }
    if flags.role == Role::Sponsor && !flags.sponsor_approved {
        return Err(CoreError::Forbidden("Sponsor account pending approval".into()));
    }
    Ok(())
}

/// Approval is only meaningful for sponsors that are still unapproved.
pub fn ensure_can_approve_sponsor(flags: AccountFlags) -> Result<(), CoreError> {
    if flags.role != Role::Sponsor {
        return Err(CoreError::Validation("User is not a sponsor".into()));
    }
    if flags.sponsor_approved {
        return Err(CoreError::Validation("Sponsor already approved".into()));
    }
    Ok(())
}

/// Rejection deactivates a pending sponsor; the approval flag stays false.
pub fn ensure_can_reject_sponsor(flags: AccountFlags) -> Result<(), CoreError> {
    if flags.role != Role::Sponsor {
        return Err(CoreError::Validation("User is not a sponsor".into()));
    }
    if flags.sponsor_approved {
        return Err(CoreError::Validation("Can only reject pending sponsors".into()));
    }
    Ok(())
}

/// Admin accounts are outside moderation.
pub fn ensure_moderatable(flags: AccountFlags) -> Result<(), CoreError> {
    if flags.role == Role::Admin {
        return Err(CoreError::Forbidden("Admin accounts cannot be moderated".into()));
    }
    Ok(())
}

pub fn ensure_can_activate(flags: AccountFlags) -> Result<(), CoreError> {
    ensure_moderatable(flags)?;
    if flags.is_active {
        return Err(CoreError::Validation("User already active".into()));
    }
    if flags.role == Role::Sponsor && !flags.sponsor_approved {
        return Err(CoreError::Validation(
            "Cannot activate a sponsor whose registration is not approved".into(),
        ));
    }
    Ok(())
}

pub fn ensure_can_deactivate(flags: AccountFlags) -> Result<(), CoreError> {
    ensure_moderatable(flags)?;
    if !flags.is_active {
        return Err(CoreError::Validation("User already inactive".into()));
    }
    Ok(())
}

/// Length bounds for a new password. Blank passwords are refused whatever
/// their length.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }
    if password.trim().is_empty() {
        return Err(CoreError::Validation("Password must not be blank".into()));
    }
    Ok(())
}

/// Influencer reach is an audience size and cannot be negative.
pub fn validate_reach(reach: i64) -> Result<(), CoreError> {
    if reach < 0 {
        return Err(CoreError::Validation("reach must not be negative".into()));
    }
    Ok(())
}
