//! Account roles.
//!
//! The string forms must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users_table.sql` and the `role` claim issued in
//! access tokens.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::negotiation::Party;

pub const ROLE_SPONSOR: &str = "sponsor";
pub const ROLE_INFLUENCER: &str = "influencer";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_SPONSOR, ROLE_INFLUENCER, ROLE_ADMIN];

/// The role an account holds for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Sponsor,
    Influencer,
    Admin,
}

impl Role {
    /// Parse a role string from the database or a token claim.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_SPONSOR => Ok(Self::Sponsor),
            ROLE_INFLUENCER => Ok(Self::Influencer),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sponsor => ROLE_SPONSOR,
            Self::Influencer => ROLE_INFLUENCER,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// The negotiating party this role plays, if any. Admins never negotiate.
    pub fn party(&self) -> Option<Party> {
        match self {
            Self::Sponsor => Some(Party::Sponsor),
            Self::Influencer => Some(Party::Influencer),
            Self::Admin => None,
        }
    }

    /// Roles a visitor may pick when self-registering.
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, Self::Sponsor | Self::Influencer)
    }
}
