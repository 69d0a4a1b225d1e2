//! User entity model and DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sponnect_core::directory::AccountFlags;
use sponnect_core::error::CoreError;
use sponnect_core::roles::Role;
use sponnect_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub is_flagged: bool,
    pub sponsor_approved: bool,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub influencer_name: Option<String>,
    pub category: Option<String>,
    pub niche: Option<String>,
    pub reach: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_str_db(&self.role)
    }

    /// The flags moderation and login decisions depend on.
    pub fn flags(&self) -> Result<AccountFlags, CoreError> {
        Ok(AccountFlags {
            role: self.role()?,
            is_active: self.is_active,
            sponsor_approved: self.sponsor_approved,
        })
    }
}

/// Safe user representation for API responses (no password hash).
///
/// Role-specific fields are only present for the matching role.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub is_flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reach: Option<i64>,
    pub created_at: Timestamp,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        let role = user.role().ok();
        let sponsor = role == Some(Role::Sponsor);
        let influencer = role == Some(Role::Influencer);
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_active: user.is_active,
            is_flagged: user.is_flagged,
            sponsor_approved: sponsor.then_some(user.sponsor_approved),
            company_name: user.company_name.clone().filter(|_| sponsor),
            industry: user.industry.clone().filter(|_| sponsor),
            influencer_name: user.influencer_name.clone().filter(|_| influencer),
            category: user.category.clone().filter(|_| influencer),
            niche: user.niche.clone().filter(|_| influencer),
            reach: user.reach.filter(|_| influencer),
            created_at: user.created_at,
        }
    }
}

/// The public card of an influencer, visible to any authenticated account.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InfluencerCard {
    pub id: DbId,
    pub username: String,
    pub influencer_name: Option<String>,
    pub category: Option<String>,
    pub niche: Option<String>,
    pub reach: Option<i64>,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub sponsor_approved: bool,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub influencer_name: Option<String>,
    pub category: Option<String>,
    pub niche: Option<String>,
    pub reach: Option<i64>,
}

/// DTO for a user editing their own profile. All fields are optional;
/// fields that do not belong to the user's role are ignored by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub influencer_name: Option<String>,
    pub category: Option<String>,
    pub niche: Option<String>,
    pub reach: Option<i64>,
}

/// Filters for the admin user listing. Admin accounts are never listed.
#[derive(Debug, Default)]
pub struct UserListFilter {
    pub role: Option<Role>,
    pub flagged: Option<bool>,
    pub is_active: Option<bool>,
    /// Restrict to sponsors with this approval flag.
    pub sponsor_approved: Option<bool>,
    /// Case-insensitive substring over username, email and display names.
    pub search: Option<String>,
}

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub sponsors: i64,
    pub influencers: i64,
    pub pending_sponsors: i64,
    pub flagged_users: i64,
    pub total_campaigns: i64,
    pub public_campaigns: i64,
    pub flagged_campaigns: i64,
    pub total_ad_requests: i64,
    /// Ad request counts keyed by status.
    pub ad_requests_by_status: BTreeMap<String, i64>,
}
