//! Campaign entity model and DTOs.

use serde::Serialize;
use sponnect_core::campaign::Visibility;
use sponnect_core::error::CoreError;
use sponnect_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Campaign {
    pub id: DbId,
    pub sponsor_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub budget: f64,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub visibility: String,
    pub is_flagged: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Campaign {
    pub fn visibility(&self) -> Result<Visibility, CoreError> {
        Visibility::from_str_db(&self.visibility)
    }

    /// Influencers may apply to any public campaign; flagging only hides it
    /// from search.
    pub fn is_open_to_influencers(&self) -> bool {
        matches!(self.visibility(), Ok(Visibility::Public))
    }
}

/// DTO for creating a new campaign. Validated by the handler.
#[derive(Debug)]
pub struct CreateCampaign {
    pub sponsor_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub budget: f64,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub visibility: Visibility,
}

/// DTO for updating a campaign. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub budget: Option<f64>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub visibility: Option<Visibility>,
}
