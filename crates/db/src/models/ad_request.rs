//! Ad request entity model and DTOs.

use serde::Serialize;
use sponnect_core::error::CoreError;
use sponnect_core::negotiation::{AdRequestStatus, NegotiationState, Party, Terms};
use sponnect_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `ad_requests` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdRequest {
    pub id: DbId,
    pub campaign_id: DbId,
    pub influencer_id: DbId,
    pub initiator_id: DbId,
    pub message: Option<String>,
    pub requirements: String,
    pub payment_amount: f64,
    pub status: String,
    pub last_offer_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdRequest {
    pub fn status(&self) -> Result<AdRequestStatus, CoreError> {
        AdRequestStatus::from_str_db(&self.status)
    }

    /// Who opened the thread. Only the influencer or the campaign's sponsor
    /// can create a request, so anyone but the influencer is the sponsor side.
    pub fn initiator(&self) -> Party {
        if self.initiator_id == self.influencer_id {
            Party::Influencer
        } else {
            Party::Sponsor
        }
    }

    /// Snapshot of the row as the negotiation planner sees it.
    pub fn negotiation_state(&self) -> Result<NegotiationState, CoreError> {
        Ok(NegotiationState {
            status: self.status()?,
            initiator: self.initiator(),
            last_offer_by: Party::from_str_db(&self.last_offer_by)?,
            terms: Terms {
                payment_amount: self.payment_amount,
                message: self.message.clone(),
                requirements: self.requirements.clone(),
            },
        })
    }
}

/// An ad request joined with the owning campaign's sponsor, used for
/// participant checks before any read or write.
#[derive(Debug, Clone, FromRow)]
pub struct OwnedAdRequest {
    #[sqlx(flatten)]
    pub ad_request: AdRequest,
    pub sponsor_id: DbId,
}

impl OwnedAdRequest {
    /// The negotiating party `user_id` plays on this request, if any.
    pub fn party_of(&self, user_id: DbId) -> Option<Party> {
        if user_id == self.sponsor_id {
            Some(Party::Sponsor)
        } else if user_id == self.ad_request.influencer_id {
            Some(Party::Influencer)
        } else {
            None
        }
    }
}

/// An ad request with display names for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdRequestDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ad_request: AdRequest,
    pub campaign_name: String,
    pub influencer_name: Option<String>,
    pub influencer_username: String,
}

/// DTO for inserting the opening proposal of a thread.
#[derive(Debug)]
pub struct CreateAdRequest {
    pub campaign_id: DbId,
    pub influencer_id: DbId,
    pub initiator_id: DbId,
    pub message: Option<String>,
    pub requirements: String,
    pub payment_amount: f64,
    pub last_offer_by: Party,
}

/// Filters for ad request listings.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdRequestFilter {
    pub status: Option<AdRequestStatus>,
    pub campaign_id: Option<DbId>,
}
