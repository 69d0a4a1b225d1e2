//! Transactional unit of work for ad request negotiation.
//!
//! Every state change follows the same shape:
//!
//! 1. `BEGIN`
//! 2. Lock the ad request row (`SELECT ... FOR UPDATE`)
//! 3. Check the caller is the expected participant
//! 4. Plan the transition with `sponnect_core::negotiation`
//! 5. Append one ledger entry
//! 6. Write the new row values
//! 7. `COMMIT`
//!
//! Any early return drops the transaction, which rolls it back. The row lock
//! serializes concurrent actors: the loser of a race re-reads the committed
//! state and fails its precondition.

use sponnect_core::error::CoreError;
use sponnect_core::negotiation::{
    ensure_deletable, plan_application_decision, plan_proposal, plan_response,
    ApplicationDecision, OfferInput, Party, ResponseAction, Transition,
};
use sponnect_core::types::DbId;
use sponnect_db::models::ad_request::{AdRequest, CreateAdRequest, OwnedAdRequest};
use sponnect_db::models::negotiation_history::CreateNegotiationEntry;
use sponnect_db::repositories::{AdRequestRepo, CampaignRepo, NegotiationHistoryRepo, UserRepo};
use sponnect_db::DbPool;

use crate::error::{AppError, AppResult};

/// Entity name used in not-found errors.
const AD_REQUEST: &str = "AdRequest";

/// A user acting in a negotiation, together with the side they play.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: DbId,
    pub party: Party,
}

impl Actor {
    pub fn sponsor(user_id: DbId) -> Self {
        Self {
            user_id,
            party: Party::Sponsor,
        }
    }

    pub fn influencer(user_id: DbId) -> Self {
        Self {
            user_id,
            party: Party::Influencer,
        }
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Open a thread with a sponsor's direct offer to an influencer.
///
/// The campaign must belong to the sponsor and the influencer must be active.
pub async fn create_offer(
    pool: &DbPool,
    sponsor_id: DbId,
    campaign_id: DbId,
    influencer_id: DbId,
    input: OfferInput,
) -> AppResult<AdRequest> {
    CampaignRepo::find_owned(pool, campaign_id, sponsor_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        })?;

    UserRepo::find_active_influencer(pool, influencer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Influencer",
            id: influencer_id,
        })?;

    let transition = plan_proposal(Party::Sponsor, input)?;
    open_thread(
        pool,
        Actor::sponsor(sponsor_id),
        campaign_id,
        influencer_id,
        transition,
    )
    .await
}

/// Open a thread with an influencer's application to a public campaign.
///
/// Private campaigns are reported as not found.
pub async fn apply_to_campaign(
    pool: &DbPool,
    influencer_id: DbId,
    campaign_id: DbId,
    input: OfferInput,
) -> AppResult<AdRequest> {
    let campaign = CampaignRepo::find_by_id(pool, campaign_id)
        .await?
        .filter(|c| c.is_open_to_influencers())
        .ok_or(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        })?;

    let transition = plan_proposal(Party::Influencer, input)?;
    open_thread(
        pool,
        Actor::influencer(influencer_id),
        campaign.id,
        influencer_id,
        transition,
    )
    .await
}

async fn open_thread(
    pool: &DbPool,
    actor: Actor,
    campaign_id: DbId,
    influencer_id: DbId,
    transition: Transition,
) -> AppResult<AdRequest> {
    let mut tx = pool.begin().await?;

    if AdRequestRepo::pending_exists(&mut tx, campaign_id, influencer_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A pending ad request already exists for this campaign and influencer".into(),
        )));
    }

    let ad_request = AdRequestRepo::create(
        &mut tx,
        &CreateAdRequest {
            campaign_id,
            influencer_id,
            initiator_id: actor.user_id,
            message: transition.terms.message.clone(),
            requirements: transition.terms.requirements.clone(),
            payment_amount: transition.terms.payment_amount,
            last_offer_by: transition.last_offer_by,
        },
    )
    .await?;

    NegotiationHistoryRepo::append(&mut tx, &ledger_entry(ad_request.id, actor, &transition))
        .await?;

    tx.commit().await?;

    tracing::info!(
        ad_request_id = ad_request.id,
        campaign_id,
        influencer_id,
        actor_id = actor.user_id,
        action = transition.action.as_str(),
        status = transition.status.as_str(),
        "Ad request opened",
    );

    Ok(ad_request)
}

// ---------------------------------------------------------------------------
// Transitions on an existing thread
// ---------------------------------------------------------------------------

/// Accept, reject, or counter the other party's latest offer.
///
/// The action string is parsed before anything is read, so an unknown action
/// never touches the database.
pub async fn respond(
    pool: &DbPool,
    actor: Actor,
    ad_request_id: DbId,
    action: &str,
    input: OfferInput,
) -> AppResult<AdRequest> {
    let action = ResponseAction::parse(action)?;

    let mut tx = pool.begin().await?;
    let locked = lock_as_participant(&mut tx, ad_request_id, actor).await?;
    let state = locked.ad_request.negotiation_state()?;
    let transition = plan_response(&state, actor.party, action, input)?;

    commit_transition(tx, actor, ad_request_id, transition).await
}

/// A sponsor's decision on an influencer-initiated application.
pub async fn decide_application(
    pool: &DbPool,
    sponsor_id: DbId,
    ad_request_id: DbId,
    decision: ApplicationDecision,
) -> AppResult<AdRequest> {
    let actor = Actor::sponsor(sponsor_id);

    let mut tx = pool.begin().await?;
    let locked = lock_as_participant(&mut tx, ad_request_id, actor).await?;
    let state = locked.ad_request.negotiation_state()?;
    let transition = plan_application_decision(&state, decision)?;

    commit_transition(tx, actor, ad_request_id, transition).await
}

/// Delete a Pending or Rejected thread owned by the sponsor. Its ledger
/// entries cascade.
pub async fn delete_ad_request(
    pool: &DbPool,
    sponsor_id: DbId,
    ad_request_id: DbId,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let locked = lock_as_participant(&mut tx, ad_request_id, Actor::sponsor(sponsor_id)).await?;
    ensure_deletable(locked.ad_request.status()?)?;

    AdRequestRepo::delete(&mut tx, ad_request_id).await?;
    tx.commit().await?;

    tracing::info!(
        ad_request_id,
        actor_id = sponsor_id,
        status = locked.ad_request.status.as_str(),
        "Ad request deleted",
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the row and check `actor` plays the expected side of it.
///
/// Non-participants get the same not-found error as a missing row.
async fn lock_as_participant(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ad_request_id: DbId,
    actor: Actor,
) -> AppResult<OwnedAdRequest> {
    AdRequestRepo::lock_owned(tx, ad_request_id)
        .await?
        .filter(|locked| locked.party_of(actor.user_id) == Some(actor.party))
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: AD_REQUEST,
            id: ad_request_id,
        }))
}

/// Append the ledger entry, write the row, and commit.
async fn commit_transition(
    mut tx: sqlx::Transaction<'_, sqlx::Postgres>,
    actor: Actor,
    ad_request_id: DbId,
    transition: Transition,
) -> AppResult<AdRequest> {
    NegotiationHistoryRepo::append(&mut tx, &ledger_entry(ad_request_id, actor, &transition))
        .await?;
    let updated = AdRequestRepo::apply_transition(&mut tx, ad_request_id, &transition).await?;
    tx.commit().await?;

    tracing::info!(
        ad_request_id,
        actor_id = actor.user_id,
        party = actor.party.as_str(),
        action = transition.action.as_str(),
        status = transition.status.as_str(),
        payment_amount = transition.terms.payment_amount,
        "Negotiation transition applied",
    );

    Ok(updated)
}

/// The ledger entry for a transition: the actor's note plus a snapshot of
/// the terms after the step.
fn ledger_entry(ad_request_id: DbId, actor: Actor, transition: &Transition) -> CreateNegotiationEntry {
    CreateNegotiationEntry {
        ad_request_id,
        user_id: actor.user_id,
        user_role: actor.party,
        action: transition.action,
        message: transition.note.clone(),
        payment_amount: Some(transition.terms.payment_amount),
        requirements: Some(transition.terms.requirements.clone()),
    }
}
