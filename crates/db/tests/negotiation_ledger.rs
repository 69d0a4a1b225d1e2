//! Integration tests for the ad request and negotiation ledger repositories.
//!
//! - Ledger append order and username join
//! - Immutability trigger on ledger rows
//! - Cascade delete from ad request to ledger
//! - Pending-pair partial unique index
//! - Row lock returns the owning sponsor
//! - Latest-action summaries

use chrono::Utc;
use sponnect_core::campaign::Visibility;
use sponnect_core::negotiation::{
    AdRequestStatus, LedgerAction, Party, Terms, Transition,
};
use sponnect_core::roles::Role;
use sponnect_db::models::ad_request::{AdRequest, CreateAdRequest};
use sponnect_db::models::campaign::CreateCampaign;
use sponnect_db::models::negotiation_history::CreateNegotiationEntry;
use sponnect_db::models::user::CreateUser;
use sponnect_db::repositories::{AdRequestRepo, CampaignRepo, NegotiationHistoryRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: Role) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        role,
        sponsor_approved: true,
        company_name: None,
        industry: None,
        influencer_name: Some(format!("{username} display")),
        category: None,
        niche: None,
        reach: None,
    }
}

/// Create a sponsor, an influencer and a public campaign. Returns
/// `(sponsor_id, influencer_id, campaign_id)`.
async fn seed(pool: &PgPool) -> (i64, i64, i64) {
    let sponsor = UserRepo::create(pool, &new_user("acme", Role::Sponsor))
        .await
        .unwrap();
    let influencer = UserRepo::create(pool, &new_user("ivy", Role::Influencer))
        .await
        .unwrap();
    let campaign = CampaignRepo::create(
        pool,
        &CreateCampaign {
            sponsor_id: sponsor.id,
            name: "Spring launch".to_string(),
            description: None,
            goals: None,
            budget: 5000.0,
            start_date: Utc::now(),
            end_date: None,
            visibility: Visibility::Public,
        },
    )
    .await
    .unwrap();
    (sponsor.id, influencer.id, campaign.id)
}

async fn open_request(
    pool: &PgPool,
    sponsor_id: i64,
    influencer_id: i64,
    campaign_id: i64,
) -> AdRequest {
    let mut tx = pool.begin().await.unwrap();
    let ad_request = AdRequestRepo::create(
        &mut tx,
        &CreateAdRequest {
            campaign_id,
            influencer_id,
            initiator_id: sponsor_id,
            message: Some("Hi".to_string()),
            requirements: "2 posts".to_string(),
            payment_amount: 500.0,
            last_offer_by: Party::Sponsor,
        },
    )
    .await
    .unwrap();
    NegotiationHistoryRepo::append(
        &mut tx,
        &CreateNegotiationEntry {
            ad_request_id: ad_request.id,
            user_id: sponsor_id,
            user_role: Party::Sponsor,
            action: LedgerAction::Propose,
            message: Some("Hi".to_string()),
            payment_amount: Some(500.0),
            requirements: Some("2 posts".to_string()),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    ad_request
}

async fn counter(pool: &PgPool, ad_request_id: i64, influencer_id: i64, amount: f64) {
    let mut tx = pool.begin().await.unwrap();
    let transition = Transition {
        status: AdRequestStatus::Negotiating,
        last_offer_by: Party::Influencer,
        terms: Terms {
            payment_amount: amount,
            message: Some("Counter".to_string()),
            requirements: "2 posts".to_string(),
        },
        action: LedgerAction::Negotiate,
        note: Some("Counter".to_string()),
    };
    NegotiationHistoryRepo::append(
        &mut tx,
        &CreateNegotiationEntry {
            ad_request_id,
            user_id: influencer_id,
            user_role: Party::Influencer,
            action: transition.action,
            message: transition.note.clone(),
            payment_amount: Some(amount),
            requirements: Some(transition.terms.requirements.clone()),
        },
    )
    .await
    .unwrap();
    AdRequestRepo::apply_transition(&mut tx, ad_request_id, &transition)
        .await
        .unwrap();
    tx.commit().await.unwrap();
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_is_ordered_and_joined(pool: PgPool) {
    let (sponsor_id, influencer_id, campaign_id) = seed(&pool).await;
    let ad_request = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;
    counter(&pool, ad_request.id, influencer_id, 600.0).await;

    let history = NegotiationHistoryRepo::list_for_ad_request(&pool, ad_request.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].entry.action, "propose");
    assert_eq!(history[0].username, "acme");
    assert_eq!(history[1].entry.action, "negotiate");
    assert_eq!(history[1].username, "ivy");
    assert_eq!(history[1].entry.payment_amount, Some(600.0));
    assert!(history[0].entry.created_at < history[1].entry.created_at);

    let row = AdRequestRepo::find_detail(&pool, ad_request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.ad_request.status, "Negotiating");
    assert_eq!(row.ad_request.last_offer_by, "influencer");
    assert_eq!(row.campaign_name, "Spring launch");
    assert!(row.ad_request.updated_at > row.ad_request.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_history_rows_are_immutable(pool: PgPool) {
    let (sponsor_id, influencer_id, campaign_id) = seed(&pool).await;
    let ad_request = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;

    let result = sqlx::query("UPDATE negotiation_history SET action = 'accept' WHERE ad_request_id = $1")
        .bind(ad_request.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "ledger rows must reject updates");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_history(pool: PgPool) {
    let (sponsor_id, influencer_id, campaign_id) = seed(&pool).await;
    let ad_request = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;

    let mut tx = pool.begin().await.unwrap();
    assert!(AdRequestRepo::delete(&mut tx, ad_request.id).await.unwrap());
    tx.commit().await.unwrap();

    let remaining = NegotiationHistoryRepo::count_for_ad_request(&pool, ad_request.id)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

// ---------------------------------------------------------------------------
// Ad requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pending_pair_is_unique(pool: PgPool) {
    let (sponsor_id, influencer_id, campaign_id) = seed(&pool).await;
    let first = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;

    let mut tx = pool.begin().await.unwrap();
    assert!(AdRequestRepo::pending_exists(&mut tx, campaign_id, influencer_id)
        .await
        .unwrap());
    let err = AdRequestRepo::create(
        &mut tx,
        &CreateAdRequest {
            campaign_id,
            influencer_id,
            initiator_id: influencer_id,
            message: None,
            requirements: "anything".to_string(),
            payment_amount: 1.0,
            last_offer_by: Party::Influencer,
        },
    )
    .await
    .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_ad_requests_pending_pair"));
    drop(tx);

    // Once the first thread leaves Pending, a new one may open.
    counter(&pool, first.id, influencer_id, 700.0).await;
    let second = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;
    assert_ne!(first.id, second.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_returns_owner_and_state(pool: PgPool) {
    let (sponsor_id, influencer_id, campaign_id) = seed(&pool).await;
    let ad_request = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;

    let mut tx = pool.begin().await.unwrap();
    let locked = AdRequestRepo::lock_owned(&mut tx, ad_request.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(locked.sponsor_id, sponsor_id);
    assert_eq!(locked.party_of(sponsor_id), Some(Party::Sponsor));
    assert_eq!(locked.party_of(influencer_id), Some(Party::Influencer));
    assert_eq!(locked.party_of(-1), None);

    let state = locked.ad_request.negotiation_state().unwrap();
    assert_eq!(state.status, AdRequestStatus::Pending);
    assert_eq!(state.initiator, Party::Sponsor);
    assert_eq!(state.turn(), Party::Influencer);

    assert!(AdRequestRepo::lock_owned(&mut tx, ad_request.id + 1000)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_action_summaries(pool: PgPool) {
    let (sponsor_id, influencer_id, campaign_id) = seed(&pool).await;
    let ad_request = open_request(&pool, sponsor_id, influencer_id, campaign_id).await;
    counter(&pool, ad_request.id, influencer_id, 650.0).await;

    let by_campaign = NegotiationHistoryRepo::latest_for_campaign(&pool, campaign_id)
        .await
        .unwrap();
    assert_eq!(by_campaign.len(), 1);
    assert_eq!(by_campaign[0].latest_action.action, "negotiate");
    assert_eq!(by_campaign[0].latest_action.payment_amount, Some(650.0));

    let by_influencer = NegotiationHistoryRepo::latest_for_influencer(&pool, influencer_id)
        .await
        .unwrap();
    assert_eq!(by_influencer.len(), 1);
    assert_eq!(by_influencer[0].ad_request.ad_request.id, ad_request.id);
}
