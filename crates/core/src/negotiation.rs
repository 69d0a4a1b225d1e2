//! Ad-request negotiation state machine.
//!
//! Two parties take turns on one [`NegotiationState`]. The party recorded in
//! `last_offer_by` made the most recent offer, so the *other* party holds the
//! turn. Every planner in this module is pure: it inspects a snapshot and
//! either returns the [`Transition`] to apply or the error explaining why
//! nothing may change. Persisting the transition (ledger append plus row
//! update, in one transaction) is the caller's job.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_NEGOTIATING: &str = "Negotiating";
pub const STATUS_ACCEPTED: &str = "Accepted";
pub const STATUS_REJECTED: &str = "Rejected";

/// All valid ad-request status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_NEGOTIATING,
    STATUS_ACCEPTED,
    STATUS_REJECTED,
];

/// Lifecycle status of an ad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdRequestStatus {
    Pending,
    Negotiating,
    Accepted,
    Rejected,
}

impl AdRequestStatus {
    /// Parse a status string from the database or a query filter.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_NEGOTIATING => Ok(Self::Negotiating),
            STATUS_ACCEPTED => Ok(Self::Accepted),
            STATUS_REJECTED => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Negotiating => STATUS_NEGOTIATING,
            Self::Accepted => STATUS_ACCEPTED,
            Self::Rejected => STATUS_REJECTED,
        }
    }

    /// Accepted and Rejected admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Only requests that never became an agreement may be deleted.
    pub fn is_deletable(&self) -> bool {
        matches!(self, Self::Pending | Self::Rejected)
    }
}

/// Parse an optional `?status=` filter, rejecting unknown values.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<AdRequestStatus>, CoreError> {
    raw.filter(|s| !s.is_empty())
        .map(AdRequestStatus::from_str_db)
        .transpose()
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

pub const PARTY_SPONSOR: &str = "sponsor";
pub const PARTY_INFLUENCER: &str = "influencer";

/// One side of a negotiation. Stored in `ad_requests.last_offer_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Sponsor,
    Influencer,
}

impl Party {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            PARTY_SPONSOR => Ok(Self::Sponsor),
            PARTY_INFLUENCER => Ok(Self::Influencer),
            _ => Err(CoreError::Validation(format!(
                "Invalid party '{s}'. Must be one of: {PARTY_SPONSOR}, {PARTY_INFLUENCER}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sponsor => PARTY_SPONSOR,
            Self::Influencer => PARTY_INFLUENCER,
        }
    }

    /// The counter-party.
    pub fn other(&self) -> Self {
        match self {
            Self::Sponsor => Self::Influencer,
            Self::Influencer => Self::Sponsor,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger actions
// ---------------------------------------------------------------------------

pub const ACTION_PROPOSE: &str = "propose";
pub const ACTION_NEGOTIATE: &str = "negotiate";
pub const ACTION_ACCEPT: &str = "accept";
pub const ACTION_REJECT: &str = "reject";
pub const ACTION_ACCEPT_APPLICATION: &str = "accept_application";
pub const ACTION_REJECT_APPLICATION: &str = "reject_application";

/// All action values that may appear in `negotiation_history.action`.
pub const VALID_LEDGER_ACTIONS: &[&str] = &[
    ACTION_PROPOSE,
    ACTION_NEGOTIATE,
    ACTION_ACCEPT,
    ACTION_REJECT,
    ACTION_ACCEPT_APPLICATION,
    ACTION_REJECT_APPLICATION,
];

/// The kind of step recorded in a negotiation history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    Propose,
    Negotiate,
    Accept,
    Reject,
    AcceptApplication,
    RejectApplication,
}

impl LedgerAction {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            ACTION_PROPOSE => Ok(Self::Propose),
            ACTION_NEGOTIATE => Ok(Self::Negotiate),
            ACTION_ACCEPT => Ok(Self::Accept),
            ACTION_REJECT => Ok(Self::Reject),
            ACTION_ACCEPT_APPLICATION => Ok(Self::AcceptApplication),
            ACTION_REJECT_APPLICATION => Ok(Self::RejectApplication),
            _ => Err(CoreError::Validation(format!(
                "Invalid ledger action '{s}'. Must be one of: {}",
                VALID_LEDGER_ACTIONS.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propose => ACTION_PROPOSE,
            Self::Negotiate => ACTION_NEGOTIATE,
            Self::Accept => ACTION_ACCEPT,
            Self::Reject => ACTION_REJECT,
            Self::AcceptApplication => ACTION_ACCEPT_APPLICATION,
            Self::RejectApplication => ACTION_REJECT_APPLICATION,
        }
    }
}

/// An action a party may take when responding to the other side's offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    Accept,
    Reject,
    Negotiate,
}

impl ResponseAction {
    /// Parse the `action` field of a respond request.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ACTION_ACCEPT => Ok(Self::Accept),
            ACTION_REJECT => Ok(Self::Reject),
            ACTION_NEGOTIATE => Ok(Self::Negotiate),
            _ => Err(CoreError::Validation(format!(
                "Invalid action '{s}'. Use 'accept', 'reject', or 'negotiate'."
            ))),
        }
    }

    fn ledger_action(self) -> LedgerAction {
        match self {
            Self::Accept => LedgerAction::Accept,
            Self::Reject => LedgerAction::Reject,
            Self::Negotiate => LedgerAction::Negotiate,
        }
    }
}

/// A sponsor's verdict on an influencer-initiated application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationDecision {
    Accept,
    Reject,
}

// ---------------------------------------------------------------------------
// Counter-offer fields
// ---------------------------------------------------------------------------

/// A term of an offer that a counter-offer may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferField {
    Payment,
    Message,
    Requirements,
}

/// Fields a sponsor may change when countering.
pub const SPONSOR_COUNTER_FIELDS: &[OfferField] =
    &[OfferField::Payment, OfferField::Message, OfferField::Requirements];

/// Fields an influencer may change when countering. Requirements are the
/// sponsor's to set.
pub const INFLUENCER_COUNTER_FIELDS: &[OfferField] = &[OfferField::Payment, OfferField::Message];

pub fn counter_fields(party: Party) -> &'static [OfferField] {
    match party {
        Party::Sponsor => SPONSOR_COUNTER_FIELDS,
        Party::Influencer => INFLUENCER_COUNTER_FIELDS,
    }
}

// ---------------------------------------------------------------------------
// Defaults for influencer applications
// ---------------------------------------------------------------------------

pub const DEFAULT_APPLICATION_REQUIREMENTS: &str = "Influencer proposal based on campaign goals.";
pub const DEFAULT_APPLICATION_MESSAGE: &str = "Interested in collaborating on this campaign.";
pub const ACCEPT_APPLICATION_NOTE: &str = "Sponsor accepted influencer's initial application.";
pub const REJECT_APPLICATION_NOTE: &str = "Sponsor rejected influencer's initial application.";

// ---------------------------------------------------------------------------
// Snapshot and transition types
// ---------------------------------------------------------------------------

/// The negotiable terms of an ad request.
#[derive(Debug, Clone, PartialEq)]
pub struct Terms {
    pub payment_amount: f64,
    pub message: Option<String>,
    pub requirements: String,
}

/// Everything the planner needs to know about an ad request.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationState {
    pub status: AdRequestStatus,
    pub initiator: Party,
    pub last_offer_by: Party,
    pub terms: Terms,
}

impl NegotiationState {
    /// The party entitled to act next.
    pub fn turn(&self) -> Party {
        self.last_offer_by.other()
    }
}

/// Raw offer fields as submitted by a client.
///
/// `payment_amount` is kept as JSON so that numeric strings (`"600"`) are
/// accepted and everything else is reported as a validation error rather
/// than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferInput {
    pub payment_amount: Option<serde_json::Value>,
    pub message: Option<String>,
    pub requirements: Option<String>,
}

/// The outcome of a successful plan: the new row values plus the ledger
/// entry describing the step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub status: AdRequestStatus,
    pub last_offer_by: Party,
    pub terms: Terms,
    pub action: LedgerAction,
    /// Free-text note stored on the ledger entry.
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Payment parsing
// ---------------------------------------------------------------------------

/// Parse and validate a client-supplied payment amount.
///
/// Accepts a JSON number or a numeric string. The value must be finite and
/// non-negative.
pub fn parse_payment_amount(raw: Option<&serde_json::Value>) -> Result<f64, CoreError> {
    let amount = match raw {
        None | Some(serde_json::Value::Null) => {
            return Err(CoreError::Validation("payment_amount is required".into()))
        }
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    }
    .ok_or_else(|| CoreError::Validation("Invalid payment amount".into()))?;

    validate_payment_amount(amount)?;
    Ok(amount)
}

/// Reject NaN, infinities and negative amounts.
pub fn validate_payment_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "Invalid payment amount {amount}. Must be a non-negative number"
        )));
    }
    Ok(())
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Planners
// ---------------------------------------------------------------------------

/// Plan the opening proposal of a new ad request.
///
/// Sponsors must state requirements; influencer applications fall back to
/// generic requirements and message text.
pub fn plan_proposal(initiator: Party, input: OfferInput) -> Result<Transition, CoreError> {
    let payment_amount = parse_payment_amount(input.payment_amount.as_ref())?;

    let (requirements, message) = match initiator {
        Party::Sponsor => {
            let requirements = non_blank(input.requirements)
                .ok_or_else(|| CoreError::Validation("requirements is required".into()))?;
            (requirements, non_blank(input.message))
        }
        Party::Influencer => (
            non_blank(input.requirements)
                .unwrap_or_else(|| DEFAULT_APPLICATION_REQUIREMENTS.to_string()),
            Some(
                non_blank(input.message)
                    .unwrap_or_else(|| DEFAULT_APPLICATION_MESSAGE.to_string()),
            ),
        ),
    };

    Ok(Transition {
        status: AdRequestStatus::Pending,
        last_offer_by: initiator,
        terms: Terms {
            payment_amount,
            message: message.clone(),
            requirements,
        },
        action: LedgerAction::Propose,
        note: message,
    })
}

/// Check that `actor` may respond to `state` right now.
///
/// Sponsors respond only while negotiating and only on their turn. An
/// influencer may act on any pending request, including their own
/// application, and on a negotiating one once the sponsor has countered.
pub fn ensure_can_respond(state: &NegotiationState, actor: Party) -> Result<(), CoreError> {
    if state.status.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Ad request is already {}; no further actions are accepted",
            state.status.as_str()
        )));
    }

    let allowed = match (actor, state.status) {
        (Party::Sponsor, AdRequestStatus::Negotiating) => state.turn() == Party::Sponsor,
        (Party::Influencer, AdRequestStatus::Pending) => true,
        (Party::Influencer, AdRequestStatus::Negotiating) => state.turn() == Party::Influencer,
        _ => false,
    };

    if !allowed {
        return Err(CoreError::Conflict(format!(
            "Cannot act on ad request in status '{}': not the {}'s turn",
            state.status.as_str(),
            actor.as_str()
        )));
    }
    Ok(())
}

/// Plan a party's response (accept, reject, or counter-offer).
pub fn plan_response(
    state: &NegotiationState,
    actor: Party,
    action: ResponseAction,
    input: OfferInput,
) -> Result<Transition, CoreError> {
    ensure_can_respond(state, actor)?;

    let note = non_blank(input.message.clone());

    let (status, last_offer_by, terms) = match action {
        ResponseAction::Accept => (
            AdRequestStatus::Accepted,
            state.last_offer_by,
            state.terms.clone(),
        ),
        ResponseAction::Reject => (
            AdRequestStatus::Rejected,
            state.last_offer_by,
            state.terms.clone(),
        ),
        ResponseAction::Negotiate => (
            AdRequestStatus::Negotiating,
            actor,
            counter_terms(&state.terms, actor, input)?,
        ),
    };

    Ok(Transition {
        status,
        last_offer_by,
        terms,
        action: action.ledger_action(),
        note,
    })
}

/// Apply a counter-offer to the current terms, honouring the actor's
/// allowed-field list.
fn counter_terms(current: &Terms, actor: Party, input: OfferInput) -> Result<Terms, CoreError> {
    let allowed = counter_fields(actor);

    let requirements = non_blank(input.requirements);
    if requirements.is_some() && !allowed.contains(&OfferField::Requirements) {
        return Err(CoreError::Validation(format!(
            "A {} counter-offer cannot change requirements",
            actor.as_str()
        )));
    }

    let payment_amount = parse_payment_amount(input.payment_amount.as_ref())
        .map_err(|e| match e {
            CoreError::Validation(msg) if msg.contains("required") => CoreError::Validation(
                "payment_amount is required for a counter-offer".into(),
            ),
            other => other,
        })?;

    Ok(Terms {
        payment_amount,
        message: non_blank(input.message).or_else(|| current.message.clone()),
        requirements: requirements.unwrap_or_else(|| current.requirements.clone()),
    })
}

/// Plan a sponsor's decision on an influencer-initiated application.
pub fn plan_application_decision(
    state: &NegotiationState,
    decision: ApplicationDecision,
) -> Result<Transition, CoreError> {
    if state.status != AdRequestStatus::Pending || state.initiator != Party::Influencer {
        return Err(CoreError::Conflict(
            "Application is not pending or was not initiated by the influencer".into(),
        ));
    }

    let (status, action, note) = match decision {
        ApplicationDecision::Accept => (
            AdRequestStatus::Accepted,
            LedgerAction::AcceptApplication,
            ACCEPT_APPLICATION_NOTE,
        ),
        ApplicationDecision::Reject => (
            AdRequestStatus::Rejected,
            LedgerAction::RejectApplication,
            REJECT_APPLICATION_NOTE,
        ),
    };

    Ok(Transition {
        status,
        last_offer_by: state.last_offer_by,
        terms: state.terms.clone(),
        action,
        note: Some(note.to_string()),
    })
}

/// Check that an ad request in `status` may be deleted.
pub fn ensure_deletable(status: AdRequestStatus) -> Result<(), CoreError> {
    if !status.is_deletable() {
        return Err(CoreError::Conflict(format!(
            "Cannot delete an ad request in status '{}'",
            status.as_str()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn offer(payment: serde_json::Value) -> OfferInput {
        OfferInput {
            payment_amount: Some(payment),
            ..Default::default()
        }
    }

    fn sponsor_offer(payment: f64) -> NegotiationState {
        let t = plan_proposal(
            Party::Sponsor,
            OfferInput {
                payment_amount: Some(json!(payment)),
                message: Some("Promote our launch".into()),
                requirements: Some("2 posts".into()),
            },
        )
        .unwrap();
        apply(Party::Sponsor, &t)
    }

    fn application(payment: f64) -> NegotiationState {
        let t = plan_proposal(Party::Influencer, offer(json!(payment))).unwrap();
        apply(Party::Influencer, &t)
    }

    fn apply(initiator: Party, t: &Transition) -> NegotiationState {
        NegotiationState {
            status: t.status,
            initiator,
            last_offer_by: t.last_offer_by,
            terms: t.terms.clone(),
        }
    }

    fn step(state: &NegotiationState, t: &Transition) -> NegotiationState {
        apply(state.initiator, t)
    }

    // -- Enumerations --------------------------------------------------------

    #[test]
    fn test_status_strings_round_trip() {
        for s in VALID_STATUSES {
            assert_eq!(AdRequestStatus::from_str_db(s).unwrap().as_str(), *s);
        }
        assert!(AdRequestStatus::from_str_db("pending").is_err());
        assert!(AdRequestStatus::from_str_db("Cancelled").is_err());
    }

    #[test]
    fn test_ledger_action_strings_round_trip() {
        for s in VALID_LEDGER_ACTIONS {
            assert_eq!(LedgerAction::from_str_db(s).unwrap().as_str(), *s);
        }
        assert!(LedgerAction::from_str_db("counter").is_err());
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("Negotiating")).unwrap(),
            Some(AdRequestStatus::Negotiating)
        );
        assert_matches!(parse_status_filter(Some("bogus")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_response_action_rejected() {
        assert_matches!(ResponseAction::parse("withdraw"), Err(CoreError::Validation(msg)) => {
            assert!(msg.contains("Invalid action"));
        });
        assert_matches!(ResponseAction::parse("propose"), Err(CoreError::Validation(_)));
    }

    // -- Payment parsing -----------------------------------------------------

    #[test]
    fn test_payment_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_payment_amount(Some(&json!(600))).unwrap(), 600.0);
        assert_eq!(parse_payment_amount(Some(&json!(12.5))).unwrap(), 12.5);
        assert_eq!(parse_payment_amount(Some(&json!(" 750 "))).unwrap(), 750.0);
        assert_eq!(parse_payment_amount(Some(&json!(0))).unwrap(), 0.0);
    }

    #[test]
    fn test_payment_rejects_missing_and_malformed() {
        assert_matches!(parse_payment_amount(None), Err(CoreError::Validation(_)));
        assert_matches!(parse_payment_amount(Some(&json!(null))), Err(CoreError::Validation(_)));
        assert_matches!(parse_payment_amount(Some(&json!("lots"))), Err(CoreError::Validation(_)));
        assert_matches!(parse_payment_amount(Some(&json!(true))), Err(CoreError::Validation(_)));
        assert_matches!(parse_payment_amount(Some(&json!(-1))), Err(CoreError::Validation(_)));
        assert_matches!(parse_payment_amount(Some(&json!("NaN"))), Err(CoreError::Validation(_)));
        assert_matches!(parse_payment_amount(Some(&json!("inf"))), Err(CoreError::Validation(_)));
    }

    // -- Proposals -----------------------------------------------------------

    #[test]
    fn test_sponsor_proposal_is_pending_with_sponsor_last() {
        let state = sponsor_offer(500.0);
        assert_eq!(state.status, AdRequestStatus::Pending);
        assert_eq!(state.last_offer_by, Party::Sponsor);
        assert_eq!(state.turn(), Party::Influencer);
        assert_eq!(state.terms.payment_amount, 500.0);
    }

    #[test]
    fn test_sponsor_proposal_requires_requirements() {
        let result = plan_proposal(Party::Sponsor, offer(json!(100)));
        assert_matches!(result, Err(CoreError::Validation(msg)) => {
            assert!(msg.contains("requirements"));
        });
    }

    #[test]
    fn test_application_fills_defaults() {
        let t = plan_proposal(Party::Influencer, offer(json!("250"))).unwrap();
        assert_eq!(t.action, LedgerAction::Propose);
        assert_eq!(t.last_offer_by, Party::Influencer);
        assert_eq!(t.terms.requirements, DEFAULT_APPLICATION_REQUIREMENTS);
        assert_eq!(t.terms.message.as_deref(), Some(DEFAULT_APPLICATION_MESSAGE));
        assert_eq!(t.note.as_deref(), Some(DEFAULT_APPLICATION_MESSAGE));
    }

    #[test]
    fn test_proposal_requires_payment() {
        let input = OfferInput {
            requirements: Some("x".into()),
            ..Default::default()
        };
        assert_matches!(plan_proposal(Party::Sponsor, input), Err(CoreError::Validation(_)));
    }

    // -- Responses -----------------------------------------------------------

    #[test]
    fn test_full_negotiation_scenario() {
        let s0 = sponsor_offer(500.0);

        let t1 = plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, offer(json!(600)))
            .unwrap();
        assert_eq!(t1.action, LedgerAction::Negotiate);
        let s1 = step(&s0, &t1);
        assert_eq!(s1.status, AdRequestStatus::Negotiating);
        assert_eq!(s1.last_offer_by, Party::Influencer);
        assert_eq!(s1.turn(), Party::Sponsor);
        assert_eq!(s1.terms.payment_amount, 600.0);
        assert_eq!(s1.terms.requirements, "2 posts", "influencer leaves requirements alone");

        let t2 = plan_response(&s1, Party::Sponsor, ResponseAction::Accept, OfferInput::default())
            .unwrap();
        let s2 = step(&s1, &t2);
        assert_eq!(s2.status, AdRequestStatus::Accepted);
        assert_eq!(s2.terms.payment_amount, 600.0);

        for party in [Party::Sponsor, Party::Influencer] {
            for action in [
                ResponseAction::Accept,
                ResponseAction::Reject,
                ResponseAction::Negotiate,
            ] {
                assert_matches!(
                    plan_response(&s2, party, action, offer(json!(1))),
                    Err(CoreError::Conflict(_))
                );
            }
        }
    }

    #[test]
    fn test_sponsor_cannot_negotiate_while_pending() {
        let s0 = sponsor_offer(500.0);
        let result = plan_response(&s0, Party::Sponsor, ResponseAction::Negotiate, offer(json!(450)));
        assert_matches!(result, Err(CoreError::Conflict(msg)) => {
            assert!(msg.contains("sponsor's turn"));
        });
    }

    #[test]
    fn test_negotiate_sets_last_offer_to_actor() {
        let s0 = sponsor_offer(500.0);
        let s1 = step(
            &s0,
            &plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, offer(json!(700)))
                .unwrap(),
        );
        let t2 = plan_response(&s1, Party::Sponsor, ResponseAction::Negotiate, offer(json!(650)))
            .unwrap();
        assert_eq!(t2.last_offer_by, Party::Sponsor);
        assert_eq!(t2.status, AdRequestStatus::Negotiating);
        let s2 = step(&s1, &t2);
        assert_eq!(s2.turn(), Party::Influencer);

        // The sponsor may not counter its own counter.
        assert_matches!(
            plan_response(&s2, Party::Sponsor, ResponseAction::Negotiate, offer(json!(640))),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_influencer_may_reject_opening_offer() {
        let s0 = sponsor_offer(500.0);
        let t = plan_response(&s0, Party::Influencer, ResponseAction::Reject, OfferInput::default())
            .unwrap();
        assert_eq!(t.status, AdRequestStatus::Rejected);
        assert_eq!(t.action, LedgerAction::Reject);
        assert_eq!(t.terms, s0.terms);
    }

    #[test]
    fn test_influencer_may_revise_or_withdraw_own_application() {
        let s0 = application(300.0);

        let t = plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, offer(json!(350)))
            .unwrap();
        assert_eq!(t.status, AdRequestStatus::Negotiating);
        assert_eq!(t.last_offer_by, Party::Influencer);
        assert_eq!(t.terms.payment_amount, 350.0);
        let s1 = step(&s0, &t);
        assert_eq!(s1.turn(), Party::Sponsor);
        assert_matches!(
            plan_response(&s1, Party::Influencer, ResponseAction::Negotiate, offer(json!(360))),
            Err(CoreError::Conflict(_))
        );

        let t = plan_response(&s0, Party::Influencer, ResponseAction::Reject, OfferInput::default())
            .unwrap();
        assert_eq!(t.status, AdRequestStatus::Rejected);
        assert_eq!(t.action, LedgerAction::Reject);
    }

    #[test]
    fn test_sponsor_cannot_respond_to_pending_application() {
        let s0 = application(300.0);
        assert_matches!(
            plan_response(&s0, Party::Sponsor, ResponseAction::Accept, OfferInput::default()),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_counter_offer_requires_valid_payment() {
        let s0 = sponsor_offer(500.0);
        assert_matches!(
            plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, OfferInput::default()),
            Err(CoreError::Validation(msg)) => assert!(msg.contains("counter-offer"))
        );
        assert_matches!(
            plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, offer(json!("abc"))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_influencer_counter_cannot_change_requirements() {
        let s0 = sponsor_offer(500.0);
        let input = OfferInput {
            payment_amount: Some(json!(550)),
            message: None,
            requirements: Some("1 post only".into()),
        };
        assert_matches!(
            plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, input),
            Err(CoreError::Validation(msg)) => assert!(msg.contains("requirements"))
        );
    }

    #[test]
    fn test_sponsor_counter_may_change_requirements_and_message() {
        let s0 = sponsor_offer(500.0);
        let s1 = step(
            &s0,
            &plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, offer(json!(700)))
                .unwrap(),
        );
        let input = OfferInput {
            payment_amount: Some(json!(650)),
            message: Some("Meet in the middle".into()),
            requirements: Some("3 posts".into()),
        };
        let t = plan_response(&s1, Party::Sponsor, ResponseAction::Negotiate, input).unwrap();
        assert_eq!(t.terms.requirements, "3 posts");
        assert_eq!(t.terms.message.as_deref(), Some("Meet in the middle"));
        assert_eq!(t.note.as_deref(), Some("Meet in the middle"));
    }

    #[test]
    fn test_blank_counter_message_keeps_previous() {
        let s0 = sponsor_offer(500.0);
        let input = OfferInput {
            payment_amount: Some(json!(600)),
            message: Some("   ".into()),
            requirements: None,
        };
        let t = plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, input).unwrap();
        assert_eq!(t.terms.message.as_deref(), Some("Promote our launch"));
        assert_eq!(t.note, None);
    }

    #[test]
    fn test_failed_plan_leaves_state_untouched() {
        let s0 = sponsor_offer(500.0);
        let before = s0.clone();
        let _ = plan_response(&s0, Party::Sponsor, ResponseAction::Accept, OfferInput::default());
        let _ = plan_response(&s0, Party::Influencer, ResponseAction::Negotiate, offer(json!(-5)));
        assert_eq!(s0, before);
    }

    // -- Applications --------------------------------------------------------

    #[test]
    fn test_accept_application_then_reject_conflicts() {
        let s0 = application(300.0);
        let t = plan_application_decision(&s0, ApplicationDecision::Accept).unwrap();
        assert_eq!(t.status, AdRequestStatus::Accepted);
        assert_eq!(t.action, LedgerAction::AcceptApplication);
        assert_eq!(t.note.as_deref(), Some(ACCEPT_APPLICATION_NOTE));

        let s1 = step(&s0, &t);
        assert_matches!(
            plan_application_decision(&s1, ApplicationDecision::Reject),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_application_decision_requires_influencer_initiator() {
        let s0 = sponsor_offer(500.0);
        assert_matches!(
            plan_application_decision(&s0, ApplicationDecision::Accept),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_reject_application() {
        let s0 = application(300.0);
        let t = plan_application_decision(&s0, ApplicationDecision::Reject).unwrap();
        assert_eq!(t.status, AdRequestStatus::Rejected);
        assert_eq!(t.action, LedgerAction::RejectApplication);
    }

    // -- Deletion ------------------------------------------------------------

    #[test]
    fn test_only_pending_or_rejected_are_deletable() {
        assert!(ensure_deletable(AdRequestStatus::Pending).is_ok());
        assert!(ensure_deletable(AdRequestStatus::Rejected).is_ok());
        assert_matches!(
            ensure_deletable(AdRequestStatus::Negotiating),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            ensure_deletable(AdRequestStatus::Accepted),
            Err(CoreError::Conflict(_))
        );
    }
}
