//! Proposal handlers: drafting, submission, withdrawal.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use grantdesk_core::{can_view_call, check_proposal_submission, check_withdrawal, DeadlineGates};
use grantdesk_models::{
    Call, CallId, Identity, Investigator, Proposal, ProposalId, ProposalStatus, UserId,
};

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, Authenticated};
use crate::state::AppState;
use crate::types::{CreateProposalRequest, CreatedResponse, SuccessResponse};

/// POST /api/calls/:id/proposals - Create a draft proposal.
///
/// The requester becomes the principal investigator.
pub async fn create_proposal(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(call_id): Path<String>,
    ApiJson(req): ApiJson<CreateProposalRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let call = state
        .calls
        .find_call(&CallId::from(call_id.as_str()))?
        .filter(|call| can_view_call(call, Some(&identity)))
        .ok_or_else(|| ApiError::NotFound(format!("call not found: {}", call_id)))?;

    if !call.is_open() {
        return Err(ApiError::ValidationFailed("call is not open".to_string()));
    }
    if DeadlineGates::evaluate(&call, state.now()).submission_deadline_over {
        return Err(ApiError::DeadlinePassed(
            "the submission deadline for this call has passed".to_string(),
        ));
    }

    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::ValidationFailed("title must not be empty".to_string()));
    }

    let mut collaborators: Vec<UserId> = Vec::new();
    for raw in &req.collaborators {
        let id = UserId::from(raw.as_str());
        if !id.is_path_safe() {
            return Err(ApiError::ValidationFailed(format!(
                "invalid collaborator id: {}",
                raw
            )));
        }
        if id != identity.id && !collaborators.contains(&id) {
            collaborators.push(id);
        }
    }

    let mut proposal = Proposal::new(call.id.clone(), Investigator::from(&identity), title);
    proposal.abstract_text = req.abstract_text;
    proposal.narrative = req.narrative;
    proposal.requested_amount = req.requested_amount;
    proposal.collaborators = collaborators;

    state.proposals.create_proposal(&proposal)?;
    info!(proposal_id = %proposal.id, call_id = %call.id, pi = %identity.id, "Proposal drafted");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: proposal.id.as_str().to_string(),
            message: "proposal created".to_string(),
        }),
    ))
}

/// Loads a proposal the requester takes part in, with its call.
///
/// Proposals of other users resolve to NotFound so their existence is not
/// revealed.
fn load_own(state: &AppState, identity: &Identity, id: &str) -> Result<(Proposal, Call)> {
    let proposal = state
        .proposals
        .find_proposal(&ProposalId::from(id))?
        .filter(|p| p.is_participant(&identity.id))
        .ok_or_else(|| ApiError::NotFound(format!("proposal not found: {}", id)))?;
    let call = state.calls.load_call(&proposal.call_id)?;
    Ok((proposal, call))
}

/// POST /api/proposals/:id/submit - Submit a draft.
pub async fn submit_proposal(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let (mut proposal, call) = load_own(&state, &identity, &id)?;
    let now = state.now();

    check_proposal_submission(&identity, &proposal, &call, now)?;

    proposal.submit(now);
    state.proposals.save_proposal(&proposal)?;
    info!(proposal_id = %proposal.id, call_id = %call.id, "Proposal submitted");

    Ok(Json(SuccessResponse {
        message: "proposal submitted".to_string(),
    }))
}

/// POST /api/proposals/:id/withdraw - Withdraw a draft or submitted proposal.
pub async fn withdraw_proposal(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let (mut proposal, call) = load_own(&state, &identity, &id)?;

    check_withdrawal(&identity, &proposal, &call, state.now())?;

    proposal.status = ProposalStatus::Withdrawn;
    state.proposals.save_proposal(&proposal)?;
    info!(proposal_id = %proposal.id, "Proposal withdrawn");

    Ok(Json(SuccessResponse {
        message: "proposal withdrawn".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, make_test_state, ocean_call, other, pi};

    fn request(title: &str) -> CreateProposalRequest {
        CreateProposalRequest {
            title: title.to_string(),
            abstract_text: "Abstract".to_string(),
            narrative: "Narrative".to_string(),
            requested_amount: 1000,
            collaborators: vec!["user-other".to_string(), "user-pi".to_string()],
        }
    }

    async fn draft(state: &AppState) -> ProposalId {
        let (_, Json(created)) = create_proposal(
            State(state.clone()),
            Authenticated(pi()),
            Path("call-ocean".to_string()),
            ApiJson(request("Kelp")),
        )
        .await
        .unwrap();
        ProposalId::from(created.id)
    }

    #[tokio::test]
    async fn test_create_proposal_sets_pi() {
        let (state, _) = make_test_state(at(2025, 3, 1));
        state.calls.save_call(&ocean_call()).unwrap();

        let id = draft(&state).await;
        let stored = state.proposals.load_proposal(&id).unwrap();

        assert_eq!(stored.pi.id, pi().id);
        assert_eq!(stored.status, ProposalStatus::Draft);
        // The PI is never listed as their own collaborator
        assert_eq!(stored.collaborators, vec![other().id]);
    }

    #[tokio::test]
    async fn test_create_proposal_after_deadline() {
        let (state, _) = make_test_state(at(2025, 6, 2));
        state.calls.save_call(&ocean_call()).unwrap();

        let result = create_proposal(
            State(state),
            Authenticated(pi()),
            Path("call-ocean".to_string()),
            ApiJson(request("Late")),
        )
        .await;
        assert!(matches!(result, Err(ApiError::DeadlinePassed(_))));
    }

    #[tokio::test]
    async fn test_submit_and_withdraw() {
        let (state, _) = make_test_state(at(2025, 3, 1));
        state.calls.save_call(&ocean_call()).unwrap();
        let id = draft(&state).await;

        submit_proposal(
            State(state.clone()),
            Authenticated(pi()),
            Path(id.to_string()),
        )
        .await
        .unwrap();
        let stored = state.proposals.load_proposal(&id).unwrap();
        assert_eq!(stored.status, ProposalStatus::Submitted);
        assert_eq!(stored.submitted_at, Some(at(2025, 3, 1)));

        // A second submit is rejected
        let result = submit_proposal(
            State(state.clone()),
            Authenticated(pi()),
            Path(id.to_string()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));

        withdraw_proposal(
            State(state.clone()),
            Authenticated(pi()),
            Path(id.to_string()),
        )
        .await
        .unwrap();
        let stored = state.proposals.load_proposal(&id).unwrap();
        assert_eq!(stored.status, ProposalStatus::Withdrawn);
    }

    #[tokio::test]
    async fn test_collaborator_cannot_submit() {
        let (state, _) = make_test_state(at(2025, 3, 1));
        state.calls.save_call(&ocean_call()).unwrap();
        let id = draft(&state).await;

        let result = submit_proposal(
            State(state),
            Authenticated(other()),
            Path(id.to_string()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::InsufficientPermissions(_))));
    }

    #[tokio::test]
    async fn test_submit_after_deadline() {
        let (state, clock) = make_test_state(at(2025, 3, 1));
        state.calls.save_call(&ocean_call()).unwrap();
        let id = draft(&state).await;

        clock.set(at(2025, 6, 2));
        let result = submit_proposal(
            State(state),
            Authenticated(pi()),
            Path(id.to_string()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::DeadlinePassed(_))));
    }
}
