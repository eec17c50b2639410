//! Handlers scoped to the requester's own records.

use axum::{extract::State, Json};
use tracing::warn;

use grantdesk_core::author_view;

use crate::error::Result;
use crate::extract::Authenticated;
use crate::state::AppState;
use crate::types::{AssignmentListResponse, AssignmentSummary, MyProposalsResponse};

/// GET /api/me/proposals - Proposals the requester leads or collaborates on.
///
/// Authors see their own proposals at any time, including before the
/// submission deadline.
pub async fn my_proposals(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<MyProposalsResponse>> {
    let mut proposals = Vec::new();

    for proposal in state.proposals.list_for_participant(&identity.id)? {
        let Some(call) = state.calls.find_call(&proposal.call_id)? else {
            warn!(proposal_id = %proposal.id, call_id = %proposal.call_id, "Proposal references missing call");
            continue;
        };
        let record = state.load_record(proposal)?;
        proposals.push(author_view(&call, &record));
    }

    let total = proposals.len();
    Ok(Json(MyProposalsResponse { proposals, total }))
}

/// GET /api/me/assignments - The requester's review assignments.
pub async fn my_assignments(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<AssignmentListResponse>> {
    let mut assignments = Vec::new();

    for assignment in state.reviews.list_assignments_for_reviewer(&identity.id)? {
        let title = state
            .proposals
            .find_proposal(&assignment.proposal_id)?
            .map(|p| p.title)
            .unwrap_or_default();
        let submitted = state
            .reviews
            .find_review(&assignment.proposal_id, &identity.id)?
            .is_some();
        assignments.push(AssignmentSummary::new(&assignment, &title, submitted));
    }

    let total = assignments.len();
    Ok(Json(AssignmentListResponse { assignments, total }))
}
