//! Administrative handlers: call setup, result release, reviewer assignment.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use grantdesk_models::{
    CallBuilder, CallId, CallStatus, ProposalId, ProposalStatus, ReviewAssignment, UserId,
};

use crate::error::{ApiError, Result};
use crate::extract::{require_admin, ApiJson, Authenticated};
use crate::state::AppState;
use crate::types::{
    CreateAssignmentRequest, CreateCallRequest, CreatedResponse, StatusRequest, SuccessResponse,
    VisibilityRequest, VisibilityResponse,
};

fn check_release(is_public: bool, results_public: bool) -> Result<()> {
    if results_public && !is_public {
        return Err(ApiError::ValidationFailed(
            "results cannot be public on a non-public call".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/admin/calls - Create a call.
pub async fn create_call(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    ApiJson(req): ApiJson<CreateCallRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    require_admin(&identity)?;

    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::ValidationFailed("title must not be empty".to_string()));
    }
    check_release(req.is_public, req.results_public)?;

    if let (Some(open), Some(deadline)) = (req.open_date, req.full_proposal_deadline) {
        if deadline < open {
            return Err(ApiError::ValidationFailed(
                "full_proposal_deadline precedes open_date".to_string(),
            ));
        }
    }
    if let (Some(deadline), Some(review)) = (req.full_proposal_deadline, req.review_deadline) {
        if review < deadline {
            return Err(ApiError::ValidationFailed(
                "review_deadline precedes full_proposal_deadline".to_string(),
            ));
        }
    }

    let mut builder = CallBuilder::new(title)
        .description(req.description)
        .public(req.is_public)
        .results_public(req.results_public)
        .status(req.status.unwrap_or_default())
        .review_visibility(req.review_visibility.unwrap_or_default())
        .created_by(identity.id.clone());
    if let Some(at) = req.open_date {
        builder = builder.open_date(at);
    }
    if let Some(at) = req.close_date {
        builder = builder.close_date(at);
    }
    if let Some(at) = req.full_proposal_deadline {
        builder = builder.full_proposal_deadline(at);
    }
    if let Some(at) = req.review_deadline {
        builder = builder.review_deadline(at);
    }
    let call = builder.build();

    state.calls.save_call(&call)?;
    info!(call_id = %call.id, created_by = %identity.id, "Call created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: call.id.as_str().to_string(),
            message: "call created".to_string(),
        }),
    ))
}

/// PATCH /api/admin/calls/:id/visibility - Release or withhold results.
pub async fn set_visibility(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<VisibilityRequest>,
) -> Result<Json<VisibilityResponse>> {
    require_admin(&identity)?;

    let mut call = state.calls.load_call(&CallId::from(id.as_str()))?;
    let is_public = req.is_public.unwrap_or(call.is_public);
    check_release(is_public, req.results_public)?;

    call.is_public = is_public;
    call.results_public = req.results_public;
    state.calls.save_call(&call)?;
    info!(
        call_id = %call.id,
        is_public,
        results_public = call.results_public,
        changed_by = %identity.id,
        "Call visibility changed"
    );

    Ok(Json(VisibilityResponse {
        id: call.id.as_str().to_string(),
        is_public: call.is_public,
        results_public: call.results_public,
    }))
}

/// PATCH /api/admin/calls/:id/status - Move a call through its lifecycle.
pub async fn set_status(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> Result<Json<SuccessResponse>> {
    require_admin(&identity)?;

    let mut call = state.calls.load_call(&CallId::from(id.as_str()))?;
    if call.status == CallStatus::Archived && req.status != CallStatus::Archived {
        return Err(ApiError::ValidationFailed("call is archived".to_string()));
    }

    call.status = req.status;
    state.calls.save_call(&call)?;
    info!(call_id = %call.id, status = ?call.status, "Call status changed");

    Ok(Json(SuccessResponse {
        message: "call status updated".to_string(),
    }))
}

/// POST /api/admin/assignments - Assign a reviewer to a proposal.
pub async fn create_assignment(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    ApiJson(req): ApiJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    require_admin(&identity)?;

    let reviewer_id = UserId::from(req.reviewer_id.as_str());
    if !reviewer_id.is_path_safe() {
        return Err(ApiError::ValidationFailed(format!(
            "invalid reviewer id: {}",
            req.reviewer_id
        )));
    }

    let mut proposal = state
        .proposals
        .load_proposal(&ProposalId::from(req.proposal_id.as_str()))?;
    if !matches!(
        proposal.status,
        ProposalStatus::Submitted | ProposalStatus::UnderReview
    ) {
        return Err(ApiError::ValidationFailed(format!(
            "proposal is {:?} and cannot be reviewed",
            proposal.status
        )));
    }
    if proposal.is_participant(&reviewer_id) {
        return Err(ApiError::ValidationFailed(
            "reviewer is an author of this proposal".to_string(),
        ));
    }

    let assignment = ReviewAssignment::new(proposal.id.clone(), reviewer_id, req.due_date);
    state.reviews.create_assignment(&assignment)?;

    if proposal.status == ProposalStatus::Submitted {
        proposal.status = ProposalStatus::UnderReview;
        state.proposals.save_proposal(&proposal)?;
    }
    info!(
        assignment_id = %assignment.id,
        proposal_id = %assignment.proposal_id,
        reviewer_id = %assignment.reviewer_id,
        "Reviewer assigned"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: assignment.id.as_str().to_string(),
            message: "assignment created".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{admin, at, make_test_state, ocean_call, pi, reviewer, seed_ocean};
    use grantdesk_models::ReviewVisibility;

    fn call_request(title: &str) -> CreateCallRequest {
        CreateCallRequest {
            title: title.to_string(),
            description: String::new(),
            is_public: true,
            results_public: false,
            status: Some(CallStatus::Open),
            review_visibility: Some(ReviewVisibility::AuthorsOnly),
            open_date: Some(at(2025, 1, 1)),
            close_date: None,
            full_proposal_deadline: Some(at(2025, 6, 1)),
            review_deadline: Some(at(2025, 7, 15)),
        }
    }

    #[tokio::test]
    async fn test_create_call() {
        let (state, _) = make_test_state(at(2025, 1, 1));
        let (status, Json(created)) = create_call(
            State(state.clone()),
            Authenticated(admin()),
            ApiJson(call_request("Ocean")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let call = state.calls.load_call(&CallId::from(created.id.as_str())).unwrap();
        assert_eq!(call.title, "Ocean");
        assert_eq!(call.review_visibility, ReviewVisibility::AuthorsOnly);
        assert_eq!(call.created_by, Some(admin().id));
    }

    #[tokio::test]
    async fn test_create_call_requires_admin() {
        let (state, _) = make_test_state(at(2025, 1, 1));
        let result = create_call(
            State(state),
            Authenticated(reviewer()),
            ApiJson(call_request("Ocean")),
        )
        .await;
        assert!(matches!(result, Err(ApiError::InsufficientPermissions(_))));
    }

    #[tokio::test]
    async fn test_create_call_validation() {
        let (state, _) = make_test_state(at(2025, 1, 1));

        let result = create_call(
            State(state.clone()),
            Authenticated(admin()),
            ApiJson(call_request("   ")),
        )
        .await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));

        let mut req = call_request("Ocean");
        req.is_public = false;
        req.results_public = true;
        let result = create_call(State(state.clone()), Authenticated(admin()), ApiJson(req)).await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));

        let mut req = call_request("Ocean");
        req.review_deadline = Some(at(2025, 5, 1));
        let result = create_call(State(state), Authenticated(admin()), ApiJson(req)).await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_set_visibility() {
        let (state, _) = make_test_state(at(2025, 8, 1));
        state.calls.save_call(&ocean_call()).unwrap();

        let Json(resp) = set_visibility(
            State(state.clone()),
            Authenticated(admin()),
            Path("call-ocean".to_string()),
            ApiJson(VisibilityRequest {
                results_public: true,
                is_public: None,
            }),
        )
        .await
        .unwrap();
        assert!(resp.results_public);
        assert!(state.calls.load_call(&CallId::from("call-ocean")).unwrap().results_public);
    }

    #[tokio::test]
    async fn test_set_visibility_rejects_results_on_private_call() {
        let (state, _) = make_test_state(at(2025, 8, 1));
        state.calls.save_call(&ocean_call()).unwrap();

        let result = set_visibility(
            State(state.clone()),
            Authenticated(admin()),
            Path("call-ocean".to_string()),
            ApiJson(VisibilityRequest {
                results_public: true,
                is_public: Some(false),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));
        assert!(!state.calls.load_call(&CallId::from("call-ocean")).unwrap().results_public);
    }

    #[tokio::test]
    async fn test_set_status_archived_is_terminal() {
        let (state, _) = make_test_state(at(2025, 8, 1));
        state.calls.save_call(&ocean_call()).unwrap();

        set_status(
            State(state.clone()),
            Authenticated(admin()),
            Path("call-ocean".to_string()),
            ApiJson(StatusRequest {
                status: CallStatus::Archived,
            }),
        )
        .await
        .unwrap();

        let result = set_status(
            State(state),
            Authenticated(admin()),
            Path("call-ocean".to_string()),
            ApiJson(StatusRequest {
                status: CallStatus::Open,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_create_assignment_moves_proposal_under_review() {
        let (state, _) = make_test_state(at(2025, 6, 2));
        let (_, proposal, _) = seed_ocean(&state);

        let (status, _) = create_assignment(
            State(state.clone()),
            Authenticated(admin()),
            ApiJson(CreateAssignmentRequest {
                proposal_id: proposal.id.to_string(),
                reviewer_id: "user-rev2".to_string(),
                due_date: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let stored = state.proposals.load_proposal(&proposal.id).unwrap();
        assert_eq!(stored.status, ProposalStatus::UnderReview);
    }

    #[tokio::test]
    async fn test_duplicate_assignment_conflicts() {
        let (state, _) = make_test_state(at(2025, 6, 2));
        let (_, proposal, _) = seed_ocean(&state);

        let result = create_assignment(
            State(state),
            Authenticated(admin()),
            ApiJson(CreateAssignmentRequest {
                proposal_id: proposal.id.to_string(),
                reviewer_id: reviewer().id.to_string(),
                due_date: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_assignment_rejects_author_as_reviewer() {
        let (state, _) = make_test_state(at(2025, 6, 2));
        let (_, proposal, _) = seed_ocean(&state);

        let result = create_assignment(
            State(state),
            Authenticated(admin()),
            ApiJson(CreateAssignmentRequest {
                proposal_id: proposal.id.to_string(),
                reviewer_id: pi().id.to_string(),
                due_date: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::ValidationFailed(_))));
    }
}
