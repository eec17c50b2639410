//! Review submission handler.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use grantdesk_core::{check_review_submission, dispatch_detached, Notification, ReviewAttempt};
use grantdesk_models::{
    AssignmentId, AssignmentStatus, CriterionScore, ProposalId, Review, ReviewBuilder,
    MAX_SCORE, MIN_SCORE,
};
use grantdesk_persistence::PersistenceError;

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, Authenticated};
use crate::state::AppState;
use crate::types::{CreatedResponse, SubmitReviewRequest};

fn validate_score(label: &str, score: u8) -> Result<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ApiError::ValidationFailed(format!(
            "{} must be between {} and {}, got {}",
            label, MIN_SCORE, MAX_SCORE, score
        )));
    }
    Ok(())
}

fn validate_criteria(scores: &[CriterionScore]) -> Result<()> {
    for entry in scores {
        if entry.criterion.trim().is_empty() {
            return Err(ApiError::ValidationFailed(
                "criterion name must not be empty".to_string(),
            ));
        }
        validate_score(&entry.criterion, entry.score)?;
    }
    Ok(())
}

/// Writes the review into its slot. A slot filled since the gate ran means a
/// concurrent submission won.
fn store_review(state: &AppState, review: &Review) -> Result<()> {
    match state.reviews.create_review(review) {
        Ok(()) => Ok(()),
        Err(PersistenceError::AlreadyExists { .. }) => Err(ApiError::DuplicateSubmission),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/reviews - Submit a review for an assignment.
///
/// Preconditions are checked in a fixed order and the first failure is
/// returned. The review and its criterion scores are written in one atomic
/// create, so a concurrent duplicate loses with `DuplicateSubmission`.
pub async fn submit_review(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    ApiJson(req): ApiJson<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let proposal_id = ProposalId::from(req.proposal_id.as_str());
    let assignment_id = AssignmentId::from(req.assignment_id.as_str());

    // Unsafe ids name nothing; let the gate report them in order
    let proposal = if proposal_id.is_path_safe() {
        state.proposals.find_proposal(&proposal_id)?
    } else {
        None
    };
    let call = match &proposal {
        Some(p) => state.calls.find_call(&p.call_id)?,
        None => None,
    };
    let assignment = match &proposal {
        Some(_) if identity.id.is_path_safe() => {
            state.reviews.find_assignment(&proposal_id, &identity.id)?
        }
        _ => None,
    };
    let review_exists = match &assignment {
        Some(_) => state
            .reviews
            .find_review(&proposal_id, &identity.id)?
            .is_some(),
        None => false,
    };

    let now = state.now();
    let attempt = ReviewAttempt {
        requester: &identity,
        proposal_id: &proposal_id,
        assignment_id: &assignment_id,
        assignment: assignment.as_ref(),
        call: call.as_ref(),
        review_exists,
        now,
    };
    let assignment = check_review_submission(&attempt)?;

    validate_score("overall_score", req.overall_score)?;
    validate_criteria(&req.scores)?;

    let review = ReviewBuilder::for_assignment(assignment)
        .overall_score(req.overall_score)
        .summary(req.summary)
        .strengths(req.strengths)
        .weaknesses(req.weaknesses)
        .scores(req.scores)
        .complete(req.is_complete)
        .confidential(req.is_confidential)
        .submitted_at(now)
        .build();

    store_review(&state, &review)?;
    info!(
        review_id = %review.id,
        proposal_id = %review.proposal_id,
        reviewer_id = %review.reviewer_id,
        complete = review.is_complete,
        "Review submitted"
    );

    if review.is_complete {
        let mut completed = assignment.clone();
        completed.status = AssignmentStatus::Completed;
        if let Err(e) = state.reviews.save_assignment(&completed) {
            warn!(assignment_id = %completed.id, error = %e, "Failed to mark assignment completed");
        }
    }

    if let Some(proposal) = &proposal {
        dispatch_detached(
            state.notifier.clone(),
            Notification::review_received(&proposal.pi.email, &proposal.title),
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: review.id.as_str().to_string(),
            message: "review submitted".to_string(),
        }),
    ))
}
