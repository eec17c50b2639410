//! Public call handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use grantdesk_core::{can_view_call, resolve_call, CallView, DeadlineGates};
use grantdesk_models::CallId;

use crate::error::{ApiError, Result};
use crate::extract::MaybeAuthenticated;
use crate::state::AppState;
use crate::types::{CallListResponse, CallSummary};

/// GET /api/calls - List calls visible to the viewer.
pub async fn list_calls(
    State(state): State<AppState>,
    MaybeAuthenticated(viewer): MaybeAuthenticated,
) -> Result<Json<CallListResponse>> {
    let calls: Vec<CallSummary> = state
        .calls
        .list_calls()?
        .iter()
        .filter(|call| can_view_call(call, viewer.as_ref()))
        .map(CallSummary::from)
        .collect();
    let total = calls.len();

    Ok(Json(CallListResponse { calls, total }))
}

/// GET /api/calls/:id - Visibility-resolved call with its proposals.
pub async fn get_call(
    State(state): State<AppState>,
    MaybeAuthenticated(viewer): MaybeAuthenticated,
    Path(id): Path<String>,
) -> Result<Json<CallView>> {
    let call_id = CallId::from(id.as_str());
    let call = state
        .calls
        .find_call(&call_id)?
        .filter(|call| can_view_call(call, viewer.as_ref()))
        .ok_or_else(|| ApiError::NotFound(format!("call not found: {}", id)))?;

    let now = state.now();
    // Before the deadline nothing is listed, so skip loading records
    let records = if DeadlineGates::evaluate(&call, now).submission_deadline_over {
        state.load_call_records(&call.id)?
    } else {
        Vec::new()
    };

    Ok(Json(resolve_call(&call, &records, viewer.as_ref(), now)))
}
