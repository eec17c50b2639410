//! Response DTOs for the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use grantdesk_core::ProposalView;
use grantdesk_models::{AssignmentStatus, Call, CallStatus, ReviewAssignment};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// The instant deadline gates are evaluated against.
    pub server_time: DateTime<Utc>,
}

/// Created resource response.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    /// ID of the created resource.
    pub id: String,
    pub message: String,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Call list response.
#[derive(Debug, Clone, Serialize)]
pub struct CallListResponse {
    pub calls: Vec<CallSummary>,
    /// Total count.
    pub total: usize,
}

/// Call summary for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct CallSummary {
    pub id: String,
    pub title: String,
    pub status: CallStatus,
    pub is_public: bool,
    pub results_public: bool,
    pub full_proposal_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Call> for CallSummary {
    fn from(call: &Call) -> Self {
        Self {
            id: call.id.as_str().to_string(),
            title: call.title.clone(),
            status: call.status,
            is_public: call.is_public,
            results_public: call.results_public,
            full_proposal_deadline: call.full_proposal_deadline,
            created_at: call.created_at,
        }
    }
}

/// Result of a visibility change.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResponse {
    pub id: String,
    pub is_public: bool,
    pub results_public: bool,
}

/// The requester's own proposals.
#[derive(Debug, Clone, Serialize)]
pub struct MyProposalsResponse {
    pub proposals: Vec<ProposalView>,
    pub total: usize,
}

/// The requester's review assignments.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentListResponse {
    pub assignments: Vec<AssignmentSummary>,
    pub total: usize,
}

/// Assignment summary for the reviewer's own list.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSummary {
    pub id: String,
    pub proposal_id: String,
    pub proposal_title: String,
    pub status: AssignmentStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub review_submitted: bool,
}

impl AssignmentSummary {
    pub fn new(assignment: &ReviewAssignment, proposal_title: &str, review_submitted: bool) -> Self {
        Self {
            id: assignment.id.as_str().to_string(),
            proposal_id: assignment.proposal_id.as_str().to_string(),
            proposal_title: proposal_title.to_string(),
            status: assignment.status,
            due_date: assignment.due_date,
            review_submitted,
        }
    }
}
