//! Request DTOs for the API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use grantdesk_models::{CallStatus, CriterionScore, ReviewVisibility};

/// Create call request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCallRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub results_public: bool,
    /// Initial status (defaults to DRAFT).
    pub status: Option<CallStatus>,
    pub review_visibility: Option<ReviewVisibility>,
    pub open_date: Option<DateTime<Utc>>,
    pub close_date: Option<DateTime<Utc>>,
    pub full_proposal_deadline: Option<DateTime<Utc>>,
    pub review_deadline: Option<DateTime<Utc>>,
}

/// Release or withhold results.
#[derive(Debug, Clone, Deserialize)]
pub struct VisibilityRequest {
    pub results_public: bool,
    /// Optionally change the call's own publicity in the same request.
    pub is_public: Option<bool>,
}

/// Change call status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub status: CallStatus,
}

/// Assign a reviewer to a proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub proposal_id: String,
    pub reviewer_id: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Create draft proposal request. The requester becomes the PI.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProposalRequest {
    pub title: String,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub requested_amount: u64,
    #[serde(default)]
    pub collaborators: Vec<String>,
}

/// Submit review request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReviewRequest {
    pub proposal_id: String,
    pub assignment_id: String,
    pub overall_score: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub scores: Vec<CriterionScore>,
    #[serde(default = "default_true")]
    pub is_complete: bool,
    #[serde(default)]
    pub is_confidential: bool,
}

fn default_true() -> bool {
    true
}
