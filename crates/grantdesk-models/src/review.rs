//! Review assignments and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AssignmentId, ProposalId, ReviewId, UserId};

/// Lowest score a reviewer may give.
pub const MIN_SCORE: u8 = 1;

/// Highest score a reviewer may give.
pub const MAX_SCORE: u8 = 10;

/// State of a review assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Completed,
}

/// Links one reviewer to one proposal.
///
/// At most one assignment exists per (proposal, reviewer) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAssignment {
    pub id: AssignmentId,
    pub proposal_id: ProposalId,
    pub reviewer_id: UserId,
    pub assigned_at: DateTime<Utc>,

    /// Reviewer-specific due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: AssignmentStatus,
}

impl ReviewAssignment {
    /// Creates a pending assignment.
    pub fn new(
        proposal_id: impl Into<ProposalId>,
        reviewer_id: impl Into<UserId>,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: AssignmentId::new(),
            proposal_id: proposal_id.into(),
            reviewer_id: reviewer_id.into(),
            assigned_at: Utc::now(),
            due_date,
            status: AssignmentStatus::Pending,
        }
    }
}

/// A score against one evaluation criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A reviewer's assessment of a proposal.
///
/// The per-criterion scores are stored inside the review record, so a review
/// and its scores are always written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub assignment_id: AssignmentId,
    pub proposal_id: ProposalId,
    pub reviewer_id: UserId,
    pub overall_score: u8,

    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,

    #[serde(default)]
    pub scores: Vec<CriterionScore>,

    pub is_complete: bool,

    /// Confidential reviews are never released publicly.
    #[serde(default)]
    pub is_confidential: bool,

    pub submitted_at: DateTime<Utc>,
}

impl Review {
    /// Returns true if this review may appear in released results.
    pub fn is_publishable(&self) -> bool {
        self.is_complete && !self.is_confidential
    }
}
