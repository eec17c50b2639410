//! Builder patterns for complex types.

use chrono::{DateTime, Utc};

use crate::call::{Call, CallStatus, ReviewVisibility};
use crate::ids::{AssignmentId, CallId, ProposalId, ReviewId, UserId};
use crate::review::{CriterionScore, Review, ReviewAssignment};

/// Builder for creating Call instances with a fluent API.
#[derive(Debug, Clone)]
pub struct CallBuilder {
    call: Call,
}

impl CallBuilder {
    /// Creates a new CallBuilder with the required title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            call: Call::new(title),
        }
    }

    /// Overrides the generated ID.
    pub fn id(mut self, id: impl Into<CallId>) -> Self {
        self.call.id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.call.description = description.into();
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.call.is_public = is_public;
        self
    }

    pub fn results_public(mut self, results_public: bool) -> Self {
        self.call.results_public = results_public;
        self
    }

    pub fn status(mut self, status: CallStatus) -> Self {
        self.call.status = status;
        self
    }

    pub fn review_visibility(mut self, visibility: ReviewVisibility) -> Self {
        self.call.review_visibility = visibility;
        self
    }

    pub fn open_date(mut self, at: DateTime<Utc>) -> Self {
        self.call.open_date = Some(at);
        self
    }

    pub fn close_date(mut self, at: DateTime<Utc>) -> Self {
        self.call.close_date = Some(at);
        self
    }

    pub fn full_proposal_deadline(mut self, at: DateTime<Utc>) -> Self {
        self.call.full_proposal_deadline = Some(at);
        self
    }

    pub fn review_deadline(mut self, at: DateTime<Utc>) -> Self {
        self.call.review_deadline = Some(at);
        self
    }

    pub fn created_by(mut self, user: impl Into<UserId>) -> Self {
        self.call.created_by = Some(user.into());
        self
    }

    /// Builds the Call.
    pub fn build(self) -> Call {
        self.call
    }
}

/// Builder for Review instances.
///
/// Starts from an assignment so the review is always bound to the right
/// (proposal, reviewer) pair. Defaults to a complete, non-confidential review
/// with a neutral score.
#[derive(Debug, Clone)]
pub struct ReviewBuilder {
    assignment_id: AssignmentId,
    proposal_id: ProposalId,
    reviewer_id: UserId,
    overall_score: u8,
    summary: String,
    strengths: String,
    weaknesses: String,
    scores: Vec<CriterionScore>,
    is_complete: bool,
    is_confidential: bool,
    submitted_at: Option<DateTime<Utc>>,
}

impl ReviewBuilder {
    /// Creates a builder bound to an assignment.
    pub fn for_assignment(assignment: &ReviewAssignment) -> Self {
        Self {
            assignment_id: assignment.id.clone(),
            proposal_id: assignment.proposal_id.clone(),
            reviewer_id: assignment.reviewer_id.clone(),
            overall_score: 5,
            summary: String::new(),
            strengths: String::new(),
            weaknesses: String::new(),
            scores: Vec::new(),
            is_complete: true,
            is_confidential: false,
            submitted_at: None,
        }
    }

    pub fn overall_score(mut self, score: u8) -> Self {
        self.overall_score = score;
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn strengths(mut self, strengths: impl Into<String>) -> Self {
        self.strengths = strengths.into();
        self
    }

    pub fn weaknesses(mut self, weaknesses: impl Into<String>) -> Self {
        self.weaknesses = weaknesses.into();
        self
    }

    /// Adds a single criterion score.
    pub fn score(mut self, criterion: impl Into<String>, score: u8) -> Self {
        self.scores.push(CriterionScore {
            criterion: criterion.into(),
            score,
            comment: None,
        });
        self
    }

    pub fn scores(mut self, scores: Vec<CriterionScore>) -> Self {
        self.scores = scores;
        self
    }

    pub fn complete(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }

    pub fn confidential(mut self, is_confidential: bool) -> Self {
        self.is_confidential = is_confidential;
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = Some(at);
        self
    }

    /// Builds the Review.
    pub fn build(self) -> Review {
        Review {
            id: ReviewId::new(),
            assignment_id: self.assignment_id,
            proposal_id: self.proposal_id,
            reviewer_id: self.reviewer_id,
            overall_score: self.overall_score,
            summary: self.summary,
            strengths: self.strengths,
            weaknesses: self.weaknesses,
            scores: self.scores,
            is_complete: self.is_complete,
            is_confidential: self.is_confidential,
            submitted_at: self.submitted_at.unwrap_or_else(Utc::now),
        }
    }
}
