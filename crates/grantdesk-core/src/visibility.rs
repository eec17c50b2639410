//! Visibility resolution for calls, proposals, and reviews.
//!
//! Rules, applied in order:
//!
//! 1. Before the full-proposal deadline no proposal is listed, whatever the
//!    tier. Authors reach their own work through [`author_view`] instead.
//! 2. After the deadline, while results are unreleased, proposals are listed
//!    to admins and reviewers (and to authors for their own proposal) with
//!    an empty review list.
//! 3. Once results are public every tier sees every listed proposal, with
//!    reviews filtered to complete and non-confidential ones.
//! 4. Only admins see the `review_visibility` policy and assignment metadata.
//!
//! Everything here is a pure function of its inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use grantdesk_models::{
    AssignmentId, AssignmentStatus, Call, CallId, CallStatus, CriterionScore, Identity, Proposal,
    ProposalId, ProposalStatus, Review, ReviewAssignment, ReviewId, ReviewVisibility, UserId,
};

use crate::classifier::{classify, Tier};
use crate::clock::DeadlineGates;

/// A proposal together with the records nested under it.
#[derive(Debug, Clone)]
pub struct ProposalRecord {
    pub proposal: Proposal,
    pub reviews: Vec<Review>,
    pub assignments: Vec<ReviewAssignment>,
}

impl ProposalRecord {
    pub fn new(proposal: Proposal) -> Self {
        Self {
            proposal,
            reviews: Vec::new(),
            assignments: Vec::new(),
        }
    }
}

/// Resolved call payload.
#[derive(Debug, Clone, Serialize)]
pub struct CallView {
    pub id: CallId,
    pub title: String,
    pub description: String,
    pub status: CallStatus,
    pub is_public: bool,
    pub results_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_proposal_deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_deadline: Option<DateTime<Utc>>,
    pub submission_deadline_over: bool,
    pub review_deadline_over: bool,
    /// Admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_visibility: Option<ReviewVisibility>,
    pub viewer_tier: Tier,
    pub proposals: Vec<ProposalView>,
}

/// Resolved proposal payload.
///
/// Optional fields are absent for tiers not entitled to them.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalView {
    pub id: ProposalId,
    pub title: String,
    pub abstract_text: String,
    pub status: ProposalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    pub pi_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pi_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<UserId>>,
    pub reviews: Vec<ReviewView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<AssignmentView>>,
}

/// Released review content.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: ReviewId,
    pub overall_score: u8,
    pub summary: String,
    pub strengths: String,
    pub weaknesses: String,
    pub scores: Vec<CriterionScore>,
    pub submitted_at: DateTime<Utc>,
    /// Admin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<UserId>,
}

/// Assignment metadata shown to admins.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentView {
    pub id: AssignmentId,
    pub reviewer_id: UserId,
    pub status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl From<&ReviewAssignment> for AssignmentView {
    fn from(a: &ReviewAssignment) -> Self {
        Self {
            id: a.id.clone(),
            reviewer_id: a.reviewer_id.clone(),
            status: a.status,
            due_date: a.due_date,
        }
    }
}

/// Keeps only reviews that may be released: complete and not confidential.
///
/// Idempotent; filtering the output again changes nothing.
pub fn publishable_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Vec<&'a Review> {
    reviews.into_iter().filter(|r| r.is_publishable()).collect()
}

/// Returns true if the viewer may see the call at all.
///
/// Non-public calls exist only for admins.
pub fn can_view_call(call: &Call, viewer: Option<&Identity>) -> bool {
    call.is_public || classify(viewer, None) == Tier::Admin
}

fn is_listed(proposal: &Proposal, tier: Tier, results_public: bool) -> bool {
    match proposal.status {
        ProposalStatus::Draft => false,
        ProposalStatus::Withdrawn => tier == Tier::Admin,
        _ => results_public || tier >= Tier::Author,
    }
}

fn review_view(review: &Review, tier: Tier) -> ReviewView {
    ReviewView {
        id: review.id.clone(),
        overall_score: review.overall_score,
        summary: review.summary.clone(),
        strengths: review.strengths.clone(),
        weaknesses: review.weaknesses.clone(),
        scores: review.scores.clone(),
        submitted_at: review.submitted_at,
        reviewer_id: (tier == Tier::Admin).then(|| review.reviewer_id.clone()),
    }
}

fn proposal_view(record: &ProposalRecord, tier: Tier, results_public: bool) -> ProposalView {
    let p = &record.proposal;
    let full = tier > Tier::Public;

    let reviews = if results_public {
        publishable_reviews(&record.reviews)
            .into_iter()
            .map(|r| review_view(r, tier))
            .collect()
    } else {
        Vec::new()
    };

    ProposalView {
        id: p.id.clone(),
        title: p.title.clone(),
        abstract_text: p.abstract_text.clone(),
        status: p.status,
        submitted_at: p.submitted_at,
        pi_name: p.pi.name.clone(),
        pi_email: full.then(|| p.pi.email.clone()),
        narrative: full.then(|| p.narrative.clone()),
        requested_amount: full.then_some(p.requested_amount),
        collaborators: full.then(|| p.collaborators.clone()),
        reviews,
        assignments: (tier == Tier::Admin)
            .then(|| record.assignments.iter().map(AssignmentView::from).collect()),
    }
}

/// Resolves the call payload for `viewer` at `now`.
pub fn resolve_call(
    call: &Call,
    records: &[ProposalRecord],
    viewer: Option<&Identity>,
    now: DateTime<Utc>,
) -> CallView {
    let gates = DeadlineGates::evaluate(call, now);
    let viewer_tier = classify(viewer, None);

    let proposals = if gates.submission_deadline_over {
        records
            .iter()
            .filter_map(|record| {
                let tier = classify(viewer, Some(&record.proposal));
                is_listed(&record.proposal, tier, call.results_public)
                    .then(|| proposal_view(record, tier, call.results_public))
            })
            .collect()
    } else {
        Vec::new()
    };

    CallView {
        id: call.id.clone(),
        title: call.title.clone(),
        description: call.description.clone(),
        status: call.status,
        is_public: call.is_public,
        results_public: call.results_public,
        open_date: call.open_date,
        close_date: call.close_date,
        full_proposal_deadline: call.full_proposal_deadline,
        review_deadline: call.review_deadline,
        submission_deadline_over: gates.submission_deadline_over,
        review_deadline_over: gates.review_deadline_over,
        review_visibility: (viewer_tier == Tier::Admin).then_some(call.review_visibility),
        viewer_tier,
        proposals,
    }
}

/// The author's own view of a proposal, independent of the deadline.
///
/// Authors always see their full proposal; reviews appear only once the
/// call's results are public, under the same release filter as everyone
/// else.
pub fn author_view(call: &Call, record: &ProposalRecord) -> ProposalView {
    let mut view = proposal_view(record, Tier::Author, call.results_public);
    view.assignments = None;
    view
}
