//! Review assignment and review persistence.

use std::path::PathBuf;

use grantdesk_models::{ProposalId, Review, ReviewAssignment, UserId};

use crate::atomic::{
    atomic_create_json, atomic_write_json, list_subdirs, read_json_dir, read_json_optional,
};
use crate::error::{PersistenceError, Result};

/// Manages persistence of review assignments and reviews.
///
/// Both record kinds are keyed by (proposal, reviewer), which makes the
/// file path itself the unique constraint:
/// ```text
/// base_path/
/// ├── assignments/
/// │   └── {proposal_id}/
/// │       └── {reviewer_id}.json
/// └── reviews/
///     └── {proposal_id}/
///         └── {reviewer_id}.json
/// ```
#[derive(Debug, Clone)]
pub struct ReviewStore {
    base_path: PathBuf,
}

impl ReviewStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn slot_path(
        &self,
        kind: &str,
        proposal_id: &ProposalId,
        reviewer_id: &UserId,
    ) -> Result<PathBuf> {
        if !proposal_id.is_path_safe() || !reviewer_id.is_path_safe() {
            return Err(PersistenceError::InvalidId(format!(
                "invalid {} key: {}/{}",
                kind, proposal_id, reviewer_id
            )));
        }
        Ok(self
            .base_path
            .join(kind)
            .join(proposal_id.as_str())
            .join(format!("{}.json", reviewer_id)))
    }

    fn proposal_dir(&self, kind: &str, proposal_id: &ProposalId) -> Result<PathBuf> {
        if !proposal_id.is_path_safe() {
            return Err(PersistenceError::InvalidId(format!(
                "invalid proposal id: {}",
                proposal_id
            )));
        }
        Ok(self.base_path.join(kind).join(proposal_id.as_str()))
    }

    /// Inserts an assignment.
    ///
    /// Fails with [`PersistenceError::AlreadyExists`] if the reviewer is
    /// already assigned to the proposal.
    pub fn create_assignment(&self, assignment: &ReviewAssignment) -> Result<()> {
        let path = self.slot_path("assignments", &assignment.proposal_id, &assignment.reviewer_id)?;
        atomic_create_json(&path, assignment).map_err(|e| match e {
            PersistenceError::PathExists(_) => PersistenceError::AlreadyExists {
                kind: "assignment".to_string(),
                id: format!("{}/{}", assignment.proposal_id, assignment.reviewer_id),
            },
            other => other,
        })
    }

    /// Saves an updated assignment.
    pub fn save_assignment(&self, assignment: &ReviewAssignment) -> Result<()> {
        let path = self.slot_path("assignments", &assignment.proposal_id, &assignment.reviewer_id)?;
        atomic_write_json(&path, assignment)
    }

    /// Finds the assignment binding a reviewer to a proposal.
    pub fn find_assignment(
        &self,
        proposal_id: &ProposalId,
        reviewer_id: &UserId,
    ) -> Result<Option<ReviewAssignment>> {
        read_json_optional(&self.slot_path("assignments", proposal_id, reviewer_id)?)
    }

    /// Lists assignments for a proposal, oldest first.
    pub fn list_assignments(&self, proposal_id: &ProposalId) -> Result<Vec<ReviewAssignment>> {
        let mut items: Vec<ReviewAssignment> =
            read_json_dir(&self.proposal_dir("assignments", proposal_id)?)?;
        items.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(items)
    }

    /// Lists every assignment held by a reviewer, across all proposals.
    pub fn list_assignments_for_reviewer(
        &self,
        reviewer_id: &UserId,
    ) -> Result<Vec<ReviewAssignment>> {
        let mut items = Vec::new();
        for proposal in list_subdirs(&self.base_path.join("assignments"))? {
            let proposal_id = ProposalId::from(proposal);
            if let Some(assignment) = self.find_assignment(&proposal_id, reviewer_id)? {
                items.push(assignment);
            }
        }
        items.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(items)
    }

    /// Inserts a review together with its criterion scores.
    ///
    /// The whole record is written in one atomic create; concurrent
    /// submissions for the same (proposal, reviewer) pair resolve to a single
    /// winner and the rest fail with [`PersistenceError::AlreadyExists`].
    pub fn create_review(&self, review: &Review) -> Result<()> {
        let path = self.slot_path("reviews", &review.proposal_id, &review.reviewer_id)?;
        atomic_create_json(&path, review).map_err(|e| match e {
            PersistenceError::PathExists(_) => PersistenceError::AlreadyExists {
                kind: "review".to_string(),
                id: format!("{}/{}", review.proposal_id, review.reviewer_id),
            },
            other => other,
        })
    }

    pub fn find_review(
        &self,
        proposal_id: &ProposalId,
        reviewer_id: &UserId,
    ) -> Result<Option<Review>> {
        read_json_optional(&self.slot_path("reviews", proposal_id, reviewer_id)?)
    }

    /// Lists reviews for a proposal, oldest first.
    pub fn list_reviews(&self, proposal_id: &ProposalId) -> Result<Vec<Review>> {
        let mut items: Vec<Review> = read_json_dir(&self.proposal_dir("reviews", proposal_id)?)?;
        items.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(items)
    }
}
