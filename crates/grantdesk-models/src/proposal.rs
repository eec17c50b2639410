//! Proposal types for Grantdesk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CallId, ProposalId, UserId};
use crate::user::Identity;

/// Status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    /// Being written; invisible to everyone but its authors.
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    /// Pulled by the principal investigator.
    Withdrawn,
}

/// The principal investigator on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigator {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&Identity> for Investigator {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// A proposal submitted to a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique identifier for the proposal.
    pub id: ProposalId,

    /// Call this proposal belongs to.
    pub call_id: CallId,

    /// Principal investigator.
    pub pi: Investigator,

    /// Co-investigators with author access.
    #[serde(default)]
    pub collaborators: Vec<UserId>,

    pub title: String,

    #[serde(default)]
    pub abstract_text: String,

    /// Full project narrative.
    #[serde(default)]
    pub narrative: String,

    /// Requested funding, in minor currency units.
    #[serde(default)]
    pub requested_amount: u64,

    pub status: ProposalStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Proposal {
    /// Creates a new draft proposal owned by `pi`.
    pub fn new(call_id: impl Into<CallId>, pi: Investigator, title: impl Into<String>) -> Self {
        Self {
            id: ProposalId::new(),
            call_id: call_id.into(),
            pi,
            collaborators: Vec::new(),
            title: title.into(),
            abstract_text: String::new(),
            narrative: String::new(),
            requested_amount: 0,
            status: ProposalStatus::Draft,
            submitted_at: None,
            created_at: Utc::now(),
        }
    }

    /// Returns true if the user is the PI or a collaborator.
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.pi.id == *user_id || self.collaborators.contains(user_id)
    }

    /// Marks the proposal submitted at `now`.
    pub fn submit(&mut self, now: DateTime<Utc>) {
        self.status = ProposalStatus::Submitted;
        self.submitted_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pi() -> Investigator {
        Investigator {
            id: UserId::from("user-pi"),
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
        }
    }

    #[test]
    fn test_participants() {
        let mut proposal = Proposal::new("call-1", pi(), "Tidal energy");
        proposal.collaborators.push(UserId::from("user-co"));

        assert!(proposal.is_participant(&UserId::from("user-pi")));
        assert!(proposal.is_participant(&UserId::from("user-co")));
        assert!(!proposal.is_participant(&UserId::from("user-other")));
    }

    #[test]
    fn test_submit_sets_timestamp() {
        let mut proposal = Proposal::new("call-1", pi(), "Tidal energy");
        assert_eq!(proposal.status, ProposalStatus::Draft);

        let now = Utc::now();
        proposal.submit(now);
        assert_eq!(proposal.status, ProposalStatus::Submitted);
        assert_eq!(proposal.submitted_at, Some(now));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ProposalStatus::UnderReview).unwrap();
        assert_eq!(json, "\"UNDER_REVIEW\"");
    }
}
