//! Proposal store.

use std::path::PathBuf;

use grantdesk_models::{CallId, Proposal, ProposalId, UserId};

use crate::atomic::{atomic_create_json, atomic_write_json, read_json_dir, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Manages persistence of proposals.
///
/// ```text
/// base_path/
/// └── proposals/
///     ├── prop-abc123.json
///     └── prop-def456.json
/// ```
#[derive(Debug, Clone)]
pub struct ProposalStore {
    base_path: PathBuf,
}

impl ProposalStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn proposals_dir(&self) -> PathBuf {
        self.base_path.join("proposals")
    }

    fn proposal_path(&self, id: &ProposalId) -> Result<PathBuf> {
        if !id.is_path_safe() {
            return Err(PersistenceError::InvalidId(format!(
                "invalid proposal id: {}",
                id
            )));
        }
        Ok(self.proposals_dir().join(format!("{}.json", id)))
    }

    /// Inserts a new proposal. Fails if the ID is already taken.
    pub fn create_proposal(&self, proposal: &Proposal) -> Result<()> {
        atomic_create_json(&self.proposal_path(&proposal.id)?, proposal).map_err(|e| match e {
            PersistenceError::PathExists(_) => PersistenceError::AlreadyExists {
                kind: "proposal".to_string(),
                id: proposal.id.to_string(),
            },
            other => other,
        })
    }

    /// Saves an updated proposal.
    pub fn save_proposal(&self, proposal: &Proposal) -> Result<()> {
        atomic_write_json(&self.proposal_path(&proposal.id)?, proposal)
    }

    pub fn find_proposal(&self, id: &ProposalId) -> Result<Option<Proposal>> {
        read_json_optional(&self.proposal_path(id)?)
    }

    pub fn load_proposal(&self, id: &ProposalId) -> Result<Proposal> {
        self.find_proposal(id)?
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "proposal".to_string(),
                id: id.to_string(),
            })
    }

    /// Lists every proposal, oldest first.
    fn list_all(&self) -> Result<Vec<Proposal>> {
        let mut proposals: Vec<Proposal> = read_json_dir(&self.proposals_dir())?;
        proposals.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(proposals)
    }

    /// Lists the proposals of a call, oldest first.
    pub fn list_for_call(&self, call_id: &CallId) -> Result<Vec<Proposal>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.call_id == *call_id)
            .collect())
    }

    /// Lists proposals where the user is PI or collaborator.
    pub fn list_for_participant(&self, user_id: &UserId) -> Result<Vec<Proposal>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.is_participant(user_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grantdesk_models::{Investigator, ProposalStatus};
    use tempfile::tempdir;

    fn pi(id: &str) -> Investigator {
        Investigator {
            id: UserId::from(id),
            name: id.to_string(),
            email: format!("{}@example.org", id),
        }
    }

    #[test]
    fn test_create_and_load() {
        let dir = tempdir().unwrap();
        let store = ProposalStore::new(dir.path());

        let proposal = Proposal::new("call-1", pi("user-a"), "Coral reefs");
        store.create_proposal(&proposal).unwrap();

        assert_eq!(store.load_proposal(&proposal.id).unwrap(), proposal);
    }

    #[test]
    fn test_create_twice_conflicts() {
        let dir = tempdir().unwrap();
        let store = ProposalStore::new(dir.path());

        let proposal = Proposal::new("call-1", pi("user-a"), "Coral reefs");
        store.create_proposal(&proposal).unwrap();

        let result = store.create_proposal(&proposal);
        assert!(matches!(result, Err(PersistenceError::AlreadyExists { .. })));
    }

    #[test]
    fn test_save_updates_status() {
        let dir = tempdir().unwrap();
        let store = ProposalStore::new(dir.path());

        let mut proposal = Proposal::new("call-1", pi("user-a"), "Coral reefs");
        store.create_proposal(&proposal).unwrap();
        proposal.status = ProposalStatus::Withdrawn;
        store.save_proposal(&proposal).unwrap();

        let loaded = store.load_proposal(&proposal.id).unwrap();
        assert_eq!(loaded.status, ProposalStatus::Withdrawn);
    }

    #[test]
    fn test_list_filters() {
        let dir = tempdir().unwrap();
        let store = ProposalStore::new(dir.path());

        let mut shared = Proposal::new("call-1", pi("user-a"), "One");
        shared.collaborators.push(UserId::from("user-b"));
        store.create_proposal(&shared).unwrap();
        store
            .create_proposal(&Proposal::new("call-2", pi("user-b"), "Two"))
            .unwrap();
        store
            .create_proposal(&Proposal::new("call-1", pi("user-c"), "Three"))
            .unwrap();

        assert_eq!(store.list_for_call(&CallId::from("call-1")).unwrap().len(), 2);
        assert_eq!(
            store
                .list_for_participant(&UserId::from("user-b"))
                .unwrap()
                .len(),
            2
        );
        assert!(store
            .list_for_participant(&UserId::from("user-z"))
            .unwrap()
            .is_empty());
    }
}
