//! Maps a requester to a permission tier for one resource.

use serde::Serialize;

use grantdesk_models::{Identity, Proposal};

/// Permission tier, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Public,
    /// PI or collaborator on the specific proposal.
    Author,
    Reviewer,
    /// System/institutional admin, program officer, or area chair.
    Admin,
}

/// Classifies a requester against an optional proposal.
///
/// `Author` only applies when `proposal` is given and the requester is its PI
/// or a collaborator. Anonymous requesters are always `Public`.
pub fn classify(viewer: Option<&Identity>, proposal: Option<&Proposal>) -> Tier {
    let Some(viewer) = viewer else {
        return Tier::Public;
    };

    if viewer.roles.is_admin() {
        Tier::Admin
    } else if viewer.roles.contains(grantdesk_models::Role::Reviewer) {
        Tier::Reviewer
    } else if proposal.is_some_and(|p| p.is_participant(&viewer.id)) {
        Tier::Author
    } else {
        Tier::Public
    }
}
