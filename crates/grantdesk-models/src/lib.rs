//! Core data models for Grantdesk.
//!
//! This crate provides the fundamental data types used throughout the
//! Grantdesk system: funding calls, proposals, review assignments, reviews,
//! and the identities and roles of the people acting on them.

pub mod builders;
pub mod call;
pub mod ids;
pub mod proposal;
pub mod review;
pub mod role;
pub mod user;

// Re-export main types
pub use builders::{CallBuilder, ReviewBuilder};
pub use call::{Call, CallStatus, ReviewVisibility};
pub use ids::{AssignmentId, CallId, ProposalId, ReviewId, UserId};
pub use proposal::{Investigator, Proposal, ProposalStatus};
pub use review::{AssignmentStatus, CriterionScore, Review, ReviewAssignment, MAX_SCORE, MIN_SCORE};
pub use role::{Role, RoleError, RoleSet, ADMIN_ROLES};
pub use user::Identity;
