//! Funding calls.
//!
//! A call is published by a program officer, collects proposals until its
//! deadline, and later exposes review results once `results_public` is set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CallId, UserId};

/// Lifecycle status of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    /// Being prepared; not accepting proposals.
    #[default]
    Draft,
    /// Accepting proposals.
    Open,
    /// No longer accepting proposals.
    Closed,
    /// Kept for the record only.
    Archived,
}

/// Administrative policy describing who should eventually read reviews.
///
/// This is an admin-only field; it is never echoed to other tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewVisibility {
    #[default]
    Private,
    AuthorsOnly,
    Public,
}

/// A call for proposals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Unique identifier for the call.
    pub id: CallId,

    /// Title of the call.
    pub title: String,

    /// Longer description shown to applicants.
    #[serde(default)]
    pub description: String,

    /// Whether the call is listed publicly.
    #[serde(default)]
    pub is_public: bool,

    /// Whether review results have been released.
    #[serde(default)]
    pub results_public: bool,

    /// Current lifecycle status.
    #[serde(default)]
    pub status: CallStatus,

    /// Review visibility policy.
    #[serde(default)]
    pub review_visibility: ReviewVisibility,

    /// When the call opens for submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_date: Option<DateTime<Utc>>,

    /// When the call closes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<DateTime<Utc>>,

    /// Deadline for full proposals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_proposal_deadline: Option<DateTime<Utc>>,

    /// Deadline for reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_deadline: Option<DateTime<Utc>>,

    /// Program officer who created the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,

    /// When the call was created.
    pub created_at: DateTime<Utc>,
}

impl Call {
    /// Creates a new draft call with no deadlines.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: CallId::new(),
            title: title.into(),
            description: String::new(),
            is_public: false,
            results_public: false,
            status: CallStatus::Draft,
            review_visibility: ReviewVisibility::Private,
            open_date: None,
            close_date: None,
            full_proposal_deadline: None,
            review_deadline: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    /// Returns true if the call is accepting proposals.
    pub fn is_open(&self) -> bool {
        self.status == CallStatus::Open
    }
}
