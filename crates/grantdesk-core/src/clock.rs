//! Wall-clock access and deadline gates.
//!
//! Gates are recomputed from the stored deadlines on every request; nothing
//! derived from them is cached or persisted.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use grantdesk_models::Call;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    at: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at: RwLock::new(at) }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        if let Ok(mut guard) = self.at.write() {
            *guard = at;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.at.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Returns true if `deadline` is set and `now` is strictly after it.
///
/// An unset deadline is open-ended and never over.
pub fn is_over(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.is_some_and(|d| now > d)
}

/// The deadline after which submissions close and reviewing may begin.
///
/// `full_proposal_deadline` when set, otherwise `close_date`.
pub fn effective_submission_deadline(call: &Call) -> Option<DateTime<Utc>> {
    call.full_proposal_deadline.or(call.close_date)
}

/// Boolean deadline gates for one call at one instant.
///
/// Every deadline check in the API goes through this type, so the listing
/// gate and the submission and review gates agree on one deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineGates {
    pub submission_deadline_over: bool,
    pub review_deadline_over: bool,
}

impl DeadlineGates {
    /// Evaluates the gates of `call` at `now`.
    pub fn evaluate(call: &Call, now: DateTime<Utc>) -> Self {
        Self {
            submission_deadline_over: is_over(effective_submission_deadline(call), now),
            review_deadline_over: is_over(call.review_deadline, now),
        }
    }
}
