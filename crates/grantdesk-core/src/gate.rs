//! Submission gates for reviews and proposals.
//!
//! The gates only decide; persisting the outcome is the caller's job. The
//! final "no existing review" check is repeated by the store's unique
//! constraint at write time, which is what settles concurrent submissions.

use chrono::{DateTime, Utc};
use thiserror::Error;

use grantdesk_models::{
    AssignmentId, Call, Identity, Proposal, ProposalId, ProposalStatus, ReviewAssignment,
};

use crate::clock::{effective_submission_deadline, is_over};

/// Reasons a submission is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Requester lacks the required role or ownership.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// No matching assignment or record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Review attempted before the proposal deadline closed.
    #[error("reviews open after the proposal deadline ({0})")]
    PrematureSubmission(String),

    /// A deadline has passed.
    #[error("deadline passed: {0}")]
    DeadlinePassed(String),

    /// A review already exists for this assignment.
    #[error("a review has already been submitted for this assignment")]
    DuplicateSubmission,

    /// The request is inconsistent with the record's state.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

/// Result type alias for gate checks.
pub type Result<T> = std::result::Result<T, GateError>;

fn describe(deadline: Option<DateTime<Utc>>) -> String {
    deadline
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "not yet scheduled".to_string())
}

/// Everything the review gate needs to decide.
#[derive(Debug)]
pub struct ReviewAttempt<'a> {
    pub requester: &'a Identity,
    pub proposal_id: &'a ProposalId,
    pub assignment_id: &'a AssignmentId,
    /// The requester's assignment on this proposal, if any.
    pub assignment: Option<&'a ReviewAssignment>,
    /// The call the proposal belongs to; None if the proposal is unknown.
    pub call: Option<&'a Call>,
    /// Whether a review already exists for (proposal, requester).
    pub review_exists: bool,
    pub now: DateTime<Utc>,
}

/// Checks a review submission. First failure wins:
///
/// 1. requester holds REVIEWER or AREA_CHAIR
/// 2. the assignment exists, matches the given id, and binds the requester
///    to a known proposal
/// 3. the proposal's effective submission deadline has passed
/// 4. the assignment's due date, if any, has not passed
/// 5. no review exists yet for the pair
///
/// Returns the validated assignment.
pub fn check_review_submission<'a>(attempt: &ReviewAttempt<'a>) -> Result<&'a ReviewAssignment> {
    if !attempt.requester.roles.can_review() {
        return Err(GateError::AccessDenied(
            "reviewer or area chair role required".to_string(),
        ));
    }

    let assignment = attempt
        .assignment
        .filter(|a| {
            a.id == *attempt.assignment_id
                && a.proposal_id == *attempt.proposal_id
                && a.reviewer_id == attempt.requester.id
        })
        .ok_or_else(|| GateError::NotFound(format!("assignment {}", attempt.assignment_id)))?;
    let call = attempt
        .call
        .ok_or_else(|| GateError::NotFound(format!("proposal {}", attempt.proposal_id)))?;

    let deadline = effective_submission_deadline(call);
    if !is_over(deadline, attempt.now) {
        return Err(GateError::PrematureSubmission(describe(deadline)));
    }

    if is_over(assignment.due_date, attempt.now) {
        return Err(GateError::DeadlinePassed(format!(
            "review was due {}",
            describe(assignment.due_date)
        )));
    }

    if attempt.review_exists {
        return Err(GateError::DuplicateSubmission);
    }

    Ok(assignment)
}

/// Checks that `requester` may submit `proposal` to `call` at `now`.
pub fn check_proposal_submission(
    requester: &Identity,
    proposal: &Proposal,
    call: &Call,
    now: DateTime<Utc>,
) -> Result<()> {
    if proposal.pi.id != requester.id {
        return Err(GateError::AccessDenied(
            "only the principal investigator can submit".to_string(),
        ));
    }

    if proposal.status != ProposalStatus::Draft {
        return Err(GateError::ValidationFailed(format!(
            "proposal is {:?}, not a draft",
            proposal.status
        )));
    }

    if !call.is_open() {
        return Err(GateError::ValidationFailed("call is not open".to_string()));
    }

    if call.open_date.is_some_and(|open| now < open) {
        return Err(GateError::ValidationFailed(format!(
            "call opens {}",
            describe(call.open_date)
        )));
    }

    let deadline = effective_submission_deadline(call);
    if is_over(deadline, now) {
        return Err(GateError::DeadlinePassed(format!(
            "submissions closed {}",
            describe(deadline)
        )));
    }

    Ok(())
}

/// Checks that `requester` may withdraw `proposal` at `now`.
///
/// Withdrawal is possible from DRAFT or SUBMITTED until the submission
/// deadline passes.
pub fn check_withdrawal(
    requester: &Identity,
    proposal: &Proposal,
    call: &Call,
    now: DateTime<Utc>,
) -> Result<()> {
    if proposal.pi.id != requester.id {
        return Err(GateError::AccessDenied(
            "only the principal investigator can withdraw".to_string(),
        ));
    }

    if !matches!(
        proposal.status,
        ProposalStatus::Draft | ProposalStatus::Submitted
    ) {
        return Err(GateError::ValidationFailed(format!(
            "proposal is {:?} and can no longer be withdrawn",
            proposal.status
        )));
    }

    let deadline = effective_submission_deadline(call);
    if is_over(deadline, now) {
        return Err(GateError::DeadlinePassed(format!(
            "withdrawals closed {}",
            describe(deadline)
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use grantdesk_models::{CallBuilder, CallStatus, Investigator, Role, UserId};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn user(id: &str, roles: &[Role]) -> Identity {
        Identity::new(id, id, format!("{}@example.org", id), roles.iter().copied())
    }

    fn call() -> Call {
        CallBuilder::new("Ocean Science")
            .status(CallStatus::Open)
            .open_date(at(2025, 1, 1))
            .full_proposal_deadline(at(2025, 6, 1))
            .build()
    }

    struct Fixture {
        reviewer: Identity,
        proposal_id: ProposalId,
        assignment: ReviewAssignment,
        call: Call,
    }

    impl Fixture {
        fn new(due: Option<DateTime<Utc>>) -> Self {
            let reviewer = user("user-r", &[Role::Reviewer]);
            let proposal_id = ProposalId::from("prop-1");
            let assignment = ReviewAssignment::new(proposal_id.clone(), reviewer.id.clone(), due);
            Self {
                reviewer,
                proposal_id,
                assignment,
                call: call(),
            }
        }

        fn attempt(&self, now: DateTime<Utc>) -> ReviewAttempt<'_> {
            ReviewAttempt {
                requester: &self.reviewer,
                proposal_id: &self.proposal_id,
                assignment_id: &self.assignment.id,
                assignment: Some(&self.assignment),
                call: Some(&self.call),
                review_exists: false,
                now,
            }
        }
    }

    #[test]
    fn test_review_accepted_after_deadline() {
        let f = Fixture::new(Some(at(2025, 7, 1)));
        let assignment = check_review_submission(&f.attempt(at(2025, 6, 15))).unwrap();
        assert_eq!(assignment.id, f.assignment.id);
    }

    #[test]
    fn test_role_checked_first() {
        let f = Fixture::new(None);
        let investigator = user("user-r", &[Role::Investigator]);
        let attempt = ReviewAttempt {
            requester: &investigator,
            review_exists: true,
            ..f.attempt(at(2025, 5, 1))
        };
        assert!(matches!(
            check_review_submission(&attempt),
            Err(GateError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_area_chair_may_review() {
        let mut f = Fixture::new(None);
        f.reviewer.roles = [Role::AreaChair].into_iter().collect();
        assert!(check_review_submission(&f.attempt(at(2025, 6, 2))).is_ok());
    }

    #[test]
    fn test_missing_or_foreign_assignment_not_found() {
        let f = Fixture::new(None);

        let attempt = ReviewAttempt {
            assignment: None,
            ..f.attempt(at(2025, 6, 2))
        };
        assert!(matches!(check_review_submission(&attempt), Err(GateError::NotFound(_))));

        let other_id = AssignmentId::from("asgn-other");
        let attempt = ReviewAttempt {
            assignment_id: &other_id,
            ..f.attempt(at(2025, 6, 2))
        };
        assert!(matches!(check_review_submission(&attempt), Err(GateError::NotFound(_))));

        let other_proposal = ProposalId::from("prop-2");
        let attempt = ReviewAttempt {
            proposal_id: &other_proposal,
            ..f.attempt(at(2025, 6, 2))
        };
        assert!(matches!(check_review_submission(&attempt), Err(GateError::NotFound(_))));

        let intruder = user("user-x", &[Role::Reviewer]);
        let attempt = ReviewAttempt {
            requester: &intruder,
            ..f.attempt(at(2025, 6, 2))
        };
        assert!(matches!(check_review_submission(&attempt), Err(GateError::NotFound(_))));

        let attempt = ReviewAttempt {
            call: None,
            ..f.attempt(at(2025, 6, 2))
        };
        assert!(matches!(check_review_submission(&attempt), Err(GateError::NotFound(_))));
    }

    #[test]
    fn test_premature_for_every_reviewing_role() {
        for role in [Role::Reviewer, Role::AreaChair] {
            let mut f = Fixture::new(Some(at(2025, 7, 1)));
            f.reviewer.roles = [role].into_iter().collect();
            let attempt = ReviewAttempt {
                review_exists: true,
                ..f.attempt(at(2025, 5, 31))
            };
            assert!(matches!(
                check_review_submission(&attempt),
                Err(GateError::PrematureSubmission(_))
            ));
        }
    }

    #[test]
    fn test_premature_at_exact_deadline() {
        let f = Fixture::new(None);
        assert!(matches!(
            check_review_submission(&f.attempt(at(2025, 6, 1))),
            Err(GateError::PrematureSubmission(_))
        ));
    }

    #[test]
    fn test_premature_when_no_deadline_scheduled() {
        let mut f = Fixture::new(None);
        f.call.full_proposal_deadline = None;
        assert!(matches!(
            check_review_submission(&f.attempt(at(2030, 1, 1))),
            Err(GateError::PrematureSubmission(_))
        ));
    }

    #[test]
    fn test_close_date_used_without_full_deadline() {
        let mut f = Fixture::new(None);
        f.call.full_proposal_deadline = None;
        f.call.close_date = Some(at(2025, 3, 1));
        assert!(check_review_submission(&f.attempt(at(2025, 3, 2))).is_ok());
    }

    #[test]
    fn test_due_date_inclusive() {
        let due = at(2025, 7, 1);
        let f = Fixture::new(Some(due));
        assert!(check_review_submission(&f.attempt(due)).is_ok());
        assert!(matches!(
            check_review_submission(&f.attempt(at(2025, 7, 2))),
            Err(GateError::DeadlinePassed(_))
        ));
    }

    #[test]
    fn test_duplicate_checked_last() {
        let f = Fixture::new(Some(at(2025, 7, 1)));
        let attempt = ReviewAttempt {
            review_exists: true,
            ..f.attempt(at(2025, 6, 15))
        };
        assert_eq!(
            check_review_submission(&attempt),
            Err(GateError::DuplicateSubmission)
        );

        // Past due outranks duplicate
        let attempt = ReviewAttempt {
            review_exists: true,
            ..f.attempt(at(2025, 7, 5))
        };
        assert!(matches!(
            check_review_submission(&attempt),
            Err(GateError::DeadlinePassed(_))
        ));
    }

    fn draft_by(pi: &Identity) -> Proposal {
        Proposal::new("call-1", Investigator::from(pi), "Kelp")
    }

    #[test]
    fn test_proposal_submission_window() {
        let pi = user("user-a", &[Role::Investigator]);
        let proposal = draft_by(&pi);
        let call = call();

        assert!(check_proposal_submission(&pi, &proposal, &call, at(2025, 3, 1)).is_ok());
        assert!(check_proposal_submission(&pi, &proposal, &call, at(2025, 6, 1)).is_ok());
        assert!(matches!(
            check_proposal_submission(&pi, &proposal, &call, at(2025, 6, 2)),
            Err(GateError::DeadlinePassed(_))
        ));
        assert!(matches!(
            check_proposal_submission(&pi, &proposal, &call, at(2024, 12, 1)),
            Err(GateError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_proposal_submission_requires_pi_draft_open_call() {
        let pi = user("user-a", &[Role::Investigator]);
        let other = user("user-b", &[Role::Investigator]);
        let mut proposal = draft_by(&pi);
        let mut call = call();
        let now = at(2025, 3, 1);

        assert!(matches!(
            check_proposal_submission(&other, &proposal, &call, now),
            Err(GateError::AccessDenied(_))
        ));

        call.status = CallStatus::Closed;
        assert!(matches!(
            check_proposal_submission(&pi, &proposal, &call, now),
            Err(GateError::ValidationFailed(_))
        ));

        call.status = CallStatus::Open;
        proposal.submit(now);
        assert!(matches!(
            check_proposal_submission(&pi, &proposal, &call, now),
            Err(GateError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_withdrawal() {
        let pi = user("user-a", &[Role::Investigator]);
        let mut proposal = draft_by(&pi);
        proposal.submit(at(2025, 3, 1));
        let call = call();

        assert!(check_withdrawal(&pi, &proposal, &call, at(2025, 4, 1)).is_ok());
        assert!(matches!(
            check_withdrawal(&pi, &proposal, &call, at(2025, 6, 2)),
            Err(GateError::DeadlinePassed(_))
        ));

        let collaborator = Identity {
            id: UserId::from("user-c"),
            ..pi.clone()
        };
        assert!(matches!(
            check_withdrawal(&collaborator, &proposal, &call, at(2025, 4, 1)),
            Err(GateError::AccessDenied(_))
        ));

        proposal.status = ProposalStatus::Accepted;
        assert!(matches!(
            check_withdrawal(&pi, &proposal, &call, at(2025, 4, 1)),
            Err(GateError::ValidationFailed(_))
        ));
    }
}
