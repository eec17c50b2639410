//! Shared fixtures for handler and router tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use grantdesk_core::{FixedClock, TokenFileAuthenticator};
use grantdesk_models::{
    Call, CallBuilder, CallStatus, Identity, Investigator, Proposal, ReviewAssignment,
    ReviewVisibility, Role,
};

use crate::config::ApiConfig;
use crate::state::AppState;

pub const ADMIN_TOKEN: &str = "tok-admin";
pub const PI_TOKEN: &str = "tok-pi";
pub const OTHER_TOKEN: &str = "tok-other";
pub const REVIEWER_TOKEN: &str = "tok-reviewer";
pub const REVIEWER2_TOKEN: &str = "tok-reviewer2";

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn admin() -> Identity {
    Identity::new("user-po", "Pat Officer", "po@example.org", [Role::ProgramOfficer])
}

pub fn pi() -> Identity {
    Identity::new("user-pi", "Ada Lovelace", "ada@example.org", [Role::Investigator])
}

pub fn other() -> Identity {
    Identity::new("user-other", "Bo Smith", "bo@example.org", [Role::Investigator])
}

pub fn reviewer() -> Identity {
    Identity::new("user-rev", "Rhea Viewer", "rhea@example.org", [Role::Reviewer])
}

pub fn reviewer2() -> Identity {
    Identity::new("user-rev2", "Rex Viewer", "rex@example.org", [Role::Reviewer])
}

/// State with a fixed clock at `now`, all fixture tokens, and no rate limit.
pub fn make_test_state(now: DateTime<Utc>) -> (AppState, Arc<FixedClock>) {
    let dir = tempdir().unwrap();
    let path = dir.path().to_path_buf();
    std::mem::forget(dir);

    let auth = TokenFileAuthenticator::from_entries([
        (ADMIN_TOKEN.to_string(), admin()),
        (PI_TOKEN.to_string(), pi()),
        (OTHER_TOKEN.to_string(), other()),
        (REVIEWER_TOKEN.to_string(), reviewer()),
        (REVIEWER2_TOKEN.to_string(), reviewer2()),
    ]);
    let clock = Arc::new(FixedClock::new(now));
    let config = ApiConfig::default().with_rate_limit(0, std::time::Duration::from_secs(60));

    let state = AppState::new(config, path, Arc::new(auth)).with_clock(clock.clone());
    (state, clock)
}

/// The ocean call: open, public, proposals due 2025-06-01, reviews due
/// 2025-07-15, results not yet released.
pub fn ocean_call() -> Call {
    CallBuilder::new("Ocean Science 2025")
        .id("call-ocean")
        .description("Marine research")
        .public(true)
        .status(CallStatus::Open)
        .review_visibility(ReviewVisibility::Public)
        .open_date(at(2025, 1, 1))
        .full_proposal_deadline(at(2025, 6, 1))
        .review_deadline(at(2025, 7, 15))
        .build()
}

/// Seeds the ocean call with one submitted proposal by the fixture PI and an
/// assignment for the fixture reviewer due 2025-07-15.
pub fn seed_ocean(state: &AppState) -> (Call, Proposal, ReviewAssignment) {
    let call = ocean_call();
    state.calls.save_call(&call).unwrap();

    let mut proposal = Proposal::new(call.id.clone(), Investigator::from(&pi()), "Kelp forests");
    proposal.abstract_text = "Carbon capture in kelp".to_string();
    proposal.narrative = "Full narrative".to_string();
    proposal.requested_amount = 250_000;
    proposal.submit(at(2025, 5, 20));
    state.proposals.create_proposal(&proposal).unwrap();

    let assignment =
        ReviewAssignment::new(proposal.id.clone(), reviewer().id, Some(at(2025, 7, 15)));
    state.reviews.create_assignment(&assignment).unwrap();

    (call, proposal, assignment)
}
