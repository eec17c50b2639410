//! Business rules for Grantdesk.
//!
//! - [`clock`]: deadline gates computed from "now" and stored deadlines
//! - [`classifier`]: per-resource permission tiers
//! - [`visibility`]: what each tier sees of a call, its proposals and reviews
//! - [`gate`]: preconditions for submitting reviews and proposals
//! - [`rate_limit`], [`notify`], [`auth`]: capabilities injected into the API
//! - [`config`]: state directory resolution

pub mod auth;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod gate;
pub mod notify;
pub mod rate_limit;
pub mod visibility;

pub use auth::{AuthError, Authenticator, TokenFileAuthenticator};
pub use classifier::{classify, Tier};
pub use clock::{effective_submission_deadline, Clock, DeadlineGates, FixedClock, SystemClock};
pub use gate::{
    check_proposal_submission, check_review_submission, check_withdrawal, GateError,
    ReviewAttempt,
};
pub use notify::{dispatch_detached, LogNotifier, Notification, Notifier, NotifyError, WebhookNotifier};
pub use rate_limit::{FixedWindowLimiter, RateLimiter};
pub use visibility::{
    author_view, can_view_call, publishable_reviews, resolve_call, CallView, ProposalRecord,
    ProposalView, ReviewView,
};
