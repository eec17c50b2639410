//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use grantdesk_core::{
    Authenticator, Clock, FixedWindowLimiter, LogNotifier, Notifier, ProposalRecord,
    RateLimiter, SystemClock,
};
use grantdesk_models::{CallId, Proposal};
use grantdesk_persistence::{CallStore, ProposalStore, ReviewStore};

use crate::config::ApiConfig;
use crate::error::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    pub calls: Arc<CallStore>,
    pub proposals: Arc<ProposalStore>,
    pub reviews: Arc<ReviewStore>,
    /// Source of "now" for every deadline decision.
    pub clock: Arc<dyn Clock>,
    pub authenticator: Arc<dyn Authenticator>,
    pub notifier: Arc<dyn Notifier>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Creates state backed by stores under `data_dir`.
    ///
    /// Uses the system clock, a log-only notifier, and a process-local rate
    /// limiter; override them with the `with_*` methods.
    pub fn new(
        config: ApiConfig,
        data_dir: impl Into<PathBuf>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            config: Arc::new(config),
            calls: Arc::new(CallStore::new(&data_dir)),
            proposals: Arc::new(ProposalStore::new(&data_dir)),
            reviews: Arc::new(ReviewStore::new(&data_dir)),
            clock: Arc::new(SystemClock),
            authenticator,
            notifier: Arc::new(LogNotifier),
            rate_limiter: Arc::new(FixedWindowLimiter::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Loads a proposal's reviews and assignments.
    pub fn load_record(&self, proposal: Proposal) -> Result<ProposalRecord> {
        let reviews = self.reviews.list_reviews(&proposal.id)?;
        let assignments = self.reviews.list_assignments(&proposal.id)?;
        Ok(ProposalRecord {
            proposal,
            reviews,
            assignments,
        })
    }

    /// Loads every proposal of a call with its nested records.
    pub fn load_call_records(&self, call_id: &CallId) -> Result<Vec<ProposalRecord>> {
        self.proposals
            .list_for_call(call_id)?
            .into_iter()
            .map(|p| self.load_record(p))
            .collect()
    }
}
