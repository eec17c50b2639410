//! Persistence layer for Grantdesk.
//!
//! This crate provides crash-safe persistence using atomic file operations
//! (write to temp file, then rename). Records that must be unique per
//! (proposal, reviewer) pair are stored at a path derived from that pair and
//! created with a no-clobber rename, so the filesystem acts as the unique
//! constraint even when several server processes share one data directory.
//!
//! # Example
//!
//! ```no_run
//! use grantdesk_persistence::CallStore;
//! use grantdesk_models::Call;
//!
//! let store = CallStore::new("/var/lib/grantdesk");
//!
//! let call = Call::new("Ocean Science 2025");
//! store.save_call(&call).unwrap();
//!
//! let loaded = store.load_call(&call.id).unwrap();
//! ```

pub mod atomic;
pub mod call_store;
pub mod error;
pub mod proposal_store;
pub mod review_store;

pub use call_store::CallStore;
pub use error::{PersistenceError, Result};
pub use proposal_store::ProposalStore;
pub use review_store::ReviewStore;
