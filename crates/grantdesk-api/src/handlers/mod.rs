//! API request handlers.

pub mod admin;
pub mod calls;
pub mod health;
pub mod me;
pub mod proposals;
pub mod reviews;

pub use admin::*;
pub use calls::*;
pub use health::*;
pub use me::*;
pub use proposals::*;
pub use reviews::*;
