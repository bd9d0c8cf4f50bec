//! Session handling for the aprendices dashboard client.
//!
//! This crate owns the single active session of the client:
//!
//! - [`SessionStore`]: get/set/clear capability over the credential and the
//!   cached user profile, with in-memory and JSON-file implementations
//! - [`SessionPolicy`]: credential sourcing per call and the forced-logout
//!   reaction to authorization failures
//! - [`SessionObserver`]: the UI collaborator told about expiry and redirects
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use aprendices_core::Credential;
//! use aprendices_session::{MemorySessionStore, SessionPolicy};
//!
//! let policy = SessionPolicy::with_store(Arc::new(MemorySessionStore::new()));
//! policy.establish(Credential::new("token"), None).unwrap();
//! assert!(policy.credential_for(true).is_some());
//!
//! policy.on_auth_failure();
//! assert!(!policy.is_logged_in());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod policy;
pub mod store;

pub use error::{Result, SessionError};
pub use policy::{LoggingObserver, SessionObserver, SessionPolicy};
pub use store::{FileSessionStore, MemorySessionStore, SessionState, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use policy::RecordingObserver;
