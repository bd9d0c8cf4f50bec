//! REST client for the aprendices dashboard API.
//!
//! This crate is the API access layer of the dashboard: it builds requests,
//! injects the bearer credential, classifies responses and applies the
//! session-expiry policy.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ DashboardQueryClient │  named operations, endpoint/parameter building
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐     ┌──────────────────┐
//! │   RequestGateway     │────▶│  SessionPolicy   │  credential lookup,
//! │ headers, classify    │     │  (session crate) │  forced logout on 401
//! └──────────┬───────────┘     └──────────────────┘
//!            │ HTTP
//! ┌──────────▼───────────┐
//! │  Dashboard backend   │
//! └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use aprendices_client::{ClientConfig, DashboardApi, DashboardQueryClient};
//! use aprendices_core::FilterSet;
//! use aprendices_session::{MemorySessionStore, SessionPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionPolicy::with_store(Arc::new(MemorySessionStore::new()));
//! let client = DashboardQueryClient::new(
//!     ClientConfig::cross_origin("http://localhost:8000"),
//!     session,
//! )?;
//!
//! let filters = FilterSet::new().with_modalidad("VIRTUAL");
//! let data = client.fetch_dashboard_filtered(&filters).await?;
//! println!("Aprendices: {}", data.cards.total_aprendices);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod outcome;
pub mod request;

pub use api::{ApiStatus, DashboardApi, DashboardQueryClient, LoginResponse};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use gateway::RequestGateway;
pub use outcome::{ResponseOutcome, ServerError, ServerErrorKind};
pub use request::{RequestBody, RequestSpec};

// Re-export commonly used types from dependencies for convenience
pub use aprendices_core::{DashboardPayload, FilterSet, UserProfile};
pub use tokio_util::sync::CancellationToken;
