//! Core types for the aprendices dashboard client.
//!
//! This crate provides the domain values shared by the session and client
//! crates:
//!
//! - **Filters**: [`FilterSet`] and its query-string encoding
//! - **Dashboard data**: [`DashboardPayload`], cards and chart points
//! - **Session values**: [`Credential`] and the cached [`UserProfile`]
//!
//! # Example
//!
//! ```
//! use aprendices_core::FilterSet;
//!
//! let filters = FilterSet::new().with_modalidad("VIRTUAL").with_nivel("");
//! assert_eq!(filters.apply_to("/api/data"), "/api/data?modalidad=VIRTUAL");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dashboard;
pub mod error;
pub mod filters;
pub mod session;

pub use dashboard::{
    ChartPoint, DashboardCards, DashboardPayload, FilterOptions, CHART_MODALIDAD, CHART_NIVEL,
    CHART_PROGRAMAS,
};
pub use error::{CoreError, Result};
pub use filters::{FilterKey, FilterSet};
pub use session::{CenterCode, Credential, UserProfile};
