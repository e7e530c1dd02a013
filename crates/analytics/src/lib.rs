//! # GymDesk Analytics Engine
//!
//! This crate turns snapshots of members, transactions and inventory into the figures
//! shown on the gym dashboard.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of where the
//!   records came from. It depends only on `core-types` and the reporting policy in
//!   `configuration` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` reads slices and produces a
//!   `DashboardMetrics` value. It never mutates its inputs and has no error cases:
//!   missing data yields zero counts and empty lists.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the calculation logic.
//! - `compute_metrics`: Shorthand for the engine with the default policy.
//! - `DashboardMetrics`: The report, with role-based redaction via `visible_to`.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, compute_metrics};
pub use report::{DashboardMetrics, ExpiringMembership, RevenueBreakdownEntry, StatusCount};
