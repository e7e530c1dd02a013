//! # GymDesk Store Crate
//!
//! This crate holds the gym's records as a JSON seed snapshot and applies the
//! day-to-day changes made at the front desk.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** The only crate that touches the filesystem. The rest of the
//!   workspace receives plain slices or an `EnrollmentStore`.
//! - **All-or-Nothing Operations:** `checkout` validates the whole cart before it
//!   changes stock, memberships or the transaction log.
//!
//! ## Public API
//!
//! - `GymSnapshot`: load/save/validate, roster hand-off, `checkout`, `restock`, `check_in`.
//! - `CartLine`: a product or plan line of a sale.
//! - `StoreError`: The specific error types that can be returned from this crate.

pub mod error;
pub mod operations;
pub mod snapshot;

pub use error::StoreError;
pub use operations::CartLine;
pub use snapshot::GymSnapshot;
