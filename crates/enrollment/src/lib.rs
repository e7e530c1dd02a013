//! # GymDesk Enrollment
//!
//! Keeps class rosters and seat counters in step when members join or leave a class.
//!
//! ## Architectural Principles
//!
//! - **Store Abstraction:** Rosters live behind the `EnrollmentStore` trait instead of
//!   shared module-level collections. The store owns the locking; the manager owns
//!   the rules.
//! - **Per-Class Critical Section:** Appending an enrollment and bumping the counter
//!   happen under one class lock, so no reader sees one without the other.
//!
//! ## Public API
//!
//! - `EnrollmentManager`: `enroll`, `unenroll` and `audit`.
//! - `EnrollmentStore` / `InMemoryRosterStore` / `ClassRoster`: roster storage.
//! - `Clock`: the source of enrollment timestamps.
//! - `EnrollmentError`: `ClassNotFound`, `ClassFull`, `AlreadyEnrolled`.

pub mod clock;
pub mod error;
pub mod manager;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EnrollmentError;
pub use manager::{EnrollmentManager, RosterAnomaly};
pub use store::{ClassRoster, EnrollmentStore, InMemoryRosterStore};
