use crate::clock::{Clock, SystemClock};
use crate::error::EnrollmentError;
use crate::store::EnrollmentStore;
use core_types::Enrollment;
use uuid::Uuid;

/// A class whose seat counter disagrees with its enrollment records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterAnomaly {
    pub class_id: Uuid,
    pub class_name: String,
    pub current_enrollment: u32,
    pub enrolled: usize,
}

/// The only writer of class seat counters.
///
/// Every enroll/unenroll runs inside the store's per-class critical section, so the
/// roster record and the counter change together.
#[derive(Debug)]
pub struct EnrollmentManager<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: EnrollmentStore> EnrollmentManager<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: EnrollmentStore, C: Clock> EnrollmentManager<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Puts `member_id` on the roster of `class_id` and takes one seat.
    ///
    /// Checks run in order: unknown class, full class, duplicate enrollment.
    pub fn enroll(&self, member_id: Uuid, class_id: Uuid) -> Result<Enrollment, EnrollmentError> {
        let now = self.clock.now();
        let result = self
            .store
            .with_roster(class_id, |roster| {
                if roster.class.is_full() {
                    return Err(EnrollmentError::ClassFull {
                        class_id,
                        capacity: roster.class.capacity,
                    });
                }
                if roster.is_enrolled(member_id) {
                    return Err(EnrollmentError::AlreadyEnrolled { member_id, class_id });
                }

                let enrollment = Enrollment {
                    member_id,
                    class_id,
                    enrollment_date: now,
                };
                roster.enrollments.push(enrollment.clone());
                roster.class.current_enrollment += 1;
                Ok((enrollment, roster.class.current_enrollment, roster.class.capacity))
            })
            .ok_or(EnrollmentError::ClassNotFound(class_id))?;

        match result {
            Ok((enrollment, seats_taken, capacity)) => {
                tracing::info!(%member_id, %class_id, seats_taken, capacity, "Member enrolled.");
                Ok(enrollment)
            }
            Err(e) => {
                tracing::debug!(%member_id, %class_id, error = %e, "Enrollment rejected.");
                Err(e)
            }
        }
    }

    /// Takes `member_id` off the roster of `class_id` and frees one seat.
    ///
    /// Returns whether an enrollment was removed. An unknown class or a member who
    /// is not on the roster leaves everything untouched.
    pub fn unenroll(&self, member_id: Uuid, class_id: Uuid) -> bool {
        let removed = self.store.with_roster(class_id, |roster| {
            let Some(pos) = roster
                .enrollments
                .iter()
                .position(|e| e.member_id == member_id)
            else {
                return false;
            };
            roster.enrollments.remove(pos);

            if roster.class.current_enrollment == 0 {
                // Counter and roster disagree; keep the clamp and report it.
                tracing::warn!(
                    %member_id,
                    %class_id,
                    remaining = roster.enrollments.len(),
                    "Seat counter already at zero while removing an enrollment."
                );
            } else {
                roster.class.current_enrollment -= 1;
            }
            true
        });

        match removed {
            Some(true) => {
                tracing::info!(%member_id, %class_id, "Member unenrolled.");
                true
            }
            Some(false) => false,
            None => {
                tracing::debug!(%class_id, "Unenroll for unknown class.");
                false
            }
        }
    }

    /// Lists every class whose seat counter differs from its enrollment count.
    ///
    /// Nothing is corrected; each anomaly is also logged.
    pub fn audit(&self) -> Vec<RosterAnomaly> {
        let anomalies: Vec<RosterAnomaly> = self
            .store
            .rosters()
            .into_iter()
            .filter(|roster| !roster.is_consistent())
            .map(|roster| RosterAnomaly {
                class_id: roster.class.id,
                class_name: roster.class.name,
                current_enrollment: roster.class.current_enrollment,
                enrolled: roster.enrollments.len(),
            })
            .collect();

        for anomaly in &anomalies {
            tracing::warn!(
                class_id = %anomaly.class_id,
                class = %anomaly.class_name,
                current_enrollment = anomaly.current_enrollment,
                enrolled = anomaly.enrolled,
                "Roster count mismatch."
            );
        }
        anomalies
    }
}
