use core_types::{Enrollment, GymClass};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A class together with the enrollments that reference it.
///
/// Kept as one unit so that the seat counter and the roster are always written
/// under the same lock.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRoster {
    pub class: GymClass,
    pub enrollments: Vec<Enrollment>,
}

impl ClassRoster {
    pub fn new(class: GymClass) -> Self {
        Self {
            class,
            enrollments: Vec::new(),
        }
    }

    pub fn is_enrolled(&self, member_id: Uuid) -> bool {
        self.enrollments.iter().any(|e| e.member_id == member_id)
    }

    /// True when the seat counter matches the number of enrollment records.
    pub fn is_consistent(&self) -> bool {
        self.class.current_enrollment as usize == self.enrollments.len()
    }
}

/// Storage for class rosters with per-class exclusive access.
///
/// Implementations must run `with_roster` closures for the same class one at a
/// time; closures for different classes may run concurrently.
pub trait EnrollmentStore: Send + Sync {
    /// Runs `f` with exclusive access to the roster of `class_id`.
    /// Returns `None` when the class is unknown.
    fn with_roster<R>(&self, class_id: Uuid, f: impl FnOnce(&mut ClassRoster) -> R) -> Option<R>;

    /// A copy of one roster.
    fn roster(&self, class_id: Uuid) -> Option<ClassRoster> {
        self.with_roster(class_id, |roster| roster.clone())
    }

    /// Copies of all rosters, in insertion order.
    fn rosters(&self) -> Vec<ClassRoster>;

    fn classes(&self) -> Vec<GymClass> {
        self.rosters().into_iter().map(|roster| roster.class).collect()
    }
}

#[derive(Debug, Default)]
struct RosterIndex {
    positions: HashMap<Uuid, usize>,
    rosters: Vec<Arc<Mutex<ClassRoster>>>,
}

/// In-memory `EnrollmentStore`: a read-write lock over the class index and one
/// mutex per class.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    index: RwLock<RosterIndex>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from class records and the enrollments that reference them.
    ///
    /// Enrollments pointing at an unknown class are dropped with a warning. Seat
    /// counters are taken as given; use `EnrollmentManager::audit` to check them.
    pub fn from_parts(classes: Vec<GymClass>, enrollments: Vec<Enrollment>) -> Self {
        let store = Self::new();
        for class in classes {
            store.insert_class(class);
        }
        for enrollment in enrollments {
            let class_id = enrollment.class_id;
            let attached = store.with_roster(class_id, |roster| roster.enrollments.push(enrollment));
            if attached.is_none() {
                tracing::warn!(%class_id, "Dropping enrollment for unknown class.");
            }
        }
        store
    }

    /// Adds a class, or replaces the class record (keeping its roster) if it exists.
    pub fn insert_class(&self, class: GymClass) {
        let mut index = self.index.write();
        if let Some(&pos) = index.positions.get(&class.id) {
            index.rosters[pos].lock().class = class;
            return;
        }
        let pos = index.rosters.len();
        index.positions.insert(class.id, pos);
        index.rosters.push(Arc::new(Mutex::new(ClassRoster::new(class))));
    }

    pub fn len(&self) -> usize {
        self.index.read().rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, class_id: Uuid) -> Option<Arc<Mutex<ClassRoster>>> {
        let index = self.index.read();
        index
            .positions
            .get(&class_id)
            .map(|&pos| Arc::clone(&index.rosters[pos]))
    }
}

impl EnrollmentStore for InMemoryRosterStore {
    fn with_roster<R>(&self, class_id: Uuid, f: impl FnOnce(&mut ClassRoster) -> R) -> Option<R> {
        // The index lock is released before the class lock is taken.
        let slot = self.slot(class_id)?;
        let mut roster = slot.lock();
        Some(f(&mut *roster))
    }

    fn rosters(&self) -> Vec<ClassRoster> {
        let slots: Vec<_> = self.index.read().rosters.iter().map(Arc::clone).collect();
        slots.iter().map(|slot| slot.lock().clone()).collect()
    }
}
