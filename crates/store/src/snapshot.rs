use crate::error::StoreError;
use core_types::{Enrollment, GymClass, InventoryItem, Member, MembershipPlan, Trainer, Transaction};
use enrollment::{EnrollmentStore, InMemoryRosterStore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Every record the gym keeps, as one JSON document.
///
/// Collections missing from the file load as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GymSnapshot {
    pub members: Vec<Member>,
    pub transactions: Vec<Transaction>,
    pub inventory: Vec<InventoryItem>,
    pub plans: Vec<MembershipPlan>,
    pub trainers: Vec<Trainer>,
    pub classes: Vec<GymClass>,
    pub enrollments: Vec<Enrollment>,
}

impl GymSnapshot {
    /// Reads and validates a snapshot file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: GymSnapshot = serde_json::from_reader(BufReader::new(file))?;
        snapshot.validate()?;

        tracing::info!(
            path = %path.display(),
            members = snapshot.members.len(),
            transactions = snapshot.transactions.len(),
            items = snapshot.inventory.len(),
            classes = snapshot.classes.len(),
            "Snapshot loaded."
        );
        Ok(snapshot)
    }

    /// Writes the snapshot next to `path` and renames it into place.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        let tmp_path = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path).map_err(write_err)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush().map_err(write_err)?;
        }
        fs::rename(&tmp_path, path).map_err(write_err)?;

        tracing::info!(path = %path.display(), "Snapshot saved.");
        Ok(())
    }

    /// Checks the invariants every record must hold.
    pub fn validate(&self) -> Result<(), StoreError> {
        for member in &self.members {
            if member.expiration_date < member.start_date {
                return Err(StoreError::Invalid(format!(
                    "member '{}' expires ({}) before starting ({})",
                    member.name, member.expiration_date, member.start_date
                )));
            }
        }
        for tx in &self.transactions {
            if tx.amount < Decimal::ZERO {
                return Err(StoreError::Invalid(format!(
                    "transaction '{}' has a negative amount",
                    tx.id
                )));
            }
        }
        for item in &self.inventory {
            if item.price < Decimal::ZERO {
                return Err(StoreError::Invalid(format!(
                    "item '{}' has a negative price",
                    item.name
                )));
            }
        }
        for plan in &self.plans {
            if plan.duration_days == 0 || plan.price < Decimal::ZERO {
                return Err(StoreError::Invalid(format!(
                    "plan '{}' needs a positive duration and a non-negative price",
                    plan.name
                )));
            }
        }
        for class in &self.classes {
            if class.capacity == 0 || class.current_enrollment > class.capacity {
                return Err(StoreError::Invalid(format!(
                    "class '{}' has {} of {} seats taken",
                    class.name, class.current_enrollment, class.capacity
                )));
            }
        }
        let class_ids: HashSet<_> = self.classes.iter().map(|c| c.id).collect();
        let mut pairs = HashSet::new();
        for enrollment in &self.enrollments {
            if !class_ids.contains(&enrollment.class_id) {
                return Err(StoreError::Invalid(format!(
                    "member '{}' is enrolled in unknown class '{}'",
                    enrollment.member_id, enrollment.class_id
                )));
            }
            if !pairs.insert((enrollment.member_id, enrollment.class_id)) {
                return Err(StoreError::Invalid(format!(
                    "member '{}' is enrolled twice in class '{}'",
                    enrollment.member_id, enrollment.class_id
                )));
            }
        }
        Ok(())
    }

    /// Moves the classes and enrollments into a roster store.
    pub fn roster_store(&self) -> InMemoryRosterStore {
        InMemoryRosterStore::from_parts(self.classes.clone(), self.enrollments.clone())
    }

    /// Replaces classes and enrollments with the state held by `store`.
    pub fn absorb_rosters<S: EnrollmentStore>(&mut self, store: &S) {
        let rosters = store.rosters();
        self.enrollments = rosters
            .iter()
            .flat_map(|roster| roster.enrollments.iter().cloned())
            .collect();
        self.classes = rosters.into_iter().map(|roster| roster.class).collect();
    }

    pub fn member(&self, id: uuid::Uuid) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn trainer_name(&self, id: uuid::Uuid) -> Option<&str> {
        self.trainers
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }
}
