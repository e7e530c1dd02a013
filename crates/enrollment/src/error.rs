use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    #[error("Class '{0}' does not exist.")]
    ClassNotFound(Uuid),

    #[error("Class '{class_id}' is full ({capacity} of {capacity} seats taken).")]
    ClassFull { class_id: Uuid, capacity: u32 },

    #[error("Member '{member_id}' is already enrolled in class '{class_id}'.")]
    AlreadyEnrolled { member_id: Uuid, class_id: Uuid },
}
