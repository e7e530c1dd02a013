pub mod access;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use access::{Capability, StaffRole};
pub use enums::{MemberStatus, PaymentMethod, StockLevel, TransactionType};
pub use error::CoreError;
pub use structs::{
    Enrollment, GymClass, InventoryItem, Member, MembershipPlan, Trainer, Transaction,
    round_money,
};
