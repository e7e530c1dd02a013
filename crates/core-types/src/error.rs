use crate::access::{Capability, StaffRole};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Insufficient stock for '{item}': requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },

    #[error("Role '{role}' is not allowed to {capability:?}")]
    Forbidden {
        role: StaffRole,
        capability: Capability,
    },

    #[error("Calculation error: {0}")]
    Calculation(String),
}
