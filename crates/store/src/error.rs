use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read snapshot '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write snapshot '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Snapshot failed validation: {0}")]
    Invalid(String),

    #[error("No member with id '{0}'.")]
    MemberNotFound(Uuid),

    #[error("No inventory item with id '{0}'.")]
    ItemNotFound(Uuid),

    #[error("No membership plan with id '{0}'.")]
    PlanNotFound(Uuid),

    #[error("Checkout needs at least one line.")]
    EmptyCart,

    #[error("Membership plans can only be sold to a member.")]
    GuestMembership,

    #[error(transparent)]
    Core(#[from] CoreError),
}
