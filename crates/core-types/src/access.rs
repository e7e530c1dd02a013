use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role a signed-in user holds at the gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Owner,
    CoOwner,
    Manager,
    Cashier,
    Member,
}

/// Something a role may or may not be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    ViewRevenue,
    ManagePlans,
    ManageStaff,
    ManageInventory,
    ProcessSales,
    ManageEnrollment,
}

impl StaffRole {
    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewRevenue | Capability::ManageInventory => match self {
                StaffRole::Owner | StaffRole::CoOwner | StaffRole::Manager => true,
                StaffRole::Cashier | StaffRole::Member => false,
            },
            Capability::ManagePlans => match self {
                StaffRole::Owner | StaffRole::CoOwner => true,
                StaffRole::Manager | StaffRole::Cashier | StaffRole::Member => false,
            },
            Capability::ManageStaff => match self {
                StaffRole::Owner => true,
                StaffRole::CoOwner | StaffRole::Manager | StaffRole::Cashier | StaffRole::Member => {
                    false
                }
            },
            Capability::ProcessSales | Capability::ManageEnrollment => match self {
                StaffRole::Owner | StaffRole::CoOwner | StaffRole::Manager | StaffRole::Cashier => {
                    true
                }
                StaffRole::Member => false,
            },
        }
    }

    /// Fails with `CoreError::Forbidden` when the role lacks `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), CoreError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                role: *self,
                capability,
            })
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StaffRole::Owner => "owner",
            StaffRole::CoOwner => "co-owner",
            StaffRole::Manager => "manager",
            StaffRole::Cashier => "cashier",
            StaffRole::Member => "member",
        };
        f.write_str(label)
    }
}

impl FromStr for StaffRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(StaffRole::Owner),
            "co-owner" | "co_owner" | "coowner" => Ok(StaffRole::CoOwner),
            "manager" => Ok(StaffRole::Manager),
            "cashier" => Ok(StaffRole::Cashier),
            "member" => Ok(StaffRole::Member),
            other => Err(CoreError::InvalidInput("role".to_string(), other.to_string())),
        }
    }
}
