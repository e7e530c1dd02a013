use crate::enums::{MemberStatus, PaymentMethod, StockLevel, TransactionType};
use crate::error::CoreError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered gym member and the state of their membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub status: MemberStatus,
    /// The plan the membership was last sold or renewed under.
    #[serde(default)]
    pub plan_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub last_check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_check_ins: u32,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Whole days from `as_of` to the expiration date. Negative once expired.
    pub fn days_until_expiration(&self, as_of: NaiveDate) -> i64 {
        (self.expiration_date - as_of).num_days()
    }

    /// True when the last recorded check-in falls on `date`.
    /// Members who never checked in are never counted.
    pub fn checked_in_on(&self, date: NaiveDate) -> bool {
        self.last_check_in
            .map(|at| at.date_naive() == date)
            .unwrap_or(false)
    }

    /// Records a visit at `at`. Only active members may check in.
    pub fn record_check_in(&mut self, at: DateTime<Utc>) -> Result<(), CoreError> {
        if !self.is_active() {
            return Err(CoreError::InvalidInput(
                "check-in".to_string(),
                format!("member '{}' is {}", self.name, self.status),
            ));
        }
        self.last_check_in = Some(at);
        self.total_check_ins = self.total_check_ins.saturating_add(1);
        Ok(())
    }
}

/// A completed sale. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// `None` for a guest (walk-in) sale.
    #[serde(default)]
    pub member_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
}

impl Transaction {
    pub fn is_guest(&self) -> bool {
        self.member_id.is_none()
    }

    /// True when the transaction falls in the same calendar month and year as `as_of`.
    pub fn in_month_of(&self, as_of: NaiveDate) -> bool {
        self.date.year() == as_of.year() && self.date.month() == as_of.month()
    }
}

/// Rounds a monetary amount to cents, midpoint away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub price: Decimal,
    #[serde(default)]
    pub last_restock: Option<NaiveDate>,
}

impl InventoryItem {
    pub fn stock_level(&self, low_stock_threshold: u32) -> StockLevel {
        if self.stock == 0 {
            StockLevel::OutOfStock
        } else if self.stock < low_stock_threshold {
            StockLevel::Low
        } else {
            StockLevel::Healthy
        }
    }

    /// Value of the units on hand at the current price.
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock)
    }

    pub fn restock(&mut self, quantity: u32, date: NaiveDate) -> Result<(), CoreError> {
        self.stock = self.stock.checked_add(quantity).ok_or_else(|| {
            CoreError::Calculation(format!("stock overflow restocking '{}'", self.name))
        })?;
        self.last_restock = Some(date);
        Ok(())
    }

    /// Removes `quantity` units. Stock is left untouched when there is not enough.
    pub fn sell(&mut self, quantity: u32) -> Result<(), CoreError> {
        if quantity > self.stock {
            return Err(CoreError::InsufficientStock {
                item: self.name.clone(),
                requested: quantity,
                available: self.stock,
            });
        }
        self.stock -= quantity;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: Uuid,
    pub name: String,
    pub duration_days: u32,
    pub price: Decimal,
}

impl MembershipPlan {
    /// Applies this plan to `member` as of `date`.
    ///
    /// A membership still running is extended from its current expiration date;
    /// a lapsed one restarts on `date`.
    pub fn renew(&self, member: &mut Member, date: NaiveDate) -> Result<(), CoreError> {
        if self.duration_days == 0 {
            return Err(CoreError::InvalidInput(
                "plan duration".to_string(),
                format!("plan '{}' has zero days", self.name),
            ));
        }
        let extend_from = if member.expiration_date >= date {
            member.expiration_date
        } else {
            member.start_date = date;
            date
        };
        member.expiration_date = extend_from + Duration::days(i64::from(self.duration_days));
        member.status = MemberStatus::Active;
        member.plan_id = Some(self.id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymClass {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub trainer_id: Option<Uuid>,
    #[serde(default)]
    pub schedule: String,
    pub capacity: u32,
    #[serde(default)]
    pub current_enrollment: u32,
}

impl GymClass {
    pub fn is_full(&self) -> bool {
        self.current_enrollment >= self.capacity
    }

    pub fn seats_remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.current_enrollment)
    }
}

/// A member's seat on a class roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub member_id: Uuid,
    pub class_id: Uuid,
    pub enrollment_date: DateTime<Utc>,
}
