use crate::error::StoreError;
use crate::snapshot::GymSnapshot;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{
    CoreError, InventoryItem, Member, PaymentMethod, Transaction, TransactionType, round_money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One line of a point-of-sale cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartLine {
    Product { item_id: Uuid, quantity: u32 },
    Plan { plan_id: Uuid },
}

impl GymSnapshot {
    /// Records a sale and applies it to stock and memberships.
    ///
    /// The whole cart is checked before anything changes: a missing record, a guest
    /// buying a plan or a short item leaves the snapshot untouched. The transaction
    /// type follows the cart: plans only, products only, or both.
    pub fn checkout(
        &mut self,
        member_id: Option<Uuid>,
        lines: &[CartLine],
        payment_method: PaymentMethod,
        date: NaiveDate,
    ) -> Result<Transaction, StoreError> {
        if lines.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        if let Some(id) = member_id {
            self.member(id).ok_or(StoreError::MemberNotFound(id))?;
        }

        let mut amount = Decimal::ZERO;
        let mut wanted: HashMap<Uuid, u32> = HashMap::new();
        let mut plan_ids = Vec::new();
        for line in lines {
            match *line {
                CartLine::Product { item_id, quantity } => {
                    if quantity == 0 {
                        return Err(CoreError::InvalidInput(
                            "quantity".to_string(),
                            format!("zero units of item '{item_id}'"),
                        )
                        .into());
                    }
                    let item = self.item(item_id)?;
                    amount += item.price * Decimal::from(quantity);
                    let total = wanted.entry(item_id).or_insert(0);
                    *total = total.saturating_add(quantity);
                    if *total > item.stock {
                        return Err(CoreError::InsufficientStock {
                            item: item.name.clone(),
                            requested: *total,
                            available: item.stock,
                        }
                        .into());
                    }
                }
                CartLine::Plan { plan_id } => {
                    if member_id.is_none() {
                        return Err(StoreError::GuestMembership);
                    }
                    let plan = self
                        .plans
                        .iter()
                        .find(|p| p.id == plan_id)
                        .ok_or(StoreError::PlanNotFound(plan_id))?;
                    if plan.duration_days == 0 {
                        return Err(StoreError::Invalid(format!(
                            "plan '{}' has zero days",
                            plan.name
                        )));
                    }
                    amount += plan.price;
                    plan_ids.push(plan_id);
                }
            }
        }

        let transaction_type = match (plan_ids.is_empty(), wanted.is_empty()) {
            (false, true) => TransactionType::Membership,
            (true, false) => TransactionType::PosSale,
            _ => TransactionType::MixedSale,
        };

        // Everything is known to succeed from here on.
        for (item_id, quantity) in &wanted {
            self.item_mut(*item_id)?.sell(*quantity)?;
        }
        if let Some(member_id) = member_id {
            for plan_id in &plan_ids {
                let plan = self
                    .plans
                    .iter()
                    .find(|p| p.id == *plan_id)
                    .cloned()
                    .ok_or(StoreError::PlanNotFound(*plan_id))?;
                plan.renew(self.member_mut(member_id)?, date)?;
            }
        }

        let transaction = Transaction {
            id: Uuid::new_v4(),
            member_id,
            transaction_type,
            amount: round_money(amount),
            date,
            payment_method,
        };
        self.transactions.push(transaction.clone());

        tracing::info!(
            transaction_id = %transaction.id,
            kind = %transaction.transaction_type,
            amount = %transaction.amount,
            guest = transaction.is_guest(),
            "Checkout recorded."
        );
        Ok(transaction)
    }

    /// Adds `quantity` units to an item and stamps the restock date.
    pub fn restock(
        &mut self,
        item_id: Uuid,
        quantity: u32,
        date: NaiveDate,
    ) -> Result<&InventoryItem, StoreError> {
        let item = self.item_mut(item_id)?;
        item.restock(quantity, date)?;
        tracing::info!(item = %item.name, quantity, stock = item.stock, "Item restocked.");
        Ok(&*item)
    }

    /// Records a visit for an active member.
    pub fn check_in(&mut self, member_id: Uuid, at: DateTime<Utc>) -> Result<&Member, StoreError> {
        let member = self.member_mut(member_id)?;
        member.record_check_in(at)?;
        tracing::info!(member = %member.name, total = member.total_check_ins, "Member checked in.");
        Ok(&*member)
    }

    fn item(&self, id: Uuid) -> Result<&InventoryItem, StoreError> {
        self.inventory
            .iter()
            .find(|i| i.id == id)
            .ok_or(StoreError::ItemNotFound(id))
    }

    fn item_mut(&mut self, id: Uuid) -> Result<&mut InventoryItem, StoreError> {
        self.inventory
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::ItemNotFound(id))
    }

    fn member_mut(&mut self, id: Uuid) -> Result<&mut Member, StoreError> {
        self.members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::MemberNotFound(id))
    }
}
