use chrono::NaiveDate;
use core_types::{Capability, InventoryItem, Member, MemberStatus, StaffRole, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the dashboard shows, derived from one set of entity snapshots.
///
/// This struct is the final output of the `AnalyticsEngine` and serves as the
/// data transfer object handed to presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub as_of: NaiveDate,

    // I. Membership
    pub total_members: usize,
    pub active_members: usize,
    pub members_by_status: Vec<StatusCount>,
    pub checked_in_today: usize,
    /// Soonest first.
    pub expiring_memberships: Vec<ExpiringMembership>,

    // II. Revenue (month-to-date)
    pub month_to_date_revenue: Decimal,
    pub guest_revenue_mtd: Decimal,
    /// Only types with at least one transaction this month, in type order.
    pub revenue_breakdown: Vec<RevenueBreakdownEntry>,
    /// Newest first.
    pub recent_transactions: Vec<Transaction>,

    // III. Inventory
    /// Items with some stock left but below the threshold.
    pub low_stock: Vec<InventoryItem>,
    /// Items with no stock at all. Reported apart from `low_stock`.
    pub out_of_stock: Vec<InventoryItem>,
    pub inventory_value: Decimal,

    /// Set when the financial fields were cleared for the viewer's role.
    pub financials_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: MemberStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringMembership {
    pub member: Member,
    pub days_until_expiration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdownEntry {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub transaction_count: usize,
}

impl DashboardMetrics {
    /// Creates an empty report for `as_of`, the starting point before calculations.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            total_members: 0,
            active_members: 0,
            members_by_status: Vec::new(),
            checked_in_today: 0,
            expiring_memberships: Vec::new(),
            month_to_date_revenue: Decimal::ZERO,
            guest_revenue_mtd: Decimal::ZERO,
            revenue_breakdown: Vec::new(),
            recent_transactions: Vec::new(),
            low_stock: Vec::new(),
            out_of_stock: Vec::new(),
            inventory_value: Decimal::ZERO,
            financials_hidden: false,
        }
    }

    /// Returns the report as `role` may see it.
    ///
    /// Roles without `ViewRevenue` get the membership and stock figures only.
    pub fn visible_to(&self, role: StaffRole) -> DashboardMetrics {
        let mut view = self.clone();
        if !role.can(Capability::ViewRevenue) {
            view.month_to_date_revenue = Decimal::ZERO;
            view.guest_revenue_mtd = Decimal::ZERO;
            view.revenue_breakdown.clear();
            view.recent_transactions.clear();
            view.inventory_value = Decimal::ZERO;
            view.financials_hidden = true;
        }
        view
    }
}
