use crate::report::{DashboardMetrics, ExpiringMembership, RevenueBreakdownEntry, StatusCount};
use chrono::NaiveDate;
use configuration::ReportingPolicy;
use core_types::{InventoryItem, Member, MemberStatus, StockLevel, Transaction, TransactionType};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A stateless calculator for deriving dashboard metrics from gym records.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    policy: ReportingPolicy,
}

impl AnalyticsEngine {
    pub fn new(policy: ReportingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReportingPolicy {
        &self.policy
    }

    /// The main entry point for calculating dashboard metrics.
    ///
    /// # Arguments
    ///
    /// * `members` - Snapshot of all member records.
    /// * `transactions` - Snapshot of all recorded transactions.
    /// * `inventory` - Snapshot of all inventory items.
    /// * `as_of` - The day the dashboard is computed for.
    ///
    /// Pure: the inputs are never mutated and identical inputs give identical output.
    /// Empty inputs give zeroed metrics, never an error.
    pub fn calculate(
        &self,
        members: &[Member],
        transactions: &[Transaction],
        inventory: &[InventoryItem],
        as_of: NaiveDate,
    ) -> DashboardMetrics {
        let mut report = DashboardMetrics::new(as_of);

        self.calculate_membership(members, as_of, &mut report);
        self.calculate_revenue(transactions, as_of, &mut report);
        self.calculate_inventory(inventory, &mut report);

        tracing::debug!(
            %as_of,
            members = members.len(),
            transactions = transactions.len(),
            items = inventory.len(),
            "Dashboard metrics calculated."
        );
        report
    }

    /// Status counts, today's check-ins and the expiring-membership list.
    fn calculate_membership(&self, members: &[Member], as_of: NaiveDate, report: &mut DashboardMetrics) {
        report.total_members = members.len();
        report.active_members = members.iter().filter(|m| m.is_active()).count();
        report.members_by_status = MemberStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: members.iter().filter(|m| m.status == status).count(),
            })
            .collect();
        report.checked_in_today = members.iter().filter(|m| m.checked_in_on(as_of)).count();

        let window = i64::from(self.policy.expiring_window_days);
        let mut expiring: Vec<ExpiringMembership> = members
            .iter()
            .filter(|m| m.is_active())
            .filter_map(|m| {
                let days = m.days_until_expiration(as_of);
                (days > 0 && days <= window).then(|| ExpiringMembership {
                    member: m.clone(),
                    days_until_expiration: days,
                })
            })
            .collect();
        // Stable, so equal days keep collection order.
        expiring.sort_by_key(|e| e.days_until_expiration);
        report.expiring_memberships = expiring;
    }

    /// Month-to-date totals, the per-type breakdown and the newest transactions.
    fn calculate_revenue(&self, transactions: &[Transaction], as_of: NaiveDate, report: &mut DashboardMetrics) {
        let mut by_type: BTreeMap<TransactionType, (Decimal, usize)> = BTreeMap::new();

        for tx in transactions.iter().filter(|tx| tx.in_month_of(as_of)) {
            report.month_to_date_revenue += tx.amount;
            if tx.is_guest() {
                report.guest_revenue_mtd += tx.amount;
            }
            let entry = by_type.entry(tx.transaction_type).or_insert((Decimal::ZERO, 0));
            entry.0 += tx.amount;
            entry.1 += 1;
        }

        report.revenue_breakdown = by_type
            .into_iter()
            .map(|(transaction_type, (amount, transaction_count))| RevenueBreakdownEntry {
                transaction_type,
                amount,
                transaction_count,
            })
            .collect();

        let mut recent = transactions.to_vec();
        // Stable, so same-day transactions keep collection order.
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(self.policy.recent_transactions_limit);
        report.recent_transactions = recent;
    }

    /// Splits items into low and out-of-stock sets and values what is on hand.
    fn calculate_inventory(&self, inventory: &[InventoryItem], report: &mut DashboardMetrics) {
        for item in inventory {
            match item.stock_level(self.policy.low_stock_threshold) {
                StockLevel::OutOfStock => report.out_of_stock.push(item.clone()),
                StockLevel::Low => report.low_stock.push(item.clone()),
                StockLevel::Healthy => {}
            }
            report.inventory_value += item.stock_value();
        }
    }
}

/// Computes the dashboard with the default policy (threshold 10, 30-day window, 5 recent).
pub fn compute_metrics(
    members: &[Member],
    transactions: &[Transaction],
    inventory: &[InventoryItem],
    as_of: NaiveDate,
) -> DashboardMetrics {
    AnalyticsEngine::default().calculate(members, transactions, inventory, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use core_types::{PaymentMethod, StaffRole};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn member(name: &str, status: MemberStatus, expires: NaiveDate) -> Member {
        Member {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            status,
            plan_id: None,
            start_date: date(2024, 1, 1),
            expiration_date: expires,
            last_check_in: None,
            total_check_ins: 0,
        }
    }

    fn tx(on: NaiveDate, amount: Decimal, kind: TransactionType) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            member_id: Some(Uuid::new_v4()),
            transaction_type: kind,
            amount,
            date: on,
            payment_method: PaymentMethod::Card,
        }
    }

    fn item(name: &str, stock: u32) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Supplements".to_string(),
            stock,
            price: dec!(10.00),
            last_restock: None,
        }
    }

    #[test]
    fn empty_inputs_give_zeroed_metrics() {
        let metrics = compute_metrics(&[], &[], &[], date(2024, 10, 22));
        assert_eq!(metrics.active_members, 0);
        assert_eq!(metrics.month_to_date_revenue, Decimal::ZERO);
        assert!(metrics.revenue_breakdown.is_empty());
        assert!(metrics.recent_transactions.is_empty());
        assert!(metrics.low_stock.is_empty());
        assert!(metrics.expiring_memberships.is_empty());
        assert!(metrics.members_by_status.iter().all(|s| s.count == 0));
    }

    #[test]
    fn month_to_date_revenue_ignores_other_months() {
        let transactions = vec![
            tx(date(2024, 10, 21), dec!(39.99), TransactionType::PosSale),
            tx(date(2024, 1, 1), dec!(999.99), TransactionType::Membership),
        ];
        let metrics = compute_metrics(&[], &transactions, &[], date(2024, 10, 22));

        assert_eq!(metrics.month_to_date_revenue, dec!(39.99));
        assert_eq!(
            metrics.revenue_breakdown,
            vec![RevenueBreakdownEntry {
                transaction_type: TransactionType::PosSale,
                amount: dec!(39.99),
                transaction_count: 1,
            }]
        );
    }

    #[test]
    fn same_month_of_another_year_is_excluded() {
        let transactions = vec![tx(date(2023, 10, 5), dec!(50.00), TransactionType::Membership)];
        let metrics = compute_metrics(&[], &transactions, &[], date(2024, 10, 22));
        assert_eq!(metrics.month_to_date_revenue, Decimal::ZERO);
        assert!(metrics.revenue_breakdown.is_empty());
    }

    #[test]
    fn breakdown_sums_to_month_to_date_revenue() {
        let as_of = date(2024, 10, 22);
        let mut guest = tx(date(2024, 10, 2), dec!(4.50), TransactionType::PosSale);
        guest.member_id = None;
        let transactions = vec![
            tx(date(2024, 10, 1), dec!(49.99), TransactionType::Membership),
            guest,
            tx(date(2024, 10, 3), dec!(12.25), TransactionType::PosSale),
            tx(date(2024, 10, 9), dec!(89.98), TransactionType::MixedSale),
            tx(date(2024, 9, 30), dec!(49.99), TransactionType::Membership),
        ];
        let metrics = compute_metrics(&[], &transactions, &[], as_of);

        let total: Decimal = metrics.revenue_breakdown.iter().map(|e| e.amount).sum();
        assert_eq!(total, metrics.month_to_date_revenue);
        assert_eq!(metrics.month_to_date_revenue, dec!(156.72));
        assert_eq!(metrics.guest_revenue_mtd, dec!(4.50));

        let kinds: Vec<_> = metrics.revenue_breakdown.iter().map(|e| e.transaction_type).collect();
        assert_eq!(
            kinds,
            vec![TransactionType::Membership, TransactionType::PosSale, TransactionType::MixedSale]
        );
        assert_eq!(metrics.revenue_breakdown[1].transaction_count, 2);
    }

    #[test]
    fn low_stock_excludes_empty_and_threshold_items() {
        let inventory = vec![
            item("Water", 45),
            item("Towel", 120),
            item("Shaker", 15),
            item("Gloves", 5),
            item("Creatine", 0),
            item("Bands", 10),
        ];
        let metrics = compute_metrics(&[], &[], &inventory, date(2024, 10, 22));

        let low: Vec<u32> = metrics.low_stock.iter().map(|i| i.stock).collect();
        assert_eq!(low, vec![5]);
        assert_eq!(metrics.out_of_stock.len(), 1);
        assert_eq!(metrics.out_of_stock[0].name, "Creatine");
        assert_eq!(metrics.inventory_value, dec!(1950.00));
    }

    #[test]
    fn expiring_members_are_sorted_soonest_first() {
        let as_of = date(2024, 10, 22);
        let members = vec![
            member("late", MemberStatus::Active, as_of + Duration::days(20)),
            member("today", MemberStatus::Active, as_of),
            member("soon-a", MemberStatus::Active, as_of + Duration::days(3)),
            member("far", MemberStatus::Active, as_of + Duration::days(31)),
            member("edge", MemberStatus::Active, as_of + Duration::days(30)),
            member("soon-b", MemberStatus::Active, as_of + Duration::days(3)),
            member("expired", MemberStatus::Expired, as_of + Duration::days(2)),
            member("lapsed", MemberStatus::Active, as_of - Duration::days(1)),
        ];
        let metrics = compute_metrics(&members, &[], &[], as_of);

        let names: Vec<&str> = metrics
            .expiring_memberships
            .iter()
            .map(|e| e.member.name.as_str())
            .collect();
        assert_eq!(names, vec!["soon-a", "soon-b", "late", "edge"]);
        assert!(
            metrics
                .expiring_memberships
                .windows(2)
                .all(|w| w[0].days_until_expiration <= w[1].days_until_expiration)
        );
        assert!(
            metrics
                .expiring_memberships
                .iter()
                .all(|e| (0..=30).contains(&e.days_until_expiration))
        );
    }

    #[test]
    fn counts_members_by_status_and_check_in() {
        let as_of = date(2024, 10, 22);
        let mut visited = member("visited", MemberStatus::Active, date(2025, 1, 1));
        visited.last_check_in = Some(as_of.and_hms_opt(6, 15, 0).unwrap().and_utc());
        let mut yesterday = member("yesterday", MemberStatus::Active, date(2025, 1, 1));
        yesterday.last_check_in = Some((as_of - Duration::days(1)).and_hms_opt(23, 59, 0).unwrap().and_utc());
        let members = vec![
            visited,
            yesterday,
            member("never", MemberStatus::Active, date(2025, 1, 1)),
            member("old", MemberStatus::Expired, date(2024, 1, 1)),
            member("new", MemberStatus::Pending, date(2025, 1, 1)),
        ];
        let metrics = compute_metrics(&members, &[], &[], as_of);

        assert_eq!(metrics.total_members, 5);
        assert_eq!(metrics.active_members, 3);
        assert_eq!(metrics.checked_in_today, 1);
        assert_eq!(
            metrics.members_by_status,
            vec![
                StatusCount { status: MemberStatus::Active, count: 3 },
                StatusCount { status: MemberStatus::Expired, count: 1 },
                StatusCount { status: MemberStatus::Pending, count: 1 },
            ]
        );
    }

    #[test]
    fn recent_transactions_are_newest_first_and_truncated() {
        let transactions: Vec<Transaction> = (1..=7)
            .map(|day| tx(date(2024, 10, day), Decimal::from(day), TransactionType::PosSale))
            .chain(std::iter::once(tx(date(2024, 10, 7), dec!(70), TransactionType::Membership)))
            .collect();
        let metrics = compute_metrics(&[], &transactions, &[], date(2024, 10, 22));

        let amounts: Vec<Decimal> = metrics.recent_transactions.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec!(7), dec!(70), dec!(6), dec!(5), dec!(4)]);
    }

    #[test]
    fn calculation_is_pure() {
        let as_of = date(2024, 10, 22);
        let members = vec![member("a", MemberStatus::Active, as_of + Duration::days(5))];
        let transactions = vec![tx(as_of, dec!(10.00), TransactionType::PosSale)];
        let inventory = vec![item("Gloves", 3)];

        let first = compute_metrics(&members, &transactions, &inventory, as_of);
        let second = compute_metrics(&members, &transactions, &inventory, as_of);
        assert_eq!(first, second);
    }

    #[test]
    fn policy_changes_thresholds() {
        let engine = AnalyticsEngine::new(ReportingPolicy {
            low_stock_threshold: 20,
            expiring_window_days: 7,
            recent_transactions_limit: 1,
        });
        let as_of = date(2024, 10, 22);
        let members = vec![
            member("week", MemberStatus::Active, as_of + Duration::days(7)),
            member("fortnight", MemberStatus::Active, as_of + Duration::days(14)),
        ];
        let transactions = vec![
            tx(date(2024, 10, 1), dec!(1), TransactionType::PosSale),
            tx(date(2024, 10, 2), dec!(2), TransactionType::PosSale),
        ];
        let metrics = engine.calculate(&members, &transactions, &[item("Shaker", 15)], as_of);

        assert_eq!(metrics.low_stock.len(), 1);
        assert_eq!(metrics.expiring_memberships.len(), 1);
        assert_eq!(metrics.recent_transactions.len(), 1);
        assert_eq!(metrics.recent_transactions[0].amount, dec!(2));
    }

    #[test]
    fn cashier_view_hides_financials() {
        let as_of = date(2024, 10, 22);
        let transactions = vec![tx(as_of, dec!(25.00), TransactionType::PosSale)];
        let metrics = compute_metrics(&[], &transactions, &[item("Gloves", 3)], as_of);

        let owner_view = metrics.visible_to(StaffRole::Owner);
        assert_eq!(owner_view, metrics);

        let cashier_view = metrics.visible_to(StaffRole::Cashier);
        assert!(cashier_view.financials_hidden);
        assert_eq!(cashier_view.month_to_date_revenue, Decimal::ZERO);
        assert!(cashier_view.revenue_breakdown.is_empty());
        assert!(cashier_view.recent_transactions.is_empty());
        assert_eq!(cashier_view.low_stock.len(), 1);
    }
}
