use analytics::{AnalyticsEngine, DashboardMetrics};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, PolicyOverrides, load_config_from};
use core_types::{Capability, PaymentMethod, StaffRole};
use enrollment::EnrollmentManager;
use std::path::{Path, PathBuf};
use store::{CartLine, GymSnapshot};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

/// The main entry point for the GymDesk front-desk tool.
fn main() -> Result<()> {
    // A missing .env file is fine; it only carries GYMDESK__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    init_tracing(&config)?;

    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| config.store.snapshot_path.clone());

    match cli.command {
        Commands::Dashboard(args) => handle_dashboard(args, &config, cli.role, &snapshot_path),
        Commands::Classes => handle_classes(&snapshot_path),
        Commands::Audit => handle_audit(&snapshot_path),
        Commands::Enroll(args) => {
            cli.role.require(Capability::ManageEnrollment)?;
            handle_enroll(args, &snapshot_path)
        }
        Commands::Unenroll(args) => {
            cli.role.require(Capability::ManageEnrollment)?;
            handle_unenroll(args, &snapshot_path)
        }
        Commands::Checkout(args) => {
            cli.role.require(Capability::ProcessSales)?;
            handle_checkout(args, &snapshot_path)
        }
        Commands::Restock(args) => {
            cli.role.require(Capability::ManageInventory)?;
            handle_restock(args, &snapshot_path)
        }
        Commands::CheckIn(args) => {
            cli.role.require(Capability::ManageEnrollment)?;
            handle_check_in(args, &snapshot_path)
        }
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("invalid logging.level")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Gym membership, sales and class roster desk.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Snapshot file; overrides `store.snapshot_path`.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Role of the person at the desk (owner, co-owner, manager, cashier, member).
    #[arg(long, global = true, default_value = "owner")]
    role: StaffRole,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard metrics.
    Dashboard(DashboardArgs),
    /// List classes and their seats.
    Classes,
    /// Report classes whose seat count disagrees with their roster.
    Audit,
    /// Put a member on a class roster.
    Enroll(RosterArgs),
    /// Take a member off a class roster.
    Unenroll(RosterArgs),
    /// Record a sale of products and/or membership plans.
    Checkout(CheckoutArgs),
    /// Add units to an inventory item.
    Restock(RestockArgs),
    /// Record a member's visit.
    CheckIn(CheckInArgs),
}

#[derive(Parser)]
struct DashboardArgs {
    /// The day to compute the dashboard for (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print the metrics as JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    overrides: PolicyOverrides,
}

#[derive(Parser)]
struct RosterArgs {
    #[arg(long)]
    member: Uuid,
    #[arg(long)]
    class: Uuid,
}

#[derive(Parser)]
struct CheckoutArgs {
    /// Buying member; omit for a guest sale.
    #[arg(long)]
    member: Option<Uuid>,

    /// Product line as ITEM_ID:QUANTITY. Repeatable.
    #[arg(long = "item", value_parser = parse_product_line)]
    items: Vec<CartLine>,

    /// Membership plan to sell. Repeatable.
    #[arg(long = "plan")]
    plans: Vec<Uuid>,

    /// cash, card or transfer.
    #[arg(long)]
    payment: PaymentMethod,

    /// Sale date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Parser)]
struct RestockArgs {
    #[arg(long)]
    item: Uuid,
    #[arg(long)]
    quantity: u32,
    /// Restock date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Parser)]
struct CheckInArgs {
    #[arg(long)]
    member: Uuid,
}

fn parse_product_line(s: &str) -> Result<CartLine, String> {
    let (id, quantity) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ITEM_ID:QUANTITY, got '{s}'"))?;
    let item_id = id.parse::<Uuid>().map_err(|e| format!("bad item id '{id}': {e}"))?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|e| format!("bad quantity '{quantity}': {e}"))?;
    Ok(CartLine::Product { item_id, quantity })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_dashboard(args: DashboardArgs, config: &Config, role: StaffRole, path: &Path) -> Result<()> {
    let snapshot = GymSnapshot::load(path)?;
    let mut policy = config.reporting.clone();
    args.overrides.apply(&mut policy);
    policy.validate()?;

    let as_of = args.as_of.unwrap_or_else(today);
    let metrics = AnalyticsEngine::new(policy)
        .calculate(&snapshot.members, &snapshot.transactions, &snapshot.inventory, as_of)
        .visible_to(role);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print_dashboard(&metrics);
    }
    Ok(())
}

fn print_dashboard(metrics: &DashboardMetrics) {
    let mut summary = Table::new();
    summary.set_header(vec!["Metric", "Value"]);
    summary.add_row(vec!["As of".to_string(), metrics.as_of.to_string()]);
    summary.add_row(vec!["Members".to_string(), metrics.total_members.to_string()]);
    for entry in &metrics.members_by_status {
        summary.add_row(vec![format!("  {}", entry.status), entry.count.to_string()]);
    }
    summary.add_row(vec!["Checked in today".to_string(), metrics.checked_in_today.to_string()]);
    if !metrics.financials_hidden {
        summary.add_row(vec!["Revenue (MTD)".to_string(), metrics.month_to_date_revenue.to_string()]);
        summary.add_row(vec!["  from guests".to_string(), metrics.guest_revenue_mtd.to_string()]);
        summary.add_row(vec!["Inventory value".to_string(), metrics.inventory_value.to_string()]);
    }
    println!("{summary}");

    if !metrics.revenue_breakdown.is_empty() {
        let mut breakdown = Table::new();
        breakdown.set_header(vec!["Type", "Transactions", "Amount"]);
        for entry in &metrics.revenue_breakdown {
            breakdown.add_row(vec![
                entry.transaction_type.to_string(),
                entry.transaction_count.to_string(),
                entry.amount.to_string(),
            ]);
        }
        println!("\nRevenue by type\n{breakdown}");
    }

    if !metrics.expiring_memberships.is_empty() {
        let mut expiring = Table::new();
        expiring.set_header(vec!["Member", "Expires", "Days left"]);
        for entry in &metrics.expiring_memberships {
            expiring.add_row(vec![
                entry.member.name.clone(),
                entry.member.expiration_date.to_string(),
                entry.days_until_expiration.to_string(),
            ]);
        }
        println!("\nExpiring memberships\n{expiring}");
    }

    if !metrics.low_stock.is_empty() || !metrics.out_of_stock.is_empty() {
        let mut stock = Table::new();
        stock.set_header(vec!["Item", "Category", "Stock", "Level"]);
        for item in &metrics.out_of_stock {
            stock.add_row(vec![item.name.clone(), item.category.clone(), "0".to_string(), "OUT".to_string()]);
        }
        for item in &metrics.low_stock {
            stock.add_row(vec![item.name.clone(), item.category.clone(), item.stock.to_string(), "low".to_string()]);
        }
        println!("\nStock alerts\n{stock}");
    }

    if !metrics.recent_transactions.is_empty() {
        let mut recent = Table::new();
        recent.set_header(vec!["Date", "Type", "Amount", "Payment", "Customer"]);
        for tx in &metrics.recent_transactions {
            let customer = if tx.is_guest() { "guest" } else { "member" };
            recent.add_row(vec![
                tx.date.to_string(),
                tx.transaction_type.to_string(),
                tx.amount.to_string(),
                tx.payment_method.to_string(),
                customer.to_string(),
            ]);
        }
        println!("\nRecent transactions\n{recent}");
    }

    if metrics.financials_hidden {
        println!("\nRevenue figures are hidden for this role.");
    }
}

fn handle_classes(path: &Path) -> Result<()> {
    let snapshot = GymSnapshot::load(path)?;
    let mut table = Table::new();
    table.set_header(vec!["Id", "Class", "Trainer", "Schedule", "Seats", "Free"]);
    for class in &snapshot.classes {
        let trainer = class
            .trainer_id
            .and_then(|id| snapshot.trainer_name(id))
            .unwrap_or("-");
        table.add_row(vec![
            class.id.to_string(),
            class.name.clone(),
            trainer.to_string(),
            class.schedule.clone(),
            format!("{}/{}", class.current_enrollment, class.capacity),
            class.seats_remaining().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_audit(path: &Path) -> Result<()> {
    let snapshot = GymSnapshot::load(path)?;
    let manager = EnrollmentManager::new(snapshot.roster_store());
    let anomalies = manager.audit();
    if anomalies.is_empty() {
        println!("All class rosters match their seat counts.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Class", "Seat counter", "Enrolled"]);
    for anomaly in &anomalies {
        table.add_row(vec![
            anomaly.class_name.clone(),
            anomaly.current_enrollment.to_string(),
            anomaly.enrolled.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_enroll(args: RosterArgs, path: &Path) -> Result<()> {
    let mut snapshot = GymSnapshot::load(path)?;
    let member = snapshot
        .member(args.member)
        .ok_or_else(|| anyhow!("no member with id {}", args.member))?
        .name
        .clone();

    let manager = EnrollmentManager::new(snapshot.roster_store());
    let enrollment = manager.enroll(args.member, args.class)?;
    snapshot.absorb_rosters(manager.store());
    snapshot.save(path)?;

    println!("Enrolled {member} on {}.", enrollment.enrollment_date.format("%Y-%m-%d %H:%M"));
    Ok(())
}

fn handle_unenroll(args: RosterArgs, path: &Path) -> Result<()> {
    let mut snapshot = GymSnapshot::load(path)?;
    let manager = EnrollmentManager::new(snapshot.roster_store());
    if !manager.unenroll(args.member, args.class) {
        bail!("member {} is not enrolled in class {}", args.member, args.class);
    }
    snapshot.absorb_rosters(manager.store());
    snapshot.save(path)?;
    println!("Unenrolled.");
    Ok(())
}

fn handle_checkout(args: CheckoutArgs, path: &Path) -> Result<()> {
    let mut snapshot = GymSnapshot::load(path)?;
    let lines: Vec<CartLine> = args
        .plans
        .iter()
        .map(|&plan_id| CartLine::Plan { plan_id })
        .chain(args.items.iter().copied())
        .collect();

    let tx = snapshot.checkout(args.member, &lines, args.payment, args.date.unwrap_or_else(today))?;
    snapshot.save(path)?;
    println!("{} of {} recorded ({}).", tx.transaction_type, tx.amount, tx.id);
    Ok(())
}

fn handle_restock(args: RestockArgs, path: &Path) -> Result<()> {
    let mut snapshot = GymSnapshot::load(path)?;
    let item = snapshot
        .restock(args.item, args.quantity, args.date.unwrap_or_else(today))?
        .clone();
    snapshot.save(path)?;
    println!("{} now has {} in stock.", item.name, item.stock);
    Ok(())
}

fn handle_check_in(args: CheckInArgs, path: &Path) -> Result<()> {
    let mut snapshot = GymSnapshot::load(path)?;
    let (name, visits) = {
        let member = snapshot.check_in(args.member, Utc::now())?;
        (member.name.clone(), member.total_check_ins)
    };
    snapshot.save(path)?;
    println!("{name} checked in (visit #{visits}).");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_product_lines() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_product_line(&format!("{id}:3")).unwrap(),
            CartLine::Product { item_id: id, quantity: 3 }
        );
        assert!(parse_product_line("nonsense").is_err());
        assert!(parse_product_line(&format!("{id}:-1")).is_err());
    }

    #[test]
    fn restock_is_saved_before_it_is_reported() {
        let item_id = Uuid::new_v4();
        let snapshot = GymSnapshot {
            inventory: vec![core_types::InventoryItem {
                id: item_id,
                name: "Chalk".to_string(),
                category: "Gear".to_string(),
                stock: 2,
                price: "4.00".parse().unwrap(),
                last_restock: None,
            }],
            ..GymSnapshot::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gym.json");
        snapshot.save(&path).unwrap();

        let args = || RestockArgs { item: item_id, quantity: 10, date: None };

        // A directory in the way of the temp file makes the save fail.
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(handle_restock(args(), &path).is_err());
        assert_eq!(GymSnapshot::load(&path).unwrap().inventory[0].stock, 2);

        std::fs::remove_dir(path.with_extension("json.tmp")).unwrap();
        handle_restock(args(), &path).unwrap();
        assert_eq!(GymSnapshot::load(&path).unwrap().inventory[0].stock, 12);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
