//! Database seeder for LedgerBridge development and testing.
//!
//! Seeds a demo company with its chart of accounts, a cost center, and a
//! few customers, suppliers and items, so every endpoint can be exercised
//! against a local database. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use ledgerbridge_core::master::{CompanyDefaults, MasterRecordPlan};
use ledgerbridge_db::MasterRepository;

/// Demo company name (matches the example configuration's default company).
const DEMO_COMPANY: &str = "Acme Ltd";

/// Accounts of the demo company with their account types.
const ACCOUNTS: &[(&str, Option<&str>)] = &[
    ("Cash - ACME", Some("Cash")),
    ("Bank - ACME", Some("Bank")),
    ("Debtors - ACME", Some("Receivable")),
    ("Creditors - ACME", Some("Payable")),
    ("Sales - ACME", Some("Income Account")),
    ("Cost of Goods Sold - ACME", Some("Cost of Goods Sold")),
    ("Office Rent - ACME", Some("Expense Account")),
    ("VAT - ACME", Some("Tax")),
    ("Capital Stock - ACME", Some("Equity")),
];

/// Main cost center of the demo company.
const COST_CENTER: &str = "Main - ACME";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = ledgerbridge_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    let masters = MasterRepository::new(db);

    println!("Seeding chart of accounts...");
    seed_accounts(&masters).await;

    println!("Seeding demo company...");
    seed_company(&masters).await;

    println!("Seeding parties and items...");
    seed_parties_and_items(&masters).await;

    println!("Seeding complete!");
}

/// Seeds the demo company's accounts and cost center.
///
/// Runs before the company update so its defaults point at existing rows.
async fn seed_accounts(masters: &MasterRepository) {
    // The company row must exist before accounts reference it
    if let Err(e) = masters.upsert_company(&CompanyDefaults::named(DEMO_COMPANY)).await {
        eprintln!("Failed to insert company: {e}");
        return;
    }

    for (name, account_type) in ACCOUNTS {
        if let Err(e) = masters.ensure_account(name, DEMO_COMPANY, *account_type).await {
            eprintln!("Failed to insert account {name}: {e}");
        }
    }
    println!("  Ensured {} accounts", ACCOUNTS.len());

    if let Err(e) = masters.ensure_cost_center(COST_CENTER, DEMO_COMPANY).await {
        eprintln!("Failed to insert cost center: {e}");
    } else {
        println!("  Ensured cost center: {COST_CENTER}");
    }
}

/// Points the demo company's posting defaults at the seeded accounts.
async fn seed_company(masters: &MasterRepository) {
    let company = CompanyDefaults {
        default_receivable_account: Some("Debtors - ACME".to_string()),
        default_payable_account: Some("Creditors - ACME".to_string()),
        default_cash_account: Some("Cash - ACME".to_string()),
        default_cost_center: Some(COST_CENTER.to_string()),
        ..CompanyDefaults::named(DEMO_COMPANY)
    };

    if let Err(e) = masters.upsert_company(&company).await {
        eprintln!("Failed to update company defaults: {e}");
    } else {
        println!("  Configured company: {DEMO_COMPANY}");
    }
}

/// Seeds a few customers, suppliers and items.
async fn seed_parties_and_items(masters: &MasterRepository) {
    let mut plan = MasterRecordPlan::default();
    for customer in ["Jane Doe", "Globex Corporation"] {
        plan.add_customer(customer);
    }
    for supplier in ["Widgets Co", "Office Supplies Inc"] {
        plan.add_supplier(supplier);
    }
    plan.add_item("CONSULTING", Some("Consulting Hour"), Some("Services"));
    plan.add_item("WIDGET-01", Some("Standard Widget"), Some("Products"));
    plan.add_item("PAPER-A4", Some("A4 Paper Ream"), None);

    match masters.apply_plan(&plan).await {
        Ok(inserted) => println!("  Inserted {inserted} master records"),
        Err(e) => eprintln!("Failed to insert master records: {e}"),
    }
}
