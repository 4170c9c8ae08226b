//! Shared fixtures for database integration tests.
//!
//! Tests need a migrated PostgreSQL database named by `DATABASE_URL`
//! (`cargo run -p ledgerbridge-migrator -- up`). Without it they are skipped.

#![allow(dead_code)]

use chrono::NaiveDate;
use ledgerbridge_core::master::CompanyDefaults;
use ledgerbridge_db::MasterRepository;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

/// Connects to the test database, or returns `None` when none is configured.
pub async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

/// A company with its own chart of accounts, unique per test.
pub struct TestCompany {
    pub name: String,
    pub cash: String,
    pub sales: String,
    pub debtors: String,
    pub creditors: String,
}

/// Creates a company with cash, sales, debtors and creditors accounts.
pub async fn create_company(db: &DatabaseConnection) -> TestCompany {
    let name = format!("Test Co {}", Uuid::new_v4().simple());
    let company = TestCompany {
        cash: format!("Cash - {name}"),
        sales: format!("Sales - {name}"),
        debtors: format!("Debtors - {name}"),
        creditors: format!("Creditors - {name}"),
        name,
    };

    let repo = MasterRepository::new(db.clone());
    repo.upsert_company(&CompanyDefaults::named(&company.name))
        .await
        .expect("Failed to create company");
    for (account, kind) in [
        (&company.cash, "Cash"),
        (&company.sales, "Income Account"),
        (&company.debtors, "Receivable"),
        (&company.creditors, "Payable"),
    ] {
        repo.ensure_account(account, &company.name, Some(kind))
            .await
            .expect("Failed to create account");
    }
    repo.upsert_company(&CompanyDefaults {
        default_receivable_account: Some(company.debtors.clone()),
        default_payable_account: Some(company.creditors.clone()),
        default_cash_account: Some(company.cash.clone()),
        ..CompanyDefaults::named(&company.name)
    })
    .await
    .expect("Failed to set company defaults");

    company
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
