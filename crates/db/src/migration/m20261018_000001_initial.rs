//! Initial schema: master data, documents and naming series.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(MASTERS_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const MASTERS_SQL: &str = r"
CREATE TABLE companies (
    name TEXT PRIMARY KEY,
    default_currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    default_receivable_account TEXT,
    default_payable_account TEXT,
    default_cash_account TEXT,
    default_cost_center TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE accounts (
    name TEXT PRIMARY KEY,
    company TEXT NOT NULL REFERENCES companies(name) ON DELETE CASCADE,
    account_type TEXT,
    is_group BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_company ON accounts(company);

CREATE TABLE cost_centers (
    name TEXT PRIMARY KEY,
    company TEXT NOT NULL REFERENCES companies(name) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE customers (
    name TEXT PRIMARY KEY,
    customer_type TEXT NOT NULL DEFAULT 'Individual',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE suppliers (
    name TEXT PRIMARY KEY,
    supplier_type TEXT NOT NULL DEFAULT 'Individual',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE items (
    item_code TEXT PRIMARY KEY,
    item_name TEXT NOT NULL,
    item_group TEXT NOT NULL DEFAULT 'All Item Groups',
    is_stock_item BOOLEAN NOT NULL DEFAULT true,
    is_sales_item BOOLEAN NOT NULL DEFAULT true,
    is_purchase_item BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE naming_series (
    prefix TEXT PRIMARY KEY,
    current BIGINT NOT NULL CHECK (current >= 0)
);

CREATE TABLE documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    doctype TEXT NOT NULL,
    name TEXT NOT NULL,
    docstatus SMALLINT NOT NULL DEFAULT 0 CHECK (docstatus IN (0, 1, 2)),
    amended_from TEXT,
    company TEXT,
    posting_date DATE NOT NULL,
    payload JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_documents_doctype_name UNIQUE (doctype, name)
);

CREATE INDEX idx_documents_company ON documents(company, doctype);
CREATE INDEX idx_documents_amended_from ON documents(doctype, amended_from)
    WHERE amended_from IS NOT NULL;
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS naming_series CASCADE;
DROP TABLE IF EXISTS items CASCADE;
DROP TABLE IF EXISTS suppliers CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS cost_centers CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
";
