//! Initial database migration.
//!
//! Creates every table of the cooperative backend. Enum columns are
//! plain VARCHAR values validated at the application layer, which keeps
//! later additions a data change rather than a type migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // Tenant and staff
        db.execute_unprepared(COOPERATIVES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(MEMBERS_SQL).await?;

        // Bookkeeping
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // Savings
        db.execute_unprepared(SAVINGS_TRANSACTIONS_SQL).await?;

        // Point of sale
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(SALE_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const COOPERATIVES_SQL: &str = r"
CREATE TABLE cooperatives (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    address TEXT,
    phone VARCHAR(32),
    email VARCHAR(255),
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    username VARCHAR(100) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(16) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_cooperative ON users(cooperative_id);
";

const MEMBERS_SQL: &str = r"
CREATE TABLE members (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    member_number VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    national_id VARCHAR(32),
    phone VARCHAR(32),
    address TEXT,
    join_date DATE NOT NULL,
    pin_hash VARCHAR(255),
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (cooperative_id, member_number)
);

CREATE INDEX idx_members_cooperative ON members(cooperative_id) WHERE active = true;
CREATE INDEX idx_members_name ON members(cooperative_id, name);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type VARCHAR(16) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (cooperative_id, code)
);

CREATE INDEX idx_accounts_cooperative ON accounts(cooperative_id);
CREATE INDEX idx_accounts_type ON accounts(cooperative_id, account_type);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    journal_number VARCHAR(30) NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    source VARCHAR(16) NOT NULL,
    status VARCHAR(16) NOT NULL,
    reverses_entry_id UUID REFERENCES journal_entries(id),
    reversed_by_entry_id UUID REFERENCES journal_entries(id),
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (cooperative_id, journal_number)
);

CREATE INDEX idx_journal_entries_date ON journal_entries(cooperative_id, entry_date);
CREATE INDEX idx_journal_entries_source ON journal_entries(cooperative_id, source);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(15, 2) NOT NULL DEFAULT 0,
    credit NUMERIC(15, 2) NOT NULL DEFAULT 0,
    memo VARCHAR(255),
    CONSTRAINT chk_one_side CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    )
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(journal_entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const SAVINGS_TRANSACTIONS_SQL: &str = r"
CREATE TABLE savings_transactions (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    member_id UUID NOT NULL REFERENCES members(id),
    reference_number VARCHAR(30) NOT NULL,
    savings_type VARCHAR(16) NOT NULL,
    direction VARCHAR(16) NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    transaction_date DATE NOT NULL,
    note VARCHAR(255),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id),
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_savings_amount CHECK (amount > 0),
    UNIQUE (cooperative_id, reference_number)
);

CREATE INDEX idx_savings_member ON savings_transactions(member_id, transaction_date);
CREATE INDEX idx_savings_cooperative ON savings_transactions(cooperative_id, transaction_date);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    barcode VARCHAR(64),
    selling_price NUMERIC(15, 2) NOT NULL,
    cost_price NUMERIC(15, 2) NOT NULL,
    stock BIGINT NOT NULL DEFAULT 0,
    low_stock_threshold BIGINT NOT NULL DEFAULT 0,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_stock_nonnegative CHECK (stock >= 0),
    CONSTRAINT chk_prices_nonnegative CHECK (selling_price >= 0 AND cost_price >= 0)
);

CREATE UNIQUE INDEX idx_products_barcode ON products(cooperative_id, barcode)
    WHERE barcode IS NOT NULL;
CREATE INDEX idx_products_cooperative ON products(cooperative_id) WHERE active = true;
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    cooperative_id UUID NOT NULL REFERENCES cooperatives(id) ON DELETE CASCADE,
    sale_number VARCHAR(30) NOT NULL,
    sale_date DATE NOT NULL,
    cashier_id UUID NOT NULL REFERENCES users(id),
    member_id UUID REFERENCES members(id),
    total NUMERIC(15, 2) NOT NULL,
    paid NUMERIC(15, 2) NOT NULL,
    change NUMERIC(15, 2) NOT NULL,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_paid_covers_total CHECK (paid >= total),
    UNIQUE (cooperative_id, sale_number)
);

CREATE INDEX idx_sales_date ON sales(cooperative_id, sale_date);
CREATE INDEX idx_sales_member ON sales(member_id) WHERE member_id IS NOT NULL;
";

const SALE_ITEMS_SQL: &str = r"
CREATE TABLE sale_items (
    id UUID PRIMARY KEY,
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products(id),
    product_name VARCHAR(255) NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price NUMERIC(15, 2) NOT NULL,
    unit_cost NUMERIC(15, 2) NOT NULL,
    subtotal NUMERIC(15, 2) NOT NULL,
    CONSTRAINT chk_quantity_positive CHECK (quantity > 0)
);

CREATE INDEX idx_sale_items_sale ON sale_items(sale_id);
CREATE INDEX idx_sale_items_product ON sale_items(product_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS sale_items CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS savings_transactions CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS members CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS cooperatives CASCADE;
";
