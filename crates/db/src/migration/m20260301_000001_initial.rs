//! Initial database migration.
//!
//! Creates the ledger detail and sales fact tables read by the reports.
//! Both tables are owned by the upstream ERP export; reporting never writes them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: LEDGER DETAIL
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(LEDGER_IMMUTABILITY_SQL).await?;

        // ============================================================
        // PART 3: SALES FACTS
        // ============================================================
        db.execute_unprepared(SALES_FACTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE ledger_type AS ENUM ('ar', 'ap');
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id BIGSERIAL PRIMARY KEY,
    ledger_type ledger_type NOT NULL,
    invoice_no VARCHAR(50),
    party_no VARCHAR(50) NOT NULL,
    entry_type VARCHAR(20) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    due_date DATE,
    entry_date DATE NOT NULL,
    is_historical BOOLEAN,
    is_deleted TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_le_active_invoice ON ledger_entries(ledger_type, party_no, invoice_no)
    WHERE is_deleted IS NULL AND is_historical IS NOT TRUE;
CREATE INDEX idx_le_entry_date ON ledger_entries(ledger_type, entry_date);
";

const LEDGER_IMMUTABILITY_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_ledger_rewrite
-- Entries are append-only; only the historical and deleted flags may change
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_ledger_rewrite()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.amount <> OLD.amount
        OR NEW.ledger_type <> OLD.ledger_type
        OR NEW.party_no <> OLD.party_no
        OR NEW.invoice_no IS DISTINCT FROM OLD.invoice_no
        OR NEW.entry_date <> OLD.entry_date THEN
        RAISE EXCEPTION 'Ledger entries are immutable. Post an adjusting entry instead.';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_ledger_rewrite
BEFORE UPDATE ON ledger_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_ledger_rewrite();
";

const SALES_FACTS_SQL: &str = r"
CREATE TABLE sales_facts (
    id BIGSERIAL PRIMARY KEY,
    customer_no VARCHAR(50) NOT NULL,
    customer_name VARCHAR(255) NOT NULL,
    invoice_no VARCHAR(50) NOT NULL,
    invoice_date DATE NOT NULL,
    revenue NUMERIC(19, 4) NOT NULL DEFAULT 0,
    cost NUMERIC(19, 4) NOT NULL DEFAULT 0,
    labor_hours NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_sf_invoice_date ON sales_facts(invoice_date, customer_no);
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_prevent_ledger_rewrite ON ledger_entries;
DROP FUNCTION IF EXISTS prevent_ledger_rewrite();

DROP TABLE IF EXISTS sales_facts CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;

DROP TYPE IF EXISTS ledger_type CASCADE;
";
