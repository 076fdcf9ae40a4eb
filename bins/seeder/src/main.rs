//! Database seeder for Tally development and testing.
//!
//! Seeds a demo dealership: receivables and payables detail with partial
//! payments, undated and archived rows, plus two years of sales facts with a
//! mix of healthy, thin and losing customers.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Days, Months, NaiveDate, Utc};
use fake::Fake;
use fake::faker::company::en::CompanyName;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tally_db::entities::{ledger_entries, sales_facts, sea_orm_active_enums::LedgerType};
use tally_shared::config::DatabaseConfig;

const CUSTOMERS: u32 = 40;
const VENDORS: u32 = 10;
const INVOICES_PER_PARTY: u32 = 6;
const SALES_MONTHS: u32 = 24;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = tally_db::connect(&DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .context("Failed to connect to database")?;

    let today = Utc::now().date_naive();

    if ledger_entries::Entity::find().count(&db).await? > 0 {
        println!("  Ledger already seeded, skipping...");
    } else {
        println!("Seeding receivables...");
        let ar = seed_ledger(&db, LedgerType::Ar, "C", CUSTOMERS, today).await?;
        println!("  Inserted {ar} AR entries");

        println!("Seeding payables...");
        let ap = seed_ledger(&db, LedgerType::Ap, "V", VENDORS, today).await?;
        println!("  Inserted {ap} AP entries");
    }

    if sales_facts::Entity::find().count(&db).await? > 0 {
        println!("  Sales facts already seeded, skipping...");
    } else {
        println!("Seeding sales facts...");
        let facts = seed_sales_facts(&db, today).await?;
        println!("  Inserted {facts} sales facts");
    }

    println!("Seeding complete!");
    Ok(())
}

fn party_no(prefix: &str, n: u32) -> String {
    format!("{prefix}{n:04}")
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days))).unwrap_or(date)
}

#[allow(clippy::too_many_arguments)]
fn ledger_row(
    ledger_type: LedgerType,
    invoice_no: Option<String>,
    party_no: &str,
    entry_type: &str,
    amount: Decimal,
    due_date: Option<NaiveDate>,
    entry_date: NaiveDate,
    is_historical: Option<bool>,
) -> ledger_entries::ActiveModel {
    ledger_entries::ActiveModel {
        id: NotSet,
        ledger_type: Set(ledger_type),
        invoice_no: Set(invoice_no),
        party_no: Set(party_no.to_string()),
        entry_type: Set(entry_type.to_string()),
        amount: Set(amount),
        due_date: Set(due_date),
        entry_date: Set(entry_date),
        is_historical: Set(is_historical),
        is_deleted: Set(None),
        created_at: Set(Utc::now().into()),
    }
}

/// Seeds charges, payments and a few awkward rows for one ledger.
async fn seed_ledger(
    db: &DatabaseConnection,
    ledger_type: LedgerType,
    prefix: &str,
    parties: u32,
    today: NaiveDate,
) -> anyhow::Result<usize> {
    let mut rows = Vec::new();
    let invoice_prefix = match ledger_type {
        LedgerType::Ar => "INV",
        LedgerType::Ap => "BILL",
    };

    for p in 1..=parties {
        let party = party_no(prefix, p);

        for i in 0..INVOICES_PER_PARTY {
            let seq = p * 100 + i;
            let invoice_no = format!("{invoice_prefix}-{seq:06}");
            // Spread due dates from 30 days ahead to about 200 days past.
            let age = (seq * 37) % 230;
            let due = days_before(today, age).checked_add_days(Days::new(30));
            let booked = days_before(today, age);
            let amount = cents(i64::from(5_000 + (seq * 7_919) % 250_000));

            // Every fifth invoice has no due date on the ERP side.
            let due = if seq % 5 == 0 { None } else { due };
            rows.push(ledger_row(
                ledger_type,
                Some(invoice_no.clone()),
                &party,
                "charge",
                amount,
                due,
                booked,
                None,
            ));

            match seq % 4 {
                // Paid in full.
                0 => rows.push(ledger_row(
                    ledger_type,
                    Some(invoice_no),
                    &party,
                    "payment",
                    -amount,
                    None,
                    days_before(today, age / 2),
                    Some(false),
                )),
                // Partially paid.
                1 => rows.push(ledger_row(
                    ledger_type,
                    Some(invoice_no),
                    &party,
                    "payment",
                    -(amount / Decimal::TWO).round_dp(2),
                    None,
                    days_before(today, age / 3),
                    None,
                )),
                // Credit memo archived to history.
                2 => rows.push(ledger_row(
                    ledger_type,
                    Some(invoice_no),
                    &party,
                    "credit",
                    cents(-2_500),
                    None,
                    booked,
                    Some(true),
                )),
                _ => {}
            }
        }

        if p % 7 == 0 {
            // Unapplied cash without an invoice number.
            rows.push(ledger_row(
                ledger_type,
                None,
                &party,
                "payment",
                cents(-10_000),
                None,
                days_before(today, 3),
                None,
            ));
        }
    }

    // One voided charge that every read must ignore.
    let mut voided = ledger_row(
        ledger_type,
        Some(format!("{invoice_prefix}-VOID01")),
        &party_no(prefix, 1),
        "charge",
        cents(99_999),
        Some(days_before(today, 90)),
        days_before(today, 120),
        None,
    );
    voided.is_deleted = Set(Some(Utc::now().into()));
    rows.push(voided);

    let count = rows.len();
    for chunk in rows.chunks(500) {
        ledger_entries::Entity::insert_many(chunk.to_vec())
            .exec(db)
            .await?;
    }
    Ok(count)
}

/// Seeds monthly sales facts with per-customer cost ratios.
async fn seed_sales_facts(db: &DatabaseConnection, today: NaiveDate) -> anyhow::Result<usize> {
    let mut rows = Vec::new();

    for c in 1..=CUSTOMERS {
        let customer_no = party_no("C", c);
        let customer_name: String = CompanyName().fake();
        // Cost ratio in percent: most customers healthy, a tail losing money.
        let cost_ratio = i64::from(55 + (c * 13) % 55);
        // Small accounts every eighth customer.
        let base_revenue: i64 = if c % 8 == 0 { 60_000 } else { 900_000 };

        for m in 0..SALES_MONTHS {
            let Some(invoice_date) = today.checked_sub_months(Months::new(m)) else {
                continue;
            };
            let revenue = base_revenue + i64::from((c * 3_137 + m * 211) % 50_000);
            let cost = revenue * cost_ratio / 100;

            rows.push(sales_facts::ActiveModel {
                id: NotSet,
                customer_no: Set(customer_no.clone()),
                customer_name: Set(customer_name.clone()),
                invoice_no: Set(format!("S-{c:04}-{m:02}")),
                invoice_date: Set(invoice_date),
                revenue: Set(cents(revenue)),
                cost: Set(cents(cost)),
                labor_hours: Set(cents(i64::from(200 + (c * m) % 1_500))),
                created_at: Set(Utc::now().into()),
            });
        }
    }

    let count = rows.len();
    for chunk in rows.chunks(500) {
        sales_facts::Entity::insert_many(chunk.to_vec()).exec(db).await?;
    }
    Ok(count)
}
