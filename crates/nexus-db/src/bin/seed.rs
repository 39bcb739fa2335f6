//! # Seed Data Generator
//!
//! Populates the database with demo clients, invoices and payments.
//!
//! ## Usage
//! ```bash
//! # 8 clients for the default demo owner
//! cargo run -p nexus-db --bin seed
//!
//! # Custom amount, owner and path
//! cargo run -p nexus-db --bin seed -- --clients 20 --owner me --db ./data/nexus.db
//! ```
//!
//! ## Generated Data
//! For each client, three invoices spread across the last six months:
//! - a paid invoice with a settled payment
//! - a sent invoice with a partial payment
//! - a draft or overdue invoice with no payments

use chrono::{Duration, Utc};
use std::env;

use nexus_core::draft::DraftLineItem;
use nexus_core::{InvoiceDraft, InvoiceStatus, Money, NewClient, NewPayment, PaymentStatus};
use nexus_db::{Database, DbConfig};

/// Client names for realistic demo data
const CLIENTS: &[(&str, &str)] = &[
    ("Acme Corporation", "Acme Corp"),
    ("Blue Harbor Studio", "Blue Harbor"),
    ("Cedar & Pine Legal", "Cedar & Pine"),
    ("Delta Logistics", "Delta"),
    ("Evergreen Dental", "Evergreen"),
    ("Foxglove Bakery", "Foxglove"),
    ("Granite Fitness", "Granite"),
    ("Harbor Light Media", "Harbor Light"),
    ("Ironwood Architects", "Ironwood"),
    ("Juniper Health", "Juniper"),
];

/// Line item catalog: (description, rate in cents)
const SERVICES: &[(&str, i64)] = &[
    ("Web development services", 9_500),
    ("UX design workshop", 120_000),
    ("Monthly hosting", 4_900),
    ("SEO audit", 65_000),
    ("Content writing (per article)", 18_000),
    ("Support retainer", 250_000),
];

/// Tax rates as typed into the form
const TAX_RATES: &[f64] = &[0.0, 5.0, 8.25, 10.0];

const DEFAULT_OWNER: &str = "demo-user";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 8;
    let mut db_path = String::from("./nexus_dev.db");
    let mut owner = String::from(DEFAULT_OWNER);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--clients" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(8);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Nexus Invoicing Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --clients <N>  Number of clients to generate (default: 8)");
                println!("  -d, --db <PATH>    Database file path (default: ./nexus_dev.db)");
                println!("  -o, --owner <ID>   Owner user id (default: demo-user)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Nexus Invoicing Seed Data Generator");
    println!("=====================================");
    println!("Database: {}", db_path);
    println!("Owner:    {}", owner);
    println!("Clients:  {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.clients().count_active(&owner).await?;
    if existing > 0 {
        println!("⚠ Owner already has {} clients", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let now = Utc::now();
    let mut invoices = 0;
    let mut payments = 0;

    for seed in 0..count {
        let (name, company) = CLIENTS[seed % CLIENTS.len()];
        let client = db
            .clients()
            .insert(
                &owner,
                &NewClient {
                    name: name.to_string(),
                    email: format!(
                        "billing{}@{}.test",
                        seed,
                        company.to_lowercase().replace([' ', '&'], "")
                    ),
                    company: Some(company.to_string()),
                    ..NewClient::default()
                },
            )
            .await?;

        for (slot, status) in [InvoiceStatus::Paid, InvoiceStatus::Sent, InvoiceStatus::Draft]
            .into_iter()
            .enumerate()
        {
            let issued = now - Duration::days(((seed * 23 + slot * 41) % 170) as i64);
            let mut draft = InvoiceDraft::new(issued);
            draft.client_id = Some(client.id.clone());
            draft.due_date = Some(issued + Duration::days(30));
            draft.tax_rate = TAX_RATES[(seed + slot) % TAX_RATES.len()];
            draft.items = (0..=(seed + slot) % 3)
                .map(|n| {
                    let (description, rate) = SERVICES[(seed + slot + n) % SERVICES.len()];
                    DraftLineItem::new(description, (1 + n) as f64, Money::from_cents(rate))
                })
                .collect();

            let mut submission = draft.commit()?;
            submission.invoice.status = status;
            let total = submission.invoice.total;

            let invoice = db
                .invoices()
                .insert_with_items(&owner, &submission.invoice, &submission.items)
                .await?;
            invoices += 1;

            let paid_amount = match status {
                InvoiceStatus::Paid => total,
                InvoiceStatus::Sent => total.half(),
                _ => continue,
            };
            db.payments()
                .insert(
                    &owner,
                    &NewPayment {
                        invoice_id: invoice.id.clone(),
                        amount: paid_amount,
                        payment_status: PaymentStatus::Paid,
                        method: Some("card".to_string()),
                        transaction_id: Some(format!("seed_{}_{}", seed, slot)),
                        notes: None,
                        paid_at: Some((issued + Duration::days(7)).min(now)),
                    },
                )
                .await?;
            payments += 1;
        }
    }

    println!();
    println!("✓ Generated {} invoices and {} payments", invoices, payments);
    println!("✓ Seed complete!");

    Ok(())
}
