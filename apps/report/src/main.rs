//! # Nexus Report
//!
//! Prints the dashboard and analytics numbers for the configured owner.
//!
//! ## Usage
//! ```bash
//! # Dashboard + analytics using nexus.toml from the platform config dir
//! cargo run -p nexus-report
//!
//! # Explicit config, also show the saved invoice draft
//! cargo run -p nexus-report -- --config ./nexus.toml --draft
//!
//! # Start a mock checkout for $25.00 against an invoice
//! cargo run -p nexus-report -- pay <invoice-id> 2500
//! ```
//!
//! ## Startup Sequence
//! ```text
//! Cli::parse ──► init_tracing ──► LedgerConfig::load_or_default ──► Database::new (migrations)
//!        │
//!        ▼
//! StoreSource + SessionCaches ──► DashboardService / AnalyticsService
//! ```

use std::error::Error;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing::info;

use nexus_core::Money;
use nexus_db::Database;
use nexus_ledger::{
    init_tracing, AnalyticsService, DashboardService, DraftStore, FileScratchStore, LedgerConfig,
    MockChargeInitiator, PaymentAggregator, PaymentFlow, SessionCaches, StoreSource,
};

use crate::cli::{Cli, Command};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    init_tracing();

    let config = LedgerConfig::load_or_default(cli.config.clone());
    info!(owner_id = %config.owner_id(), "Starting report");

    let db = Database::new(config.database.db_config()).await?;
    let source = Arc::new(StoreSource::new(db.clone(), config.owner_id()));
    let caches = Arc::new(SessionCaches::from_settings(&config.cache));
    let now = Utc::now();

    // =========================================================================
    // Dashboard
    // =========================================================================
    let dashboard = DashboardService::new(Arc::clone(&source), Arc::clone(&caches))
        .stats(now)
        .await;

    println!("Dashboard");
    println!("=========");
    println!("Total revenue:    {}", dashboard.stats.total_revenue);
    println!("This month:       {}", dashboard.stats.monthly_revenue);
    println!("Pending invoices: {}", dashboard.stats.pending_count);
    println!("Overdue amount:   {}", dashboard.stats.overdue_amount);
    println!();
    for point in &dashboard.stats.revenue_series {
        println!("  {:<4} {}", point.label, point.revenue);
    }
    for slice in &dashboard.stats.status_breakdown {
        println!("  {:<8} {}", slice.label, slice.count);
    }
    for notice in &dashboard.notices {
        println!("⚠ {}", notice);
    }
    println!();

    // =========================================================================
    // Analytics
    // =========================================================================
    let analytics = AnalyticsService::new(Arc::clone(&source)).summary(now).await;
    let summary = &analytics.summary;

    println!("Analytics");
    println!("=========");
    println!("Clients:          {}", summary.client_count);
    println!("Invoices:         {}", summary.counts.total);
    println!("Average value:    {}", summary.average_invoice_value());
    println!("Paid rate:        {:.1}%", summary.paid_rate_percent());
    for month in &summary.months {
        println!(
            "  {:<10} {:>12}  {} paid",
            month.label, month.revenue, month.paid_invoices
        );
    }
    for notice in &analytics.notices {
        println!("⚠ {}", notice);
    }

    // =========================================================================
    // Optional sections
    // =========================================================================
    if cli.draft {
        let drafts = DraftStore::new(FileScratchStore::new(&config.drafts.dir));
        let draft = drafts.load(now);
        let totals = draft.totals();

        println!();
        println!("Saved draft ({})", draft.number_preview(now));
        println!("=====================");
        println!("Client:   {}", draft.client_id.as_deref().unwrap_or("(none)"));
        for item in &draft.items {
            println!("  {:<30} {:>5} × {}", item.description, item.quantity, item.rate);
        }
        println!("Subtotal: {}", totals.subtotal);
        println!("Tax:      {}", totals.tax_amount);
        println!("Total:    {}", totals.total);
    }

    if let Some(Command::Pay { invoice_id, cents }) = cli.command {
        let invoice = db
            .invoices()
            .get_by_id(config.owner_id(), &invoice_id)
            .await?
            .ok_or_else(|| format!("invoice not found: {}", invoice_id))?;

        let flow = PaymentFlow::new(
            PaymentAggregator::new(Arc::clone(&source), Arc::clone(&caches)),
            MockChargeInitiator::new(config.payments.checkout_base_url.clone()),
            config.payments.charge_options(),
        );
        let quote = flow.quote(&invoice).await;
        println!();
        println!("Remaining on {}: {}", invoice.display_number(), quote.remaining);

        let url = flow.pay(&invoice, Money::from_cents(cents)).await?;
        println!("Checkout: {}", url);
    }

    db.close().await;
    Ok(())
}
