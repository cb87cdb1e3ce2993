//! Beverage Distribution Console - command line front end
//!
//! Signs in, runs one command against the ledger and signs out again.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use shared::{format_money, MovementFilter, MovementKind, SessionContext, StockFilter, StockStateFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bdc_console::drafts::{read_draft, ExitDraft, InvoiceDraft};
use bdc_console::external::{
    ApiClient, AuthClient, Credentials, DirectoryApi, DirectoryClient, LedgerApi, LedgerClient,
};
use bdc_console::services::{stock_report, InvoiceEntry, MovementService, StockExit, StockService};
use bdc_console::{Config, ConsoleError};

#[derive(Parser)]
#[command(name = "bdc-console", about = "Invoice intake and stock valuation console", version)]
struct Cli {
    #[arg(long, env = "BDC_USERNAME", global = true, help = "Account used to sign in")]
    username: Option<String>,

    #[arg(long, env = "BDC_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current stock with inventory values
    Stock(StockArgs),
    /// Products with low or depleted stock
    Alerts,
    /// Entry and exit history
    Movements(MovementArgs),
    /// Check whether an invoice number is already registered
    CheckInvoice { invoice_number: String },
    /// Register a supplier invoice prepared as JSON
    SubmitInvoice { file: PathBuf },
    /// Register a manual exit prepared as JSON
    SubmitExit { file: PathBuf },
    /// Write the stock listing as CSV
    ExportStock(ExportArgs),
}

#[derive(Args)]
struct StockArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    group: Option<String>,
    #[arg(long, value_parser = parse_state)]
    state: Option<StockStateFilter>,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
struct MovementArgs {
    #[arg(long, value_parser = parse_kind)]
    kind: Option<MovementKind>,
    #[arg(long)]
    product: Option<String>,
    #[arg(long)]
    from: Option<chrono::NaiveDate>,
    #[arg(long)]
    to: Option<chrono::NaiveDate>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 20)]
    per_page: u32,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long, short, help = "Output file; stdout when omitted")]
    output: Option<PathBuf>,
}

fn parse_state(raw: &str) -> Result<StockStateFilter, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| format!("unknown stock state '{}'", raw))
}

fn parse_kind(raw: &str) -> Result<MovementKind, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| format!("unknown movement kind '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load()?;
    init_tracing(&config);

    tracing::info!("Starting Beverage Distribution Console");
    tracing::info!("Environment: {}", config.environment);

    let api = ApiClient::from_config(&config)?;
    let auth = AuthClient::new(api.clone());
    let ledger = LedgerClient::new(api.clone());
    let directory = DirectoryClient::new(api);

    let credentials = Credentials::new(
        cli.username.clone().unwrap_or_default(),
        cli.password.clone().unwrap_or_default(),
    );
    let session = auth.login(&credentials).await.map_err(report)?;

    let outcome = run(&cli, &config, &session, &ledger, &directory).await;

    if let Err(e) = auth.logout(session).await {
        tracing::warn!(error = %e, "logout failed");
    }
    outcome.map_err(report)
}

fn init_tracing(config: &Config) {
    let filter = config
        .logging
        .filter
        .clone()
        .map(tracing_subscriber::EnvFilter::new)
        .or_else(|| tracing_subscriber::EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| "bdc_console=debug,reqwest=warn".into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Turn a console error into the message the user sees
fn report(error: ConsoleError) -> anyhow::Error {
    let detail = error.detail();
    match detail.line {
        Some(line) => anyhow::anyhow!("[{}] {} (line {})", detail.code, detail.message, line + 1),
        None => anyhow::anyhow!("[{}] {}", detail.code, detail.message),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(
    cli: &Cli,
    config: &Config,
    session: &SessionContext,
    ledger: &LedgerClient,
    directory: &DirectoryClient,
) -> Result<(), ConsoleError> {
    let currency = config.display.currency.as_str();

    match &cli.command {
        Commands::Stock(args) => {
            let filter = StockFilter {
                category: args.category.as_deref().map(Into::into),
                supplier: args.supplier.as_deref().map(Into::into),
                group: args.group.as_deref().map(Into::into),
                owner: None,
                state_filter: args.state,
                text_search: args.search.clone(),
            };
            let overview = StockService::new(ledger.clone()).overview(session, &filter).await?;

            if cli.json {
                return print_json(&overview).map_err(|e| ConsoleError::Export(e.to_string()));
            }
            for p in &overview.products {
                println!(
                    "{:<12} {:<32} {:>10} {:>12} {:>14}  {}",
                    p.code.as_deref().unwrap_or("-"),
                    p.name,
                    p.on_hand,
                    format_money(p.sale_price, currency),
                    format_money(p.inventory_value(), currency),
                    p.classification()
                );
            }
            let s = &overview.summary;
            println!(
                "\n{} products, {} units, value {} | high {} medium {} low {} depleted {}",
                s.product_count,
                s.total_units,
                format_money(s.total_value, currency),
                s.high,
                s.medium,
                s.low,
                s.depleted
            );
        }

        Commands::Alerts => {
            let alerts = StockService::new(ledger.clone()).alerts(session).await?;
            if cli.json {
                return print_json(&alerts).map_err(|e| ConsoleError::Export(e.to_string()));
            }
            if alerts.is_empty() {
                println!("No products need restocking");
            }
            for p in &alerts {
                println!("{:<32} {:>10}  {}", p.name, p.on_hand, p.classification());
            }
        }

        Commands::Movements(args) => {
            let filter = MovementFilter {
                kind: args.kind,
                product: args.product.as_deref().map(Into::into),
                from: args.from,
                to: args.to,
                text_search: None,
                page: args.page,
                per_page: args.per_page,
            };
            let page = MovementService::new(ledger.clone()).history(session, &filter).await?;

            if cli.json {
                return print_json(&page).map_err(|e| ConsoleError::Export(e.to_string()));
            }
            for m in &page.movements {
                println!(
                    "{}  {:<5} {:<32} {:>10} {:>14}  {}",
                    m.occurred_at,
                    m.kind.to_string(),
                    m.product_name.as_deref().unwrap_or("-"),
                    m.quantity,
                    m.total.map(|t| format_money(t, currency)).unwrap_or_default(),
                    m.reference.as_deref().unwrap_or("")
                );
            }
            println!(
                "\nPage {}/{} | entries {} ({}) exits {} ({}) net {}",
                page.pagination.page,
                page.pagination.total_pages,
                page.stats.total_entries,
                format_money(page.stats.entry_value, currency),
                page.stats.total_exits,
                format_money(page.stats.exit_value, currency),
                format_money(page.stats.net_value(), currency)
            );
        }

        Commands::CheckInvoice { invoice_number } => {
            let exists = ledger.invoice_number_exists(session, invoice_number).await?;
            if exists {
                println!("Invoice {} is already registered", invoice_number.trim());
            } else {
                println!("Invoice {} is available", invoice_number.trim());
            }
        }

        Commands::SubmitInvoice { file } => {
            let draft = InvoiceDraft::from_json(&read_draft(file)?)?;
            let catalog = directory.list_products(session, None).await?;

            let mut entry = InvoiceEntry::new();
            for warning in draft.apply(&mut entry, &catalog)? {
                eprintln!("warning: {}", warning);
            }
            let receipt = entry.submit(ledger, session).await?;
            println!(
                "Invoice registered (id {}) total {}",
                receipt.invoice_id,
                format_money(receipt.total, currency)
            );
        }

        Commands::SubmitExit { file } => {
            let draft = ExitDraft::from_json(&read_draft(file)?)?;
            let stock = ledger.query_stock(session, &StockFilter::default()).await?;

            let mut exit = StockExit::new();
            for warning in draft.apply(&mut exit, &stock)? {
                eprintln!("warning: {}", warning);
            }
            let receipt = exit.submit(ledger, session).await?;
            println!(
                "Exit registered: {} products, value {}",
                receipt.total_products,
                format_money(receipt.total_value, currency)
            );
        }

        Commands::ExportStock(args) => {
            let products = StockService::new(ledger.clone())
                .list(session, &StockFilter::default())
                .await?;
            let csv = stock_report(&products)?;
            match &args.output {
                Some(path) => {
                    std::fs::write(path, csv)
                        .map_err(|e| ConsoleError::Export(format!("{}: {}", path.display(), e)))?;
                    tracing::info!(path = %path.display(), rows = products.len(), "stock exported");
                }
                None => print!("{}", csv),
            }
        }
    }

    Ok(())
}
