use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{TransactionService, parse_payment_request};
use crate::document::DocxDocument;
use crate::domain::{
    CreateMarketTransaction, CreateResourceTransaction, CreateServiceTransaction, DataId,
    PaidTransaction, PaymentRequest, Transaction, TransactionId, TransactionKind,
    TransactionStatus, format_cents, parse_price, today,
};
use crate::io::Exporter;
use crate::logging::{LogFormat, init_logging};

/// Paybook - purchase transaction bookkeeping
#[derive(Parser)]
#[command(name = "paybook")]
#[command(about = "Record market, service and resource purchases, track their status and report on them")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "PAYBOOK_DATABASE", default_value = "paybook.db")]
    pub database: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a purchase
    #[command(subcommand)]
    Pay(PayCommands),

    /// List transactions
    List {
        /// Only this kind: market, service, resource
        #[arg(long, value_enum)]
        kind: Option<KindFilter>,

        /// Only transactions of this user
        #[arg(long)]
        user: Option<i64>,

        /// Only transactions created on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show one transaction
    Show {
        id: TransactionId,
    },

    /// Set the status of a transaction
    Status {
        id: TransactionId,

        /// New status: pending, resolved, canceled
        status: String,
    },

    /// Cancel a transaction
    Cancel {
        id: TransactionId,
    },

    /// Render an invoice for a transaction
    Invoice {
        id: TransactionId,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Document format
        #[arg(short, long, value_enum, default_value_t = InvoiceFormat::Text)]
        format: InvoiceFormat,
    },

    /// Summarize the transactions created on one day
    Report {
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export transactions to CSV or JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv (base fields only) or json (full snapshot)
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

#[derive(Subcommand)]
pub enum PayCommands {
    /// Pay for a shopping cart
    Market {
        #[arg(long)]
        user: i64,

        /// Price (e.g., "19.99")
        #[arg(long)]
        price: String,

        #[arg(long)]
        cart: i64,
    },

    /// Pay for one or more services
    Service {
        #[arg(long)]
        user: i64,

        #[arg(long)]
        price: String,

        /// Service ids, comma separated
        #[arg(long, value_delimiter = ',')]
        ids: Vec<DataId>,
    },

    /// Pay for one or more resources
    Resource {
        #[arg(long)]
        user: i64,

        #[arg(long)]
        price: String,

        /// Resource ids, comma separated
        #[arg(long, value_delimiter = ',')]
        ids: Vec<DataId>,
    },

    /// Pay with a JSON request, e.g. {"type": "market", "user_id": 3, "price_cents": 1999, "shopping_cart_id": 7}
    Json {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindFilter {
    Market,
    Service,
    Resource,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum InvoiceFormat {
    Text,
    Docx,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    pub fn init_logging(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        init_logging(level, self.log_format);
    }

    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                TransactionService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Pay(pay_cmd) => {
                let service = TransactionService::connect(&self.database).await?;
                let request = build_payment_request(pay_cmd)?;
                let paid = service.pay(request).await?;
                print_paid(&paid);
            }

            Commands::List { kind, user, date } => {
                let service = TransactionService::connect(&self.database).await?;
                run_list_command(&service, kind, user, date).await?;
            }

            Commands::Show { id } => {
                let service = TransactionService::connect(&self.database).await?;
                let tx = service.find_by_id(id).await?;
                println!("ID:       {}", tx.id);
                println!("Type:     {}", tx.kind);
                println!("User:     {}", tx.user_id);
                println!("Created:  {}", tx.created_at);
                println!("Price:    {}", format_cents(tx.price_cents));
                println!("Status:   {}", tx.status);
            }

            Commands::Status { id, status } => {
                let service = TransactionService::connect(&self.database).await?;
                let status = TransactionStatus::from_str(&status).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Invalid status '{}'. Valid statuses: pending, resolved, canceled",
                        status
                    )
                })?;
                service.set_transaction_status(id, status).await?;
                println!("Transaction {} is now {}", id, status);
            }

            Commands::Cancel { id } => {
                let service = TransactionService::connect(&self.database).await?;
                service.cancel_transaction(id).await?;
                println!("Transaction {} canceled", id);
            }

            Commands::Invoice { id, output, format } => {
                let service = TransactionService::connect(&self.database).await?;
                let mut stream = match format {
                    InvoiceFormat::Text => service.create_invoice(id).await?,
                    InvoiceFormat::Docx => {
                        service.create_invoice_with(id, DocxDocument::new()).await?
                    }
                };
                match output {
                    Some(path) => {
                        let mut file = std::fs::File::create(&path)
                            .with_context(|| format!("Failed to create output file: {}", path))?;
                        std::io::copy(&mut stream, &mut file)?;
                        eprintln!("Invoice written to {}", path);
                    }
                    None => {
                        std::io::copy(&mut stream, &mut std::io::stdout())?;
                    }
                }
            }

            Commands::Report { date, json } => {
                let service = TransactionService::connect(&self.database).await?;
                let date = match date {
                    Some(date_str) => parse_date(&date_str)?,
                    None => today(),
                };
                run_report_command(&service, date, json).await?;
            }

            Commands::Export { output, format } => {
                let service = TransactionService::connect(&self.database).await?;
                run_export_command(&service, output.as_deref(), format).await?;
            }
        }

        Ok(())
    }
}

fn build_payment_request(cmd: PayCommands) -> Result<PaymentRequest> {
    let request = match cmd {
        PayCommands::Market { user, price, cart } => {
            PaymentRequest::Market(CreateMarketTransaction {
                user_id: user,
                price_cents: parse_price(&price)?,
                shopping_cart_id: cart,
            })
        }
        PayCommands::Service { user, price, ids } => {
            PaymentRequest::Service(CreateServiceTransaction {
                user_id: user,
                price_cents: parse_price(&price)?,
                service_ids: ids,
            })
        }
        PayCommands::Resource { user, price, ids } => {
            PaymentRequest::Resource(CreateResourceTransaction {
                user_id: user,
                price_cents: parse_price(&price)?,
                resource_ids: ids,
            })
        }
        PayCommands::Json { input } => {
            let json = read_input(input.as_deref())?;
            parse_payment_request(&json)?
        }
    };
    Ok(request)
}

fn read_input(path: Option<&str>) -> Result<String> {
    use std::io::Read;

    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path)),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_paid(paid: &PaidTransaction) {
    let tx = paid.transaction();
    let detail = match paid {
        PaidTransaction::Market(market) => format!("cart {}", market.shopping_cart_id),
        PaidTransaction::Service(service) => format!("services {:?}", service.service_ids()),
        PaidTransaction::Resource(resource) => format!("resources {:?}", resource.resource_ids()),
    };
    println!(
        "Recorded {} transaction {}: {} for user {} ({}, {})",
        tx.kind,
        tx.id,
        format_cents(tx.price_cents),
        tx.user_id,
        detail,
        tx.status
    );
}

async fn run_list_command(
    service: &TransactionService,
    kind: Option<KindFilter>,
    user: Option<i64>,
    date: Option<String>,
) -> Result<()> {
    let date = date.map(|s| parse_date(&s)).transpose()?;

    let mut transactions: Vec<Transaction> = match (user, date) {
        (Some(user_id), _) => service.find_all_by_user_id(user_id).await?,
        (None, Some(date)) => service.find_all_by_created_at(date).await?,
        (None, None) => service.find_all().await?,
    };

    // Remaining filters apply in memory
    if let (Some(_), Some(date)) = (user, date) {
        transactions.retain(|tx| tx.created_at == date);
    }
    if let Some(kind) = kind {
        let kind = match kind {
            KindFilter::Market => TransactionKind::Market,
            KindFilter::Service => TransactionKind::Service,
            KindFilter::Resource => TransactionKind::Resource,
        };
        transactions.retain(|tx| tx.kind == kind);
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:>6} {:<10} {:>8} {:<12} {:>10} STATUS",
        "ID", "TYPE", "USER", "DATE", "PRICE"
    );
    println!("{}", "-".repeat(60));
    for tx in &transactions {
        println!(
            "{:>6} {:<10} {:>8} {:<12} {:>10} {}",
            tx.id,
            tx.kind,
            tx.user_id,
            tx.created_at,
            format_cents(tx.price_cents),
            tx.status
        );
    }
    Ok(())
}

async fn run_report_command(service: &TransactionService, date: NaiveDate, json: bool) -> Result<()> {
    if json {
        Exporter::new(service)
            .export_daily_report_json(date, std::io::stdout())
            .await?;
        return Ok(());
    }

    let report = service.get_daily_report_for_date(date).await?;

    println!("Daily report for {}\n", report.date);
    println!("Transactions: {}", report.total_transactions);
    println!("  Pending:    {}", report.total_pending);
    println!("  Resolved:   {}", report.total_resolved);
    println!("  Canceled:   {}", report.total_canceled);
    println!("Total price:  {}", format_cents(report.total_price));
    Ok(())
}

async fn run_export_command(
    service: &TransactionService,
    output: Option<&str>,
    format: ExportFormat,
) -> Result<()> {
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        ExportFormat::Csv => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        ExportFormat::Json => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported {} transactions ({} market, {} service, {} resource)",
                    snapshot.transactions.len(),
                    snapshot.market_transactions.len(),
                    snapshot.service_transactions.len(),
                    snapshot.resource_transactions.len()
                );
            }
        }
    }

    Ok(())
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}
