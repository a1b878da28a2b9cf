use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod api;
mod db;
mod metrics;
mod models;
mod report;
mod rollup;
mod source;
mod window;

use api::ApiClient;
use source::Source;

#[derive(Parser)]
#[command(name = "sales-kpi-report")]
#[command(about = "Monthly sales KPIs and brand rankings for the e-commerce segment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    /// Run the aggregation queries against Postgres
    Db,
    /// Fetch pre-aggregated rows from the report endpoints
    Api,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import transaction-level sale items from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the monthly KPI table with month-over-month growth
    Kpis {
        #[arg(long, value_enum, default_value = "db")]
        source: SourceKind,
        #[arg(long)]
        json: bool,
    },
    /// Generate the full markdown report
    Report {
        #[arg(long, value_enum, default_value = "db")]
        source: SourceKind,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

async fn connect_pool() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn build_source(kind: SourceKind) -> anyhow::Result<Source> {
    match kind {
        SourceKind::Db => Ok(Source::Db(connect_pool().await?)),
        SourceKind::Api => {
            let detailed_url = std::env::var("SALES_API_DETAIL_URL")
                .context("SALES_API_DETAIL_URL must be set for the api source")?;
            let kpi_url = std::env::var("SALES_API_KPI_URL")
                .context("SALES_API_KPI_URL must be set for the api source")?;
            Ok(Source::Api(ApiClient::new(detailed_url, kpi_url)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect_pool().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect_pool().await?;
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect_pool().await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} sale items from {}.", csv.display());
        }
        Commands::Kpis { source, json } => {
            let source = build_source(source).await?;
            let kpis = source.fetch_monthly_kpis().await?;
            let rows = metrics::with_growth(&kpis);

            if rows.is_empty() {
                println!("No sales found for this window.");
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("Monthly KPIs:");
                for row in &rows {
                    println!(
                        "- {}: {} orders, {} customers, net {}, ticket {}, net Δ {}, customers Δ {}",
                        row.month,
                        row.order_count,
                        row.customer_count,
                        report::money(row.net_value),
                        report::opt_money(row.average_ticket),
                        report::opt_pct(row.net_value_change),
                        report::opt_pct(row.customer_change),
                    );
                }
            }
        }
        Commands::Report { source, out } => {
            let source = build_source(source).await?;
            let detailed = source.fetch_detailed().await?;
            let kpis = source.fetch_monthly_kpis().await?;

            let totals = rollup::report_totals(&kpis);
            let growth = metrics::with_growth(&kpis);
            let brand_totals = rollup::brand_month_totals(&detailed);
            let top = rollup::top_brands(&brand_totals, 3);
            let bottom = rollup::bottom_brands(&brand_totals, 3);

            let report = report::build_report(
                window::window_start(),
                &totals,
                &growth,
                &top,
                &bottom,
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
