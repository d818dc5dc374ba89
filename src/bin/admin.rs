//! CLI administration tool for link-exporter.
//!
//! Runs exports, inspects and deletes shortened URLs, and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Export every URL to a CSV report
//! cargo run --bin admin -- export
//!
//! # Export URLs whose destination contains "example"
//! cargo run --bin admin -- export --search example
//!
//! # List URLs
//! cargo run --bin admin -- urls list --search rust --page 2
//!
//! # Delete a URL
//! cargo run --bin admin -- urls delete 4f2c0c84-5f7c-4b8e-9f57-0a1c7e0c6a55
//!
//! # Show totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*` components), `STORAGE_ROOT`,
//! `STORAGE_PUBLIC_URL` and the `EXPORT_*` settings.

use link_exporter::config::{self, Config};
use link_exporter::domain::entities::ExportFilter;
use link_exporter::domain::repositories::UrlListFilter;
use link_exporter::server::{build_state, connect_pool};
use link_exporter::state::AppState;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use uuid::Uuid;

/// CLI tool for managing link-exporter.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Export URLs to a CSV report in storage
    Export {
        /// Only export URLs whose destination contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Manage shortened URLs
    Urls {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// URL management subcommands.
#[derive(Subcommand)]
enum UrlAction {
    /// List URLs, newest first
    List {
        /// Only list URLs whose destination contains this text
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    /// Delete a URL by id
    Delete {
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Export { search } => {
            let state = build_state(pool, &config)?;
            run_export(&state, &config, search).await?
        }
        Commands::Urls { action } => {
            let state = build_state(pool, &config)?;
            handle_url_action(action, &state).await?
        }
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Runs one export and prints where the report landed.
async fn run_export(state: &AppState, config: &Config, search: Option<String>) -> Result<()> {
    println!("{}", "📤 Exporting URLs".bright_blue().bold());
    println!();
    if let Some(q) = &search {
        println!("  Filter:  {}", q.cyan());
    }
    println!("  Storage: {}", config.storage_root.bright_black());
    println!();

    let report = state
        .export_service
        .export(ExportFilter::new(search))
        .await
        .map_err(|e| anyhow::anyhow!("Export failed: {}", e))?;

    println!("{}", "✅ Export complete".green().bold());
    println!();
    println!("  Rows:   {}", report.rows.to_string().bright_white().bold());
    println!("  Bytes:  {}", report.bytes.to_string().bright_white());
    println!("  Key:    {}", report.key.cyan());
    println!("  URL:    {}", report.report_url.bright_yellow());
    println!();

    Ok(())
}

/// Dispatches URL management commands.
async fn handle_url_action(action: UrlAction, state: &AppState) -> Result<()> {
    match action {
        UrlAction::List {
            search,
            page,
            page_size,
        } => list_urls(state, search, page, page_size).await,
        UrlAction::Delete { id, yes } => delete_url(state, id, yes).await,
    }
}

/// Lists URLs as a table.
///
/// # Output Format
///
/// ```text
/// 🔗 URLs
///
///   Short URL            Accesses  Created           Original URL
///   ───────────────────────────────────────────────────────────────────────────
///   rust                 12        2026-01-15 10:30  https://rust-lang.org
/// ```
async fn list_urls(
    state: &AppState,
    search: Option<String>,
    page: u32,
    page_size: u32,
) -> Result<()> {
    println!("{}", "🔗 URLs".bright_blue().bold());
    println!();

    if page == 0 || page_size == 0 {
        anyhow::bail!("--page and --page-size must be greater than 0");
    }

    let filter = UrlListFilter::new(
        i64::from(page - 1) * i64::from(page_size),
        i64::from(page_size),
    )
    .with_search(search);

    let (urls, total) = state
        .url_service
        .list_urls(filter)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list URLs: {}", e))?;

    if urls.is_empty() {
        println!("{}", "  No URLs found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<20} {:<9} {:<17} {}",
        "Short URL".bright_white().bold(),
        "Accesses".bright_white().bold(),
        "Created".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for url in &urls {
        println!(
            "  {:<20} {:<9} {:<17} {}",
            url.short_url.cyan(),
            url.access_count.to_string().bright_white(),
            url.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            url.original_url
        );
    }

    println!();
    println!(
        "  Page {} · showing {} of {}",
        page,
        urls.len(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes a URL after confirmation (default: No).
async fn delete_url(state: &AppState, id: Uuid, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete URL".bright_blue().bold());
    println!();
    println!("  ID: {}", id.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this URL permanently?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .url_service
        .delete_url(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete URL: {}", e))?;

    println!("{}", "✅ URL deleted".green().bold());
    println!();

    Ok(())
}

/// Displays totals across all URLs.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (urls_count, accesses): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(access_count), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    println!(
        "  URLs:      {}",
        urls_count.to_string().bright_green().bold()
    );
    println!(
        "  Accesses:  {}",
        accesses.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
