//! CLI administration tool for referral-ledger.
//!
//! Provides back-office commands for the commission ledger without
//! requiring HTTP API access or an administrator account.
//!
//! # Usage
//!
//! ```bash
//! # List an account's referrals
//! cargo run --bin admin -- referral list QR1A2B3C --status pending
//!
//! # Advance a referral
//! cargo run --bin admin -- referral transition 42 completed
//!
//! # Set a commission amount
//! cargo run --bin admin -- referral commission 42 12.50
//!
//! # Show statistics for a referral code
//! cargo run --bin admin -- stats QR1A2B3C
//!
//! # Grant the administrator role
//! cargo run --bin admin -- account promote QR1A2B3C
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server (`DATABASE_URL` or `DB_*`).

use referral_ledger::application::services::{AccountService, LedgerService, StatsService};
use referral_ledger::config::{self, Config, StoreBackend};
use referral_ledger::domain::entities::{Account, ReferralStatus, Role};
use referral_ledger::error::AppError;
use referral_ledger::server::connect_postgres;
use referral_ledger::state::{DynAccountService, DynLedgerService, DynStatsService, Repositories};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing referral-ledger.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and update the commission ledger
    Referral {
        #[command(subcommand)]
        action: ReferralAction,
    },

    /// Show referral statistics for a code
    Stats {
        /// Referral code (case and surrounding spaces are ignored)
        code: String,
    },

    /// Inspect and manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum ReferralAction {
    /// List referrals credited to a code
    List {
        code: String,

        /// Only show referrals in this status
        #[arg(short, long)]
        status: Option<ReferralStatus>,
    },

    /// Move a referral to its next status
    Transition {
        id: i64,
        status: ReferralStatus,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Set a referral's commission amount
    Commission {
        id: i64,
        amount: Decimal,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Show the account owning a code
    Show { code: String },

    /// Grant the administrator role
    Promote {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show row counts per table
    Info,
}

/// Services wired over the PostgreSQL repositories.
struct Services {
    accounts: Arc<DynAccountService>,
    ledger: DynLedgerService,
    stats: DynStatsService,
}

impl Services {
    fn new(pool: PgPool, config: &Config) -> Self {
        let repositories = Repositories::postgres(Arc::new(pool));
        let accounts = Arc::new(AccountService::new(
            repositories.accounts,
            config.referral_code_prefix.clone(),
            config.code_generation_attempts,
        ));

        Self {
            ledger: LedgerService::new(repositories.referrals.clone()),
            stats: StatsService::new(
                accounts.clone(),
                repositories.referrals,
                repositories.clicks,
                repositories.registrations,
                config.reporting_offset,
            ),
            accounts,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!("The admin tool only works against the postgres store");
    }

    let pool = connect_postgres(&config).await?;

    if let Commands::Db { action } = &cli.command {
        return handle_db_action(action, &pool).await;
    }

    let services = Services::new(pool, &config);

    match cli.command {
        Commands::Referral { action } => handle_referral_action(action, &services).await?,
        Commands::Stats { code } => show_stats(&services, &code).await?,
        Commands::Account { action } => handle_account_action(action, &services).await?,
        Commands::Db { .. } => {}
    }

    Ok(())
}

async fn account_by_code(services: &Services, code: &str) -> Result<Account> {
    services
        .accounts
        .get_by_code(code)
        .await
        .map_err(|e| match e {
            AppError::NotFound { .. } => anyhow::anyhow!("No account owns referral code '{code}'"),
            other => anyhow::anyhow!("Database error: {}", other),
        })
}

fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
    }
    Ok(confirmed)
}

async fn handle_referral_action(action: ReferralAction, services: &Services) -> Result<()> {
    match action {
        ReferralAction::List { code, status } => list_referrals(services, &code, status).await,
        ReferralAction::Transition { id, status, yes } => {
            transition_referral(services, id, status, yes).await
        }
        ReferralAction::Commission { id, amount, yes } => {
            set_commission(services, id, amount, yes).await
        }
    }
}

/// Lists referrals credited to a code, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Referrals for QR1A2B3C
///
///   ID     Referred account                       Status      Commission  Created
///   ──────────────────────────────────────────────────────────────────────────────
///   42     0b6f0b8e-...                           pending     0           2026-03-01 10:30
/// ```
async fn list_referrals(
    services: &Services,
    code: &str,
    status: Option<ReferralStatus>,
) -> Result<()> {
    let account = account_by_code(services, code).await?;

    println!(
        "{} {}",
        "📋 Referrals for".bright_blue().bold(),
        account.referral_code.cyan().bold()
    );
    println!();

    let referrals = services
        .ledger
        .list_for_referrer(account.id, status)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list referrals: {}", e))?;

    if referrals.is_empty() {
        println!("{}", "  No referrals found".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<38} {:<11} {:<11} {}",
        "ID".bright_white().bold(),
        "Referred account".bright_white().bold(),
        "Status".bright_white().bold(),
        "Commission".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for referral in &referrals {
        let status = match referral.status {
            ReferralStatus::Pending => referral.status.as_str().yellow(),
            ReferralStatus::Completed => referral.status.as_str().green(),
            ReferralStatus::Paid => referral.status.as_str().bright_black(),
        };

        println!(
            "  {:<6} {:<38} {:<11} {:<11} {}",
            referral.id.to_string().bright_black(),
            referral.referred_account_id.to_string().cyan(),
            status,
            referral.commission_amount.to_string(),
            referral
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        referrals.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn transition_referral(
    services: &Services,
    id: i64,
    target: ReferralStatus,
    skip_confirm: bool,
) -> Result<()> {
    let referral = services
        .ledger
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Referral: {}", referral.id.to_string().cyan());
    println!(
        "  Status:   {} → {}",
        referral.status.as_str().yellow(),
        target.as_str().green().bold()
    );
    println!();

    if !confirm("Apply this transition?", skip_confirm)? {
        return Ok(());
    }

    let updated = services
        .ledger
        .transition(id, target)
        .await
        .map_err(|e| anyhow::anyhow!("Transition refused: {}", e))?;

    println!(
        "{} {}",
        "✅ Referral is now".green().bold(),
        updated.status.as_str().green().bold()
    );
    Ok(())
}

async fn set_commission(
    services: &Services,
    id: i64,
    amount: Decimal,
    skip_confirm: bool,
) -> Result<()> {
    let referral = services
        .ledger
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Referral:   {}", referral.id.to_string().cyan());
    println!(
        "  Commission: {} → {}",
        referral.commission_amount.to_string().yellow(),
        amount.to_string().green().bold()
    );
    println!();

    if !confirm("Set this commission?", skip_confirm)? {
        return Ok(());
    }

    services
        .ledger
        .set_commission(id, amount)
        .await
        .map_err(|e| anyhow::anyhow!("Commission refused: {}", e))?;

    println!("{}", "✅ Commission updated".green().bold());
    Ok(())
}

/// Displays statistics for the account owning `code`.
async fn show_stats(services: &Services, code: &str) -> Result<()> {
    let account = account_by_code(services, code).await?;
    let stats = services
        .stats
        .stats(&account, Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to compute statistics: {}", e))?;

    println!(
        "{} {}",
        "📊 Statistics for".bright_blue().bold(),
        account.referral_code.cyan().bold()
    );
    println!();

    let rows = [
        ("Referrals", stats.total_referrals.to_string()),
        ("Completed", stats.completed_referrals.to_string()),
        ("Total earnings", stats.total_earnings.to_string()),
        ("Pending earnings", stats.pending_earnings.to_string()),
        ("This month", stats.this_month_earnings.to_string()),
        ("Clicks", stats.click_count.to_string()),
        (
            "Webinar registrations",
            stats.webinar_registration_count.to_string(),
        ),
    ];

    for (label, value) in rows {
        println!("  {:<24}{}", format!("{label}:"), value.bright_green().bold());
    }
    println!();

    Ok(())
}

async fn handle_account_action(action: AccountAction, services: &Services) -> Result<()> {
    match action {
        AccountAction::Show { code } => {
            let account = account_by_code(services, &code).await?;

            println!("{}", "👤 Account".bright_blue().bold());
            println!();
            println!("  ID:           {}", account.id.to_string().cyan());
            println!("  Name:         {}", account.display_name());
            println!("  Code:         {}", account.referral_code.bright_yellow());
            println!("  Role:         {}", account.role.as_str());
            println!(
                "  Referred by:  {}",
                account
                    .referrer_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string())
                    .bright_black()
            );
            println!(
                "  Redirect URL: {}",
                account.redirect_url.as_deref().unwrap_or("-")
            );
            println!();
        }
        AccountAction::Promote { code, yes } => {
            let account = account_by_code(services, &code).await?;

            if account.is_administrator() {
                println!("{}", "⚠️  Account is already an administrator".yellow());
                return Ok(());
            }

            println!("  Account: {}", account.display_name().cyan());
            println!();

            if !confirm("Grant the administrator role?", yes)? {
                return Ok(());
            }

            services
                .accounts
                .set_role(account.id, Role::Administrator)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update role: {}", e))?;

            println!("{}", "✅ Account promoted".green().bold());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: &DbAction, pool: &PgPool) -> Result<()> {
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

            for table in [
                "profiles",
                "referrals",
                "referral_clicks",
                "webinar_registrations",
            ] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;
                println!(
                    "  {:<24}{}",
                    format!("{table}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}
