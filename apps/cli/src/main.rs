//! # Mandoob CLI
//!
//! Bootstraps the reconciliation engine and exposes maintenance commands.
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize logging (tracing-subscriber, RUST_LOG override)
//! 2. Load configuration (defaults → mandoob.toml → MANDOOB_* env)
//! 3. Open the local store (SQLite, WAL)
//! 4. Run the engine startup protocol (local adoption + session restore)
//! 5. Dispatch the command
//! ```
//!
//! Unlike the long-lived app frontends, this one-shot binary does not fire
//! the startup background fetch; syncing is explicit via `mandoob sync`.
//!
//! ## Commands
//! ```text
//! mandoob [status]        engine state snapshot for the signed-in agent
//! mandoob sync            fetch and adopt the remote document
//! mandoob export <path>   write the full document to a backup file
//! mandoob import <path>   replace the document from a backup file
//! ```

mod config;

use std::path::Path;

use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mandoob_core::{metrics, SimType};
use mandoob_engine::Engine;
use mandoob_store::{read_backup, write_backup, LocalStore, LocalStoreConfig, RemoteStore};

use config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load(None)?;
    let db_path = config.database_path()?;
    info!(path = %db_path.display(), "Starting Mandoob");

    let local = LocalStore::connect(LocalStoreConfig::new(db_path)).await?;
    let remote = RemoteStore::new(config.remote_url.clone())?;
    let engine = Engine::start(local, remote).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("status") => status(&engine),
        Some("sync") => {
            let adopted = engine.sync_with_remote().await?;
            if adopted {
                println!("remote document adopted");
            } else {
                println!("no remote document adopted (offline or nothing valid to fetch)");
            }
        }
        Some("export") => {
            let path = args.get(1).map(String::as_str).ok_or("usage: mandoob export <path>")?;
            write_backup(&engine.export_document(), Path::new(path))?;
            println!("backup written to {path}");
        }
        Some("import") => {
            let path = args.get(1).map(String::as_str).ok_or("usage: mandoob import <path>")?;
            let document = read_backup(Path::new(path))?;
            engine.import_document(document).await?;
            println!("document imported from {path}");
        }
        Some(other) => {
            eprintln!("unknown command: {other}");
            eprintln!("commands: status | sync | export <path> | import <path>");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Prints the engine state the way the dashboard's home screen reads it.
fn status(engine: &Engine) {
    let document = engine.document();
    println!("profiles: {}", document.users.len());

    let Some(profile) = engine.active_profile() else {
        println!("no active session (sign in from the app, or use a remembered session)");
        return;
    };

    let now = Local::now();
    let ledger = &profile.ledger;
    let day = metrics::day_transactions(ledger, &now);
    let progress = metrics::weekly_target_progress(ledger, &now);
    let fuel = metrics::fuel_metrics(ledger, &now);

    println!("signed in: {} ({})", profile.name, profile.username);
    println!(
        "today: {} orders, {:.0} total",
        day.len(),
        metrics::day_total(ledger, &now)
    );
    println!(
        "week: {:.0} / {:.0} ({}%), {:.0} remaining",
        progress.sales, progress.target, progress.percent, progress.remaining
    );
    let stock_line = SimType::STOCKED
        .iter()
        .map(|s| format!("{} {}", s, ledger.stock.get(*s).unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("stock: {} (damaged: {})", stock_line, ledger.damaged.total());
    println!(
        "fuel this month: {:.2} spent, {:.1} L, {:.1} km/L, next week est. {:.0}",
        fuel.month_cost, fuel.month_liters, fuel.avg_efficiency, fuel.next_week_estimate
    );
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show debug messages
/// - `RUST_LOG=mandoob=trace` - trace for mandoob crates only
/// - Default: INFO, with sqlx chatter kept at WARN
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mandoob=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
