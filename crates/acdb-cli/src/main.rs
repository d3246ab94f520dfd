mod collect;
mod report;

use acdb_core::AreaCode;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;

#[derive(Debug, Parser)]
#[command(name = "acdb")]
#[command(about = "Area-code lookup and extraction pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up area codes and store the extracted records
    Collect(CollectArgs),
    /// Show the stored record for one area code
    Show {
        /// Three-digit area code
        code: AreaCode,
    },
    /// List stored area codes
    List {
        /// Only show codes with an informative record
        #[arg(long)]
        valid: bool,

        /// Maximum number of rows to print
        #[arg(long, default_value_t = 1000)]
        limit: i64,
    },
    /// List recent lookup runs
    Runs {
        /// Maximum number of runs to print
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Database management commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = acdb_core::load_app_config().context("invalid configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let Some(command) = cli.command else {
        println!("acdb: run `acdb --help` for available commands");
        return Ok(());
    };

    if let Commands::Collect(args) = &command {
        if args.dry_run {
            collect::print_dry_run(&config, args);
            return Ok(());
        }
    }

    let pool_config = acdb_db::PoolConfig::from_app_config(&config);
    let pool = acdb_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")?;

    match command {
        Commands::Collect(args) => {
            let cancel = CancellationToken::new();
            tokio::spawn(cancel_on_shutdown(cancel.clone()));
            let summary = collect::run_collect(&pool, &config, &args, &cancel).await?;
            println!("{summary}");
        }
        Commands::Show { code } => report::show(&pool, code).await?,
        Commands::List { valid, limit } => report::list(&pool, valid, limit).await?,
        Commands::Runs { limit } => report::runs(&pool, limit).await?,
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            acdb_db::ping(&pool).await?;
            println!("database reachable");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = acdb_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }

    pool.close().await;
    Ok(())
}

/// Cancels `cancel` on Ctrl-C or SIGTERM.
///
/// The pipeline finishes its in-flight candidate before stopping.
async fn cancel_on_shutdown(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::warn!("shutdown requested; stopping after the current area code");
    cancel.cancel();
}

#[cfg(test)]
mod tests;
