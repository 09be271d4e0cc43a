//! oxide-tablesync CLI
//!
//! Command-line tool for reconciling tables against rule files.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use oxide_tablesync::prelude::*;

/// Declarative table reconciliation.
#[derive(Parser)]
#[command(name = "oxide-tablesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (`sqlite:` path or `mysql://` connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables, columns and indexes.
    Sync {
        /// JSON file holding one rule or a list of rules.
        rules: PathBuf,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Show the DDL a fresh database would receive, without connecting.
    Show {
        /// JSON file holding one rule or a list of rules.
        rules: PathBuf,

        /// Dialect to render.
        #[arg(long, value_enum, default_value_t = DialectArg::Mysql)]
        dialect: DialectArg,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Only honour the structured `primary_key` flag, not `primary key` in column SQL.
    #[arg(long)]
    no_primary_key_phrase: bool,

    /// Do not add an `id` column to new tables.
    #[arg(long)]
    no_id: bool,

    /// Do not add a `created_at` column to new tables.
    #[arg(long)]
    no_created_at: bool,
}

impl OptionArgs {
    fn to_options(&self) -> SyncOptions {
        let mut options = SyncOptions::new();
        if self.no_primary_key_phrase {
            options = options.without_primary_key_phrase();
        }
        if self.no_id {
            options = options.without_id();
        }
        if self.no_created_at {
            options = options.without_created_at();
        }
        options
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Mysql,
    Sqlite,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Sync {
            rules,
            dry_run,
            options,
        } => {
            let rules = SchemaRule::load(&rules)?;
            info!(count = rules.len(), "Loaded rules");

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
            }

            let report = if cli.database.starts_with("mysql:") {
                let db = MySqlDatabase::connect(&cli.database).await?;
                sync(&db, &rules, dry_run, options.to_options()).await
            } else {
                let db = SqliteDatabase::connect(&cli.database).await?;
                sync(&db, &rules, dry_run, options.to_options()).await
            };

            finish(report, dry_run)?;
        }

        Commands::Show {
            rules,
            dialect,
            options,
        } => {
            let rules = SchemaRule::load(&rules)?;
            let report = match dialect {
                DialectArg::Mysql => show(MySqlDialect::new(), &rules, options.to_options()).await,
                DialectArg::Sqlite => {
                    show(SqliteDialect::new(), &rules, options.to_options()).await
                }
            };
            report.into_result()?;
        }
    }

    Ok(())
}

/// Reconciles `rules` against `db`, or only records the statements in a dry run.
async fn sync<D>(db: &D, rules: &[SchemaRule], dry_run: bool, options: SyncOptions) -> SyncReport
where
    D: Catalog + Executor,
    D::Dialect: Clone,
{
    if dry_run {
        let recorder = SqlRecorder::new(db.dialect().clone());
        let report = Synchronizer::new(db, &recorder)
            .with_options(options)
            .migrate_all(rules)
            .await;
        print_statements(&recorder.take());
        report
    } else {
        Synchronizer::new(db, db)
            .with_options(options)
            .migrate_all(rules)
            .await
    }
}

/// Records the DDL `rules` produce against an empty database.
async fn show<D: MigrationDialect + Clone>(
    dialect: D,
    rules: &[SchemaRule],
    options: SyncOptions,
) -> SyncReport {
    let catalog = FreshCatalog::new(dialect.clone());
    let recorder = SqlRecorder::new(dialect);
    let report = Synchronizer::new(&catalog, &recorder)
        .with_options(options)
        .migrate_all(rules)
        .await;
    print_statements(&recorder.take());
    report
}

fn print_statements(statements: &[String]) {
    for sql in statements {
        if sql.ends_with(';') {
            println!("{sql}");
        } else {
            println!("{sql};");
        }
    }
}

fn finish(report: SyncReport, dry_run: bool) -> anyhow::Result<()> {
    if !dry_run {
        for change in &report.applied {
            println!("{change}");
        }
    }

    if report.is_noop() {
        info!("Nothing to do, all tables are up to date.");
    }

    for err in &report.errors {
        error!(error = %err, "Reconciliation error");
    }

    let failed = report.errors.len();
    if failed > 0 {
        anyhow::bail!("{failed} step(s) failed");
    }
    Ok(())
}
