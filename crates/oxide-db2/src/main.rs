//! oxide-db2 CLI
//!
//! Renders DB2 statements for JSON model descriptions.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_db2::{Db2Config, Db2Dialect, ModelFile};
use oxide_dialect::TableSchema;

/// DB2 statement rendering for oxide models.
#[derive(Parser)]
#[command(name = "oxide-db2")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect configuration file (JSON).
    #[arg(short, long, env = "OXIDE_DB2_CONFIG")]
    config: Option<PathBuf>,

    /// Schema to use instead of the configured one.
    #[arg(long, env = "OXIDE_DB2_SCHEMA")]
    schema: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print CREATE TABLE for a model.
    Ddl {
        /// Model description file.
        model: PathBuf,

        /// Print DROP TABLE before CREATE TABLE.
        #[arg(long)]
        drop: bool,
    },

    /// Print the key-returning INSERT and its bound values for one row.
    Insert {
        /// Model description file.
        model: PathBuf,

        /// Row file: a JSON object keyed by column or field name.
        row: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
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

    let config = match &cli.config {
        Some(path) => Db2Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Db2Config::default(),
    }
    .with_schema(cli.schema.clone());
    debug!(?config, "Using dialect configuration");
    let dialect = Db2Dialect::with_config(config);

    match cli.command {
        Commands::Ddl { model, drop } => {
            let (model, schema) = load_schema(&model, &dialect)?;
            if drop {
                println!("{};", dialect.drop_table_sql(&model.table));
            }
            println!("{};", dialect.create_table_sql(&schema));
        }

        Commands::Insert { model, row } => {
            let (model, schema) = load_schema(&model, &dialect)?;
            let row = load_row(&row)?;

            let mut scope = model.scope(&row)?;
            let request = scope.insert_request(&schema, &dialect);
            let (sql, params) = dialect.insert_statement(&request)?;

            println!("{sql};");
            for (i, param) in params.iter().enumerate() {
                println!("  ${} = {param:?}", i + 1);
            }
            for column in scope.blank_columns_with_default_value() {
                info!("{column} left to its database default");
            }
        }
    }

    Ok(())
}

fn load_schema(path: &Path, dialect: &Db2Dialect) -> anyhow::Result<(ModelFile, TableSchema)> {
    let model =
        ModelFile::load(path).with_context(|| format!("loading model {}", path.display()))?;
    let schema = TableSchema::build(&model.table, model.descriptors()?, dialect)?;
    Ok((model, schema))
}

fn load_row(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading row {}", path.display()))?;
    match serde_json::from_str(&contents)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("row must be a JSON object, got {other}"),
    }
}
