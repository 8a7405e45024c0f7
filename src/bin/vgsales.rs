use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use vgsales_etl::cli::{self, ConfigOverrides};
use vgsales_etl::config::ENV_KEYS;
use vgsales_etl::tracing::init_tracing;
use vgsales_etl::util::env as env_util;

#[derive(Parser, Debug)]
#[command(name = "vgsales", version, about = "Video game sales prep + warehouse ETL")]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct PathArgs {
    /// Root containing raw/, prepared/ and dw/ (default: VGSALES_DATA_DIR or ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Raw sales CSV
    #[arg(long, global = true)]
    raw: Option<PathBuf>,
    /// Cleaned CSV written by `prepare` and read by `load`
    #[arg(long, global = true)]
    prepared: Option<PathBuf>,
    /// SQLite warehouse file
    #[arg(long, global = true)]
    warehouse: Option<PathBuf>,
    /// Fact rows per insert batch
    #[arg(long, global = true)]
    batch_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Clean the raw dataset, derive features and export the cleaned CSV
    Prepare,
    /// Load the cleaned CSV into the star-schema warehouse
    Load,
    /// Prepare, then load
    Run,
}

fn main() -> Result<()> {
    env_util::init_env();
    init_tracing("info")?;

    let args = Cli::parse();
    env_util::log_snapshot("vgsales", &ENV_KEYS);
    let cfg = ConfigOverrides {
        data_dir: args.paths.data_dir,
        raw_csv: args.paths.raw,
        prepared_csv: args.paths.prepared,
        warehouse_path: args.paths.warehouse,
        batch_size: args.paths.batch_size,
    }
    .resolve();

    match args.command {
        Commands::Prepare => {
            cli::prepare::run(&cfg)?;
        }
        Commands::Load => {
            cli::load::run(&cfg)?;
        }
        Commands::Run => {
            cli::prepare::run(&cfg)?;
            cli::load::run(&cfg)?;
        }
    }
    Ok(())
}
