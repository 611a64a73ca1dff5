pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod pipeline;
pub mod record;
pub mod runtime;
pub mod schema;
pub mod store;
pub mod table;
pub mod transform;

use std::{
    env,
    io::{self, Write},
    sync::OnceLock,
};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::Cli, config::DatabaseConfig, io_utils::ReadOptions, pipeline::Pipeline, store::Store,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("movies_etl", LevelFilter::Info);
        }
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        });
        let _ = builder.try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let stdout = io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Runs the requested steps in order: load, analyze, custom query.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = DatabaseConfig::resolve(cli.database.as_deref(), cli.config.as_deref())?;
    debug!("Using database {:?}", config.path);
    let mut store = Store::open(&config)?;

    if let Some(file) = &cli.file {
        let options = ReadOptions::new(cli.delimiter, cli.input_encoding.as_deref())?;
        Pipeline::new(&mut store).run(file, &options)?;
        info!("Pipeline completed successfully");
    }

    if cli.analyze {
        analysis::run_analysis(&store, out)?;
    }

    if let Some(sql) = &cli.custom {
        analysis::run_custom(&mut store, sql, out)?;
    }

    out.flush()?;
    store.close()
}
