use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use spdlog::{info, warn};

use travelog::logger::configure_logger;
use travelog::server::server_run;

use crate::config::open_config;
use crate::config_data::write_sample_cfg;

mod config;
mod config_data;

const CFG_FILE_NAME: &str = "travelog.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Writes a sample configuration file and exits
    #[arg(long)]
    init: bool,
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    if args.init {
        let out_path = config_path.unwrap_or_else(|| PathBuf::from(CFG_FILE_NAME));
        if out_path.exists() {
            bail!("Not overwriting existing configuration {}", out_path.display());
        }
        write_sample_cfg(&out_path)?;
        println!("Sample configuration written to {}", out_path.display());
        return Ok(());
    }

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run travelog --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting Travelog =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    info!("Listening on {}:{}", config.server.address, config.server.port);

    server_run(config).await?;
    Ok(())
}
