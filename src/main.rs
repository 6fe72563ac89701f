mod cli;
mod config;
mod download;
mod filter;
mod gap;
mod reading;
mod slot;
#[cfg(test)]
mod testing;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, init_logging, Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Update(args) => match Config::from_args(args, cli.verbose) {
            Ok(config) => match command::update(&config).await {
                Ok(summary) => println!("{}", summary),
                Err(e) => eprintln!("Error: {:#}", e),
            },
            Err(e) => eprintln!("Error: {}", e),
        },
        Commands::Filter { file, idem_folder } => {
            match command::filter(file, idem_folder.as_deref()) {
                Ok(Some(output_file)) => println!("File saved to `{}`", output_file.display()),
                Ok(None) => println!("No IDEM EST output file produced"),
                Err(e) => eprintln!("Error: {:#}", e),
            }
        }
        Commands::Gaps {
            download_folder,
            lookback,
        } => match command::gaps(download_folder.as_deref(), *lookback) {
            Ok(hours) if hours >= *lookback => {
                println!("No missing files in the last {} hours", lookback)
            }
            Ok(hours) => println!("First missing file is {} hours back", hours),
            Err(e) => eprintln!("Error: {:#}", e),
        },
    }

    Ok(())
}
