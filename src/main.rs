use anyhow::Result;
use clap::Parser;
use log::error;

use loyalty_lens::cli::ServeOptions;
use loyalty_lens::{Cli, CommandHandler, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the defaults below
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeOptions::default()));

    // Handle version early, it needs no config
    if matches!(command, Commands::Version) {
        println!("{}", loyalty_lens::cli::commands::version_info());
        return Ok(());
    }

    let mut handler = match CommandHandler::new(cli.config) {
        Ok(h) => h,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            eprintln!("Error: Failed to load configuration: {e:#}");
            eprintln!("Try running 'loyalty-lens init' to write a default config.");
            std::process::exit(1);
        }
    };

    match handler.handle_command(command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}
