use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loyalty-lens")]
#[command(about = "Competitive loyalty-program analysis over a chat-completion model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the config file [default: ~/.loyalty-lens/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP service (default)
    Serve(ServeOptions),
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration
    Config,
    /// Check configuration, credentials and API reachability
    Doctor,
    /// Show version information
    Version,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeOptions {
    /// Address to bind, overrides server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overrides server.port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["loyalty-lens"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn serve_overrides_parse() {
        let cli = Cli::try_parse_from([
            "loyalty-lens",
            "serve",
            "--host",
            "127.0.0.1",
            "-p",
            "9000",
            "--config",
            "/tmp/lens.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Serve(ServeOptions {
                host: Some("127.0.0.1".to_string()),
                port: Some(9000),
            }))
        );
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/lens.toml")));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["loyalty-lens", "serve", "--port", "99999"]).is_err());
    }
}
