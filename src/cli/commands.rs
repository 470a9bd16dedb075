use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::OpenAiClient;
use crate::cli::{Commands, ServeOptions};
use crate::config::{DefaultConfig, Settings};
use crate::server;

pub struct CommandHandler {
    settings: Settings,
    config_path: PathBuf,
}

impl CommandHandler {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Settings::default_config_path()?,
        };
        let settings = Settings::load(Some(config_path.as_path()))?;

        Ok(Self {
            settings,
            config_path,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn handle_command(&mut self, command: Commands) -> Result<String> {
        match command {
            Commands::Serve(options) => self.handle_serve(options).await,
            Commands::Init { force } => self.handle_init(force),
            Commands::Config => self.handle_config(),
            Commands::Doctor => self.handle_doctor().await,
            Commands::Version => Ok(version_info()),
        }
    }

    async fn handle_serve(&mut self, options: ServeOptions) -> Result<String> {
        self.apply_overrides(&options)?;

        // Built once and injected into every request handler
        let client = OpenAiClient::new(&self.settings)
            .context("Failed to initialize completion client")?;
        info!(
            "Using model {} at {}",
            client.model_name(),
            self.settings.model.base_url
        );

        server::run_server(&self.settings, Arc::new(client)).await?;
        Ok(String::new())
    }

    fn apply_overrides(&mut self, options: &ServeOptions) -> Result<()> {
        if let Some(host) = &options.host {
            self.settings.server.host = host.clone();
        }
        if let Some(port) = options.port {
            self.settings.server.port = port;
        }
        self.settings.validate()
    }

    fn handle_init(&self, force: bool) -> Result<String> {
        if self.config_path.exists() && !force {
            return Ok(format!(
                "Config file already exists at {} (use --force to overwrite)",
                self.config_path.display()
            ));
        }

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.config_path, DefaultConfig::create_default_config_file())
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        info!("Wrote default config to {}", self.config_path.display());
        Ok(format!(
            "Wrote default config to {}",
            self.config_path.display()
        ))
    }

    fn handle_config(&self) -> Result<String> {
        let rendered =
            toml::to_string_pretty(&self.settings).context("Failed to render settings")?;

        Ok(format!(
            "Loyalty Lens Configuration:\n\
            - Config file: {} ({})\n\
            - Listen address: {}\n\n{}",
            self.config_path.display(),
            if self.config_path.exists() {
                "loaded"
            } else {
                "not found, using defaults"
            },
            self.settings.bind_address(),
            rendered
        ))
    }

    async fn handle_doctor(&self) -> Result<String> {
        let mut diagnostics = Vec::new();

        if self.config_path.exists() {
            diagnostics.push(format!("✓ Config file {}", self.config_path.display()));
        } else {
            diagnostics.push(format!(
                "✗ Config file {} missing, using defaults (run: loyalty-lens init)",
                self.config_path.display()
            ));
        }

        let key_var = &self.settings.model.api_key_env;
        match OpenAiClient::new(&self.settings) {
            Ok(client) => {
                diagnostics.push(format!("✓ API key found in {key_var}"));
                match client.verify_connection().await {
                    Ok(_) => diagnostics.push(format!(
                        "✓ Completion API reachable at {}",
                        self.settings.model.base_url
                    )),
                    Err(e) => {
                        warn!("Completion API check failed: {e:#}");
                        diagnostics.push(format!("✗ Completion API: {e:#}"));
                    }
                }
            }
            Err(e) => diagnostics.push(format!("✗ Completion client: {e:#}")),
        }

        Ok(format!(
            "Loyalty Lens Health Check:\n{}",
            diagnostics.join("\n")
        ))
    }
}

pub fn version_info() -> String {
    format!(
        "loyalty-lens {}\nRust version: {}\nPlatform: {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("LOYALTY_LENS_RUSTC_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
