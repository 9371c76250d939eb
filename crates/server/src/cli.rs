//! Command-line arguments for the server binary.

use std::path::PathBuf;

use clap::Parser;
use docqa_core::Config;

#[derive(Parser, Debug)]
#[command(name = "docqa-server", about = "Question answering over uploaded documents")]
pub struct CliArgs {
    /// Bind address
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Extra .env file loaded before the default one
    #[arg(long, env = "DOCQA_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Print the effective configuration with secrets redacted and exit
    #[arg(long)]
    pub print_config: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of environment configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
