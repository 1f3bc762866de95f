// CLI module for csk-sniffer
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// csk-sniffer - browse YOLO detection results for an image search
#[derive(Parser, Debug)]
#[command(name = "csk-sniffer", version, about, long_about = None)]
pub struct Args {
    /// Configuration file (default: ~/.csk-sniffer/config.toml if present)
    #[arg(short, long, env = "CSK_SNIFFER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding the configuration
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
