//! Configuration data structures for csk-sniffer.
//!
//! This module defines the schema for the application settings: the HTTP
//! listener, the on-disk output workspace, session handling, the external
//! detection pipeline and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Locations of detection outputs on disk.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session cookie and cache-epoch settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// External object-detection pipeline invocation.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `6007`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where the detection pipeline writes its results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Annotated result images, served under `/images/`.
    /// Default: `static/Images`
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Per-image detection CSV files.
    /// Default: `csv_files`
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,

    /// Collocation map and inverted index TSV files.
    /// Default: `tsv_files`
    #[serde(default = "default_tsv_dir")]
    pub tsv_dir: PathBuf,

    /// Error set produced by the knowledge-base checker.
    /// Default: `error_set.tsv`
    #[serde(default = "default_error_file")]
    pub error_file: PathBuf,

    /// Knowledge-base file. Read-only; never removed by cleanup.
    /// Default: `KB-CSK-SNIFFER.csv`
    #[serde(default = "default_kb_file")]
    pub kb_file: PathBuf,

    /// Lowercase extensions (without dot) treated as images.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

/// Settings for per-browser sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    /// Default: `csk_session`
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Epoch value assigned to a freshly created session.
    /// Default: `1`
    #[serde(default = "default_baseline_epoch")]
    pub baseline_epoch: u64,

    /// Upper bound on live sessions; the least recently used is dropped first.
    /// Default: `10000`
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

/// How to invoke the external detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Program to execute.
    /// Default: `python`
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments passed before the search query, which is always appended last.
    /// Default: `["main.py", "--image_search_term"]`
    #[serde(default = "default_pipeline_args")]
    pub args: Vec<String>,

    /// Working directory for the child process.
    /// Default: `.`
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Hard limit on a single pipeline run.
    /// Default: `600`
    #[serde(default = "default_pipeline_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            csv_dir: default_csv_dir(),
            tsv_dir: default_tsv_dir(),
            error_file: default_error_file(),
            kb_file: default_kb_file(),
            image_extensions: default_image_extensions(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            baseline_epoch: default_baseline_epoch(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_pipeline_args(),
            working_dir: default_working_dir(),
            timeout_seconds: default_pipeline_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl StorageConfig {
    /// Collocation map written by the pipeline.
    pub fn collocations_file(&self) -> PathBuf {
        self.tsv_dir.join("collocations.tsv")
    }

    /// Inverted index written by the pipeline.
    pub fn inverted_index_file(&self) -> PathBuf {
        self.tsv_dir.join("inverted_index.tsv")
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6007
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("static").join("Images")
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("csv_files")
}

fn default_tsv_dir() -> PathBuf {
    PathBuf::from("tsv_files")
}

fn default_error_file() -> PathBuf {
    PathBuf::from("error_set.tsv")
}

fn default_kb_file() -> PathBuf {
    PathBuf::from("KB-CSK-SNIFFER.csv")
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "bmp", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_cookie_name() -> String {
    "csk_session".to_string()
}

fn default_baseline_epoch() -> u64 {
    1
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_program() -> String {
    "python".to_string()
}

fn default_pipeline_args() -> Vec<String> {
    vec!["main.py".to_string(), "--image_search_term".to_string()]
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_pipeline_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
