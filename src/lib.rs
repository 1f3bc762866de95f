// csk-sniffer - YOLO detection results browser with session-scoped cache busting
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod images;
pub mod invalidation;
pub mod metrics;
pub mod pipeline;
pub mod reports;
pub mod server;
pub mod session;
pub mod utils;
pub mod views;
pub mod workspace;
