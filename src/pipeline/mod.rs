//! External object-detection pipeline.
//!
//! Searching downloads images for a query, runs the YOLO detector over them
//! and writes annotated images plus CSV/TSV analysis into the output
//! workspace. All of that happens in an external program; this module only
//! defines how the server invokes it.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod command;

pub use command::CommandPipeline;

use crate::error::Result;
use futures::future::BoxFuture;

/// Captured result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl PipelineOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Produces detection outputs for a search query.
pub trait DetectionPipeline: Send + Sync {
    fn run<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<PipelineOutput>>;
}
