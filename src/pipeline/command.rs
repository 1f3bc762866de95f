// Pipeline backed by an external command
// Author: kelexine (https://github.com/kelexine)

use super::{DetectionPipeline, PipelineOutput};
use crate::config::PipelineConfig;
use crate::error::{AppError, Result};
use crate::metrics;
use futures::future::{BoxFuture, FutureExt};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs `<program> <args...> <query>` and waits for it to finish.
pub struct CommandPipeline {
    config: PipelineConfig,
}

impl CommandPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    async fn execute(&self, query: &str) -> Result<PipelineOutput> {
        info!(
            "Running detection pipeline: {} {:?} {:?}",
            self.config.program, self.config.args, query
        );

        let child = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(query)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let output = match tokio::time::timeout(timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                metrics::record_pipeline_run("error");
                return Err(AppError::Pipeline(format!(
                    "failed to start {}: {}",
                    self.config.program, e
                )));
            }
            Err(_) => {
                metrics::record_pipeline_run("timeout");
                return Err(AppError::PipelineTimeout(self.config.timeout_seconds));
            }
        };

        let result = PipelineOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        // A failing run still leaves partial outputs worth showing
        if result.succeeded() {
            metrics::record_pipeline_run("success");
            info!("Detection pipeline finished for query {:?}", query);
        } else {
            metrics::record_pipeline_run("nonzero_exit");
            warn!(
                "Detection pipeline exited with {:?}: {}",
                result.exit_code,
                result.stderr.trim()
            );
        }
        debug!("Pipeline stdout: {}", result.stdout.trim());

        Ok(result)
    }
}

impl DetectionPipeline for CommandPipeline {
    fn run<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<PipelineOutput>> {
        self.execute(query).boxed()
    }
}
