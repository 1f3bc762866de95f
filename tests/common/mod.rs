// Shared fixtures for router-level tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use csk_sniffer::config::{AppConfig, StorageConfig};
use csk_sniffer::error::Result;
use csk_sniffer::pipeline::{DetectionPipeline, PipelineOutput};
use csk_sniffer::server::create_router;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Writes a fixed set of result images, like a detector run would.
pub struct StubPipeline {
    pub images_dir: PathBuf,
    pub outputs: Vec<&'static str>,
}

impl DetectionPipeline for StubPipeline {
    fn run<'a>(&'a self, _query: &'a str) -> BoxFuture<'a, Result<PipelineOutput>> {
        async move {
            for name in &self.outputs {
                std::fs::write(self.images_dir.join(name), b"annotated")?;
            }
            Ok(PipelineOutput {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            })
        }
        .boxed()
    }
}

pub struct TestApp {
    pub root: TempDir,
    pub config: AppConfig,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_outputs(vec!["Image 1.jpg", "Image 2.jpg"])
    }

    pub fn with_outputs(outputs: Vec<&'static str>) -> Self {
        let root = TempDir::new().unwrap();
        let base = root.path();
        let mut config = AppConfig::default();
        config.storage = StorageConfig {
            images_dir: base.join("static").join("Images"),
            csv_dir: base.join("csv_files"),
            tsv_dir: base.join("tsv_files"),
            error_file: base.join("error_set.tsv"),
            kb_file: base.join("KB-CSK-SNIFFER.csv"),
            ..StorageConfig::default()
        };
        for dir in [&config.storage.images_dir, &config.storage.csv_dir, &config.storage.tsv_dir] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let pipeline = Arc::new(StubPipeline {
            images_dir: config.storage.images_dir.clone(),
            outputs,
        });
        let router = create_router(config.clone(), pipeline).unwrap();

        Self { root, config, router }
    }

    pub fn images_dir(&self) -> &Path {
        &self.config.storage.images_dir
    }

    pub fn write_image(&self, name: &str, data: &[u8]) {
        std::fs::write(self.images_dir().join(name), data).unwrap();
    }

    pub fn image_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.images_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, form: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap()).await
    }

    /// Open a session and return its `name=value` cookie pair.
    pub async fn start_session(&self) -> String {
        let response = self.get("/status", None).await;
        session_cookie(&response).expect("first visit sets a session cookie")
    }
}

pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
