// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    about_handler, clear_cache_handler, collocations_handler, csk_graph_handler,
    error_set_handler, health_handler, home_page_handler, image_handler, inverted_index_handler,
    metrics_handler, new_search_handler, output_status_handler, results_handler,
    search_page_handler, status_handler, submit_search_handler,
};
use super::middleware::{request_id_layers, session_middleware};
use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::DetectionPipeline;
use crate::session::SessionStore;
use crate::workspace::OutputWorkspace;
use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<SessionStore>,
    pub workspace: Arc<OutputWorkspace>,
    pub pipeline: Arc<dyn DetectionPipeline>,
}

pub fn create_router(config: AppConfig, pipeline: Arc<dyn DetectionPipeline>) -> Result<Router> {
    let state = AppState {
        sessions: Arc::new(SessionStore::new(&config.session)),
        workspace: Arc::new(OutputWorkspace::new(config.storage.clone())),
        pipeline,
        config,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    // Everything a browser page touches runs inside a session
    let session_routes = Router::new()
        .route("/", get(search_page_handler).post(submit_search_handler))
        .route("/results", get(results_handler))
        .route("/get_images", get(results_handler))
        .route("/new_search", get(new_search_handler))
        .route("/cleanup", get(new_search_handler))
        .route("/clear_cache", get(clear_cache_handler).post(clear_cache_handler))
        .route("/status", get(status_handler))
        .route("/output_status", get(output_status_handler))
        .route("/home_page", get(home_page_handler))
        .route("/about", get(about_handler))
        .route("/get_collocations_map", get(collocations_handler))
        .route("/get_inverted_index", get(inverted_index_handler))
        .route("/get_error_set", get(error_set_handler))
        .route("/get_csk_graph", get(csk_graph_handler))
        .layer(from_fn_with_state(state.clone(), session_middleware));

    // Sessionless: image fetches and health checks never create or touch a session
    let app = Router::new()
        .merge(session_routes)
        .route("/images/:filename", get(image_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Only small search forms are ever posted
        .layer(tower_http::limit::RequestBodyLimitLayer::new(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
