// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{AppError, Result};
use crate::images::{no_store_headers, ImageResponse};
use crate::invalidation::{clear_browser_cache, start_new_search, Invalidation};
use crate::metrics::gather_metrics;
use crate::reports::{self, TableReport};
use crate::session::SessionState;
use crate::views::{
    AboutPage, HomePage, OutputStatusPage, ResultsPage, SearchPage, TablePage, REFRESHED_MESSAGE,
};
use crate::workspace::{OutputSummary, OutputWorkspace};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Redirect target after a new search or manual cleanup.
pub const REFRESHED_HOME: &str = "/?refreshed=1";

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Present after an invalidation redirect; the value is ignored.
    pub refreshed: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub t: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub cache_buster: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub current_query: String,
    pub search_id: String,
    pub cache_buster: u64,
    pub session_started: String,
    #[serde(flatten)]
    pub outputs: OutputSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Clear the previous search's files off the request thread, then advance
/// the epoch.
async fn invalidate_for_new_search(
    state: &AppState,
    session: Arc<SessionState>,
) -> Result<Invalidation> {
    let workspace = state.workspace.clone();
    tokio::task::spawn_blocking(move || start_new_search(&session, workspace.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("cleanup task failed: {}", e)))
}

fn render_search_page(state: &AppState, message: Option<String>, error: Option<String>) -> Result<Html<String>> {
    let page = SearchPage {
        has_results: state.workspace.has_any_output(),
        message,
        error,
    };
    Ok(Html(page.render()?))
}

/// GET / - search form
pub async fn search_page_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>> {
    let message = params.refreshed.map(|_| REFRESHED_MESSAGE.to_string());
    render_search_page(&state, message, None)
}

/// POST / - run a new search
pub async fn submit_search_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<SessionState>>,
    Form(form): Form<SearchForm>,
) -> Result<Response> {
    let query = form.t.trim().to_string();
    if query.is_empty() {
        let page = render_search_page(&state, None, Some("Please enter a search term.".to_string()))?;
        return Ok(page.into_response());
    }

    let search_id = session.begin_search(&query);
    info!("Session {}: starting {} for query {:?}", session.id(), search_id, query);

    invalidate_for_new_search(&state, session.clone()).await?;

    match state.pipeline.run(&query).await {
        Ok(_) => {
            info!("Search completed for query: {}", query);
            Ok(Redirect::to("/results").into_response())
        }
        Err(e) => {
            error!("Error processing search {:?}: {}", query, e);
            let message = format!("An error occurred while processing your search: {}", e);
            Ok(render_search_page(&state, None, Some(message))?.into_response())
        }
    }
}

/// GET /results - annotated image gallery
pub async fn results_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<SessionState>>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>> {
    let page = ResultsPage::build(&session, &state.workspace, params.refreshed.is_some());
    Ok(Html(page.render()?))
}

/// GET /new_search, GET /cleanup - drop previous results and start over
pub async fn new_search_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<SessionState>>,
) -> Result<Redirect> {
    invalidate_for_new_search(&state, session).await?;
    Ok(Redirect::to(REFRESHED_HOME))
}

/// POST /clear_cache - new epoch only, files untouched
pub async fn clear_cache_handler(
    Extension(session): Extension<Arc<SessionState>>,
) -> Json<ClearCacheResponse> {
    let outcome = clear_browser_cache(&session);
    Json(ClearCacheResponse {
        success: true,
        cache_buster: outcome.epoch,
    })
}

/// GET /images/:filename - the `v` query parameter is deliberately not read
pub async fn image_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    match ImageResponse::load(&state.workspace, &filename).await {
        Ok(image) => image.into_response(),
        Err(e) => {
            warn!("Refusing image request {:?}: {}", filename, e);
            let mut response = e.into_response();
            for (name, value) in no_store_headers() {
                response.headers_mut().insert(name, value);
            }
            response
        }
    }
}

/// GET /home_page - links to every output view
pub async fn home_page_handler(
    Extension(session): Extension<Arc<SessionState>>,
) -> Result<Html<String>> {
    Ok(Html(HomePage::build(&session).render()?))
}

/// GET /about
pub async fn about_handler() -> Result<Html<String>> {
    let page = AboutPage {
        message: None,
        error: None,
    };
    Ok(Html(page.render()?))
}

/// GET /output_status - which output files exist
pub async fn output_status_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<SessionState>>,
) -> Result<Html<String>> {
    let summary = state.workspace.summary();
    let page = OutputStatusPage {
        current_query: session
            .search()
            .query
            .unwrap_or_else(|| "No active search".to_string()),
        cache_buster: session.current_epoch(),
        files: reports::file_statuses(state.workspace.storage(), &summary),
        summary,
        message: None,
        error: None,
    };
    Ok(Html(page.render()?))
}

/// Build a report off the request thread and render it as a table page.
async fn render_report<F>(state: &AppState, build: F) -> Result<Html<String>>
where
    F: FnOnce(&OutputWorkspace) -> TableReport + Send + 'static,
{
    let workspace = state.workspace.clone();
    let report = tokio::task::spawn_blocking(move || build(workspace.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("report task failed: {}", e)))?;
    Ok(Html(TablePage::from(report).render()?))
}

/// GET /get_collocations_map
pub async fn collocations_handler(State(state): State<AppState>) -> Result<Html<String>> {
    render_report(&state, |workspace| reports::collocations_report(workspace.storage())).await
}

/// GET /get_inverted_index
pub async fn inverted_index_handler(State(state): State<AppState>) -> Result<Html<String>> {
    render_report(&state, |workspace| reports::inverted_index_report(workspace.storage())).await
}

/// GET /get_error_set
pub async fn error_set_handler(State(state): State<AppState>) -> Result<Html<String>> {
    render_report(&state, |workspace| {
        reports::error_set_report(workspace.storage(), workspace.has_any_output())
    })
    .await
}

/// GET /get_csk_graph - the knowledge base as shipped, never cleaned up
pub async fn csk_graph_handler(State(state): State<AppState>) -> Result<Html<String>> {
    render_report(&state, |workspace| reports::csk_graph_report(workspace.storage())).await
}

/// GET /status - current search and output files
pub async fn status_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<SessionState>>,
) -> Json<StatusResponse> {
    let search = session.search();
    Json(StatusResponse {
        current_query: search.query.unwrap_or_else(|| "No active search".to_string()),
        search_id: search.search_id.unwrap_or_else(|| "No session".to_string()),
        cache_buster: session.current_epoch(),
        session_started: session.created_at().to_rfc3339(),
        outputs: state.workspace.summary(),
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Check the images directory the gallery is served from
    let images_dir = &state.workspace.storage().images_dir;
    let workspace_check = if images_dir.is_dir() {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("Serving images from {}", images_dir.display()),
        }
    } else {
        overall_status = HealthStatus::Unhealthy;
        HealthCheck {
            status: "error".to_string(),
            message: format!("Images directory {} is missing", images_dir.display()),
        }
    };
    checks.insert("output_workspace".to_string(), workspace_check);

    // Check session capacity
    let active = state.sessions.len();
    let capacity = state.config.session.max_sessions;
    let sessions_check = if active >= capacity {
        if matches!(overall_status, HealthStatus::Healthy) {
            overall_status = HealthStatus::Degraded;
        }
        HealthCheck {
            status: "warning".to_string(),
            message: format!("Session store full ({} sessions), evicting oldest", active),
        }
    } else {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("{} of {} sessions in use", active, capacity),
        }
    };
    checks.insert("sessions".to_string(), sessions_check);

    let pipeline_check = HealthCheck {
        status: "ok".to_string(),
        message: format!("Pipeline program: {}", state.config.pipeline.program),
    };
    checks.insert("pipeline".to_string(), pipeline_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}
