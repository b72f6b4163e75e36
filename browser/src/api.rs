//! HTTP surface over the job session.
//!
//! Any UI client can drive the session through these endpoints. Source
//! and storage failures never turn into 5xx responses; they show up in
//! the `error` field of the returned state.

use crate::state::{JobsManager, SessionState};
use crate::view::{BookmarksScreen, JOB_NOT_FOUND, JobDetail, ListScreen};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use common::JobId;
use fetcher::JobSource;
use serde::Serialize;
use std::sync::Arc;

/// Session state plus the list screen derived from it.
#[derive(Debug, Serialize)]
pub struct JobsResponse {
    #[serde(flatten)]
    pub session: SessionState,
    pub screen: ListScreen,
}

impl JobsResponse {
    fn from_session(session: SessionState) -> Self {
        let screen = ListScreen::from_session(&session);
        Self { session, screen }
    }
}

#[derive(Debug, Serialize)]
pub struct BookmarkToggleResponse {
    pub id: JobId,
    pub bookmarked: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type NotFound = (StatusCode, Json<ErrorResponse>);

fn not_found() -> NotFound {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: JOB_NOT_FOUND.to_string(),
        }),
    )
}

pub fn router<S: JobSource + 'static>(manager: Arc<JobsManager<S>>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/jobs", get(jobs_handler::<S>))
        .route("/jobs/more", post(more_handler::<S>))
        .route("/jobs/refresh", post(refresh_handler::<S>))
        .route("/jobs/{id}", get(detail_handler::<S>))
        .route("/jobs/{id}/bookmark", post(toggle_handler::<S>))
        .route("/bookmarks", get(bookmarks_handler::<S>))
        .with_state(manager)
}

/// Handler for GET / (root)
async fn root_handler() -> &'static str {
    "💼 Job Browser API\n\nEndpoints:\n  GET  /jobs                - Current job list\n  POST /jobs/more           - Load the next page\n  POST /jobs/refresh        - Reload from page 1\n  GET  /jobs/{id}           - Job details\n  POST /jobs/{id}/bookmark  - Toggle bookmark\n  GET  /bookmarks           - Saved jobs\n"
}

/// Handler for GET /jobs
async fn jobs_handler<S: JobSource + 'static>(
    State(manager): State<Arc<JobsManager<S>>>,
) -> Json<JobsResponse> {
    Json(JobsResponse::from_session(manager.snapshot()))
}

/// Handler for POST /jobs/more
async fn more_handler<S: JobSource + 'static>(
    State(manager): State<Arc<JobsManager<S>>>,
) -> Json<JobsResponse> {
    manager.fetch_more_jobs().await;
    Json(JobsResponse::from_session(manager.snapshot()))
}

/// Handler for POST /jobs/refresh
async fn refresh_handler<S: JobSource + 'static>(
    State(manager): State<Arc<JobsManager<S>>>,
) -> Json<JobsResponse> {
    manager.refresh_jobs().await;
    Json(JobsResponse::from_session(manager.snapshot()))
}

/// Handler for GET /jobs/{id}
async fn detail_handler<S: JobSource + 'static>(
    State(manager): State<Arc<JobsManager<S>>>,
    Path(id): Path<JobId>,
) -> Result<Json<JobDetail>, NotFound> {
    let job = manager.find_job(id).ok_or_else(not_found)?;
    Ok(Json(JobDetail::new(&job, manager.is_bookmarked(id))))
}

/// Handler for POST /jobs/{id}/bookmark
async fn toggle_handler<S: JobSource + 'static>(
    State(manager): State<Arc<JobsManager<S>>>,
    Path(id): Path<JobId>,
) -> Result<Json<BookmarkToggleResponse>, NotFound> {
    let job = manager.find_job(id).ok_or_else(not_found)?;
    let bookmarked = manager.toggle_bookmark(&job).await;
    Ok(Json(BookmarkToggleResponse { id, bookmarked }))
}

/// Handler for GET /bookmarks
async fn bookmarks_handler<S: JobSource + 'static>(
    State(manager): State<Arc<JobsManager<S>>>,
) -> Json<BookmarksScreen> {
    Json(BookmarksScreen::from_session(&manager.snapshot()))
}
