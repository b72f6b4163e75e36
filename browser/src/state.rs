//! Job list and bookmark session state.
//!
//! [`JobsManager`] owns everything the presentation layer reads: the
//! fetched jobs, the paging cursor, the busy flags, the last error and
//! the bookmarked jobs. Every failure below it is logged and turned
//! into a user-facing `error` string; no operation fails outright.
//!
//! The session lock is only ever held between I/O points, never across
//! an `.await`, so operations can interleave at their network and
//! storage calls while each state mutation stays atomic.

use crate::bookmarks::BookmarkStore;
use common::{Job, JobId};
use fetcher::JobSource;
use log::{error, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const INITIAL_LOAD_FAILED: &str =
    "Failed to load jobs. Please check your connection and try again.";
pub const FETCH_MORE_FAILED: &str = "Failed to load more jobs. Please try again.";
pub const REFRESH_FAILED: &str =
    "Failed to refresh jobs. Please check your connection and try again.";
pub const BOOKMARK_LOAD_FAILED: &str = "Failed to load bookmarked jobs";
pub const BOOKMARK_SETUP_FAILED: &str = "Failed to load saved jobs. Please restart the app.";
pub const TOGGLE_FAILED: &str = "Failed to update bookmark. Please try again.";

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub jobs: Vec<Job>,
    /// Last page successfully appended, 1-based.
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub bookmarked_jobs: Vec<Job>,
}

impl SessionState {
    /// State before the first page arrives: loading, nothing fetched yet.
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            page: 1,
            has_more: true,
            loading: true,
            refreshing: false,
            error: None,
            bookmarked_jobs: Vec::new(),
        }
    }

    pub fn is_bookmarked(&self, id: JobId) -> bool {
        self.bookmarked_jobs.iter().any(|j| j.id == id)
    }

    /// Look a job up for the detail view: fetched jobs first, then bookmarks.
    pub fn find_job(&self, id: JobId) -> Option<&Job> {
        self.jobs
            .iter()
            .find(|j| j.id == id)
            .or_else(|| self.bookmarked_jobs.iter().find(|j| j.id == id))
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the session and the two collaborators it is built from.
///
/// Share it behind an `Arc`; every operation takes `&self`.
pub struct JobsManager<S> {
    source: S,
    bookmarks: BookmarkStore,
    state: Mutex<SessionState>,
    /// Orders bookmark reloads so an older read never lands after a newer one.
    reload_lock: tokio::sync::Mutex<()>,
}

impl<S: JobSource> JobsManager<S> {
    pub fn new(source: S, bookmarks: BookmarkStore) -> Self {
        Self {
            source,
            bookmarks,
            state: Mutex::new(SessionState::new()),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the first page and the saved bookmarks.
    ///
    /// The two run concurrently and independently; either may fail
    /// without affecting the other.
    pub async fn initialize(&self) {
        tokio::join!(self.load_initial_jobs(), self.initialize_bookmarks());
    }

    async fn load_initial_jobs(&self) {
        self.session().loading = true;

        match self.source.fetch_page(1).await {
            Ok(jobs) => {
                info!("Loaded {} jobs for page 1", jobs.len());
                let mut s = self.session();
                s.has_more = !jobs.is_empty();
                s.jobs = jobs;
                s.page = 1;
            }
            Err(e) => {
                error!("Error fetching jobs: {}", e);
                self.session().error = Some(INITIAL_LOAD_FAILED.to_string());
            }
        }

        self.session().loading = false;
    }

    async fn initialize_bookmarks(&self) {
        if let Err(e) = self.bookmarks.setup().await {
            error!("Failed to initialize bookmark storage: {}", e);
            self.session().error = Some(BOOKMARK_SETUP_FAILED.to_string());
            return;
        }
        self.load_bookmarked_jobs().await;
    }

    /// Replace the in-memory bookmarks with what the store holds.
    /// An unreadable store counts as having no bookmarks.
    async fn load_bookmarked_jobs(&self) {
        let _reload = self.reload_lock.lock().await;
        match self.bookmarks.list_bookmarks().await {
            Ok(saved) => {
                info!("Loaded bookmarked jobs: {}", saved.len());
                self.session().bookmarked_jobs = saved;
            }
            Err(e) => {
                error!("Error loading bookmarked jobs: {}", e);
                let mut s = self.session();
                s.bookmarked_jobs.clear();
                s.error = Some(BOOKMARK_LOAD_FAILED.to_string());
            }
        }
    }

    /// Append the next page.
    ///
    /// Does nothing when the last page was empty or a fetch is already
    /// in flight.
    pub async fn fetch_more_jobs(&self) {
        let next_page = {
            let mut s = self.session();
            if !s.has_more || s.loading {
                return;
            }
            s.loading = true;
            s.page + 1
        };

        let result = self.source.fetch_page(next_page).await;

        let mut s = self.session();
        match result {
            Ok(new_jobs) if new_jobs.is_empty() => {
                info!("Page {} is empty, no more jobs", next_page);
                s.has_more = false;
                s.error = None;
            }
            Ok(new_jobs) => {
                let seen: HashSet<JobId> = s.jobs.iter().map(|j| j.id).collect();
                let repeated = new_jobs.iter().filter(|j| seen.contains(&j.id)).count();
                if repeated > 0 {
                    warn!("Page {} repeats {} already listed jobs", next_page, repeated);
                }

                info!("Appending {} jobs from page {}", new_jobs.len(), next_page);
                s.jobs.extend(new_jobs);
                s.page = next_page;
                s.error = None;
            }
            Err(e) => {
                error!("Error fetching more jobs: {}", e);
                s.error = Some(FETCH_MORE_FAILED.to_string());
            }
        }
        s.loading = false;
    }

    /// Reload page 1 from scratch and re-read the bookmarks.
    pub async fn refresh_jobs(&self) {
        {
            let mut s = self.session();
            s.refreshing = true;
            s.error = None;
        }

        match self.source.fetch_page(1).await {
            Ok(jobs) => {
                {
                    let mut s = self.session();
                    s.has_more = !jobs.is_empty();
                    s.jobs = jobs;
                    s.page = 1;
                }
                self.load_bookmarked_jobs().await;
            }
            Err(e) => {
                error!("Error refreshing jobs: {}", e);
                self.session().error = Some(REFRESH_FAILED.to_string());
            }
        }

        self.session().refreshing = false;
    }

    /// Flip the bookmark on `job` and return whether it is bookmarked afterwards.
    ///
    /// The in-memory list is updated once the store write succeeds and then
    /// reconciled with a full reload. A failed write leaves it untouched.
    pub async fn toggle_bookmark(&self, job: &Job) -> bool {
        let currently_bookmarked = self.is_bookmarked(job.id);

        let outcome = if currently_bookmarked {
            self.bookmarks.remove_bookmark(job.id).await.map(|()| {
                self.session().bookmarked_jobs.retain(|j| j.id != job.id);
            })
        } else {
            self.bookmarks.add_bookmark(job).await.map(|()| {
                let mut s = self.session();
                if !s.is_bookmarked(job.id) {
                    s.bookmarked_jobs.push(job.clone());
                }
            })
        };

        match outcome {
            Ok(()) => {
                self.session().error = None;
                self.load_bookmarked_jobs().await;
            }
            Err(e) => {
                error!("Error toggling bookmark for job {}: {}", job.id, e);
                self.session().error = Some(TOGGLE_FAILED.to_string());
            }
        }

        self.is_bookmarked(job.id)
    }

    pub fn is_bookmarked(&self, id: JobId) -> bool {
        self.session().is_bookmarked(id)
    }

    pub fn find_job(&self, id: JobId) -> Option<Job> {
        self.session().find_job(id).cloned()
    }

    pub fn snapshot(&self) -> SessionState {
        self.session().clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.session().jobs.clone()
    }

    pub fn bookmarked_jobs(&self) -> Vec<Job> {
        self.session().bookmarked_jobs.clone()
    }

    pub fn page(&self) -> u32 {
        self.session().page
    }

    pub fn has_more(&self) -> bool {
        self.session().has_more
    }

    pub fn loading(&self) -> bool {
        self.session().loading
    }

    pub fn refreshing(&self) -> bool {
        self.session().refreshing
    }

    pub fn error(&self) -> Option<String> {
        self.session().error.clone()
    }

    pub fn bookmark_store(&self) -> &BookmarkStore {
        &self.bookmarks
    }
}
