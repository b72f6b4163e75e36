//! End-to-end tests for the HTTP surface, served on an ephemeral port.

use async_trait::async_trait;
use browser::{BookmarkStore, JobsManager, api, kv::MemoryKeyValueStore};
use common::Job;
use fetcher::{ApiError, JobSource};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Serves fixed pages; unknown pages are empty, `failing_page` answers 500.
struct FixedSource {
    pages: HashMap<u32, Vec<Job>>,
    failing_page: Option<u32>,
}

#[async_trait]
impl JobSource for FixedSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Job>, ApiError> {
        if self.failing_page == Some(page) {
            return Err(ApiError::Status { status: 500 });
        }
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}

fn job(id: i64, title: &str) -> Job {
    let mut job = Job::new(id, title, "Acme");
    job.whatsapp_no = Some("919999999999".to_string());
    job
}

async fn spawn_app(pages: HashMap<u32, Vec<Job>>) -> String {
    spawn_failing_app(pages, None).await
}

async fn spawn_failing_app(pages: HashMap<u32, Vec<Job>>, failing_page: Option<u32>) -> String {
    let manager = Arc::new(JobsManager::new(
        FixedSource {
            pages,
            failing_page,
        },
        BookmarkStore::memory(MemoryKeyValueStore::new()),
    ));
    manager.initialize().await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(manager)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn get_json(url: String) -> Value {
    reqwest::get(url).await.unwrap().json().await.unwrap()
}

async fn post_json(url: String) -> Value {
    reqwest::Client::new()
        .post(url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_list_and_paginate() {
    let base = spawn_app(HashMap::from([
        (1, vec![job(1, "Driver"), job(2, "Cook")]),
        (2, vec![job(3, "Tailor")]),
    ]))
    .await;

    let body = get_json(format!("{}/jobs", base)).await;
    assert_eq!(ids(&body["jobs"]), vec![1, 2]);
    assert_eq!(body["page"], 1);
    assert_eq!(body["screen"]["state"], "jobs");
    assert_eq!(body["screen"]["footer_loading"], false);

    let body = post_json(format!("{}/jobs/more", base)).await;
    assert_eq!(ids(&body["jobs"]), vec![1, 2, 3]);
    assert_eq!(body["page"], 2);
    assert_eq!(body["has_more"], true);

    let body = post_json(format!("{}/jobs/more", base)).await;
    assert_eq!(ids(&body["jobs"]), vec![1, 2, 3]);
    assert_eq!(body["has_more"], false);

    let body = post_json(format!("{}/jobs/refresh", base)).await;
    assert_eq!(ids(&body["jobs"]), vec![1, 2]);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn test_detail_and_bookmarks() {
    let base = spawn_app(HashMap::from([(1, vec![job(5, "Cook")])])).await;

    let body = get_json(format!("{}/bookmarks", base)).await;
    assert_eq!(body["state"], "empty");

    let body = post_json(format!("{}/jobs/5/bookmark", base)).await;
    assert_eq!(body["id"], 5);
    assert_eq!(body["bookmarked"], true);

    let body = get_json(format!("{}/bookmarks", base)).await;
    assert_eq!(body["state"], "jobs");
    assert_eq!(ids(&body["jobs"]), vec![5]);

    let detail = get_json(format!("{}/jobs/5", base)).await;
    assert_eq!(detail["title"], "Cook");
    assert_eq!(detail["bookmarked"], true);
    assert_eq!(detail["salary"], "Not specified");
    assert_eq!(detail["contact"]["tel_url"], "tel:919999999999");

    let body = post_json(format!("{}/jobs/5/bookmark", base)).await;
    assert_eq!(body["bookmarked"], false);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let base = spawn_app(HashMap::from([(1, vec![job(1, "Driver")])])).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{}/jobs/404", base)).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Job not found. It may have been removed or is no longer available."
    );

    let response = client
        .post(format!("{}/jobs/404/bookmark", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_source_failure_is_reported_in_state() {
    let base = spawn_failing_app(HashMap::from([(1, vec![job(1, "Driver")])]), Some(2)).await;

    let body = post_json(format!("{}/jobs/more", base)).await;
    assert_eq!(ids(&body["jobs"]), vec![1]);
    assert_eq!(body["page"], 1);
    assert_eq!(body["has_more"], true);
    assert_eq!(body["error"], "Failed to load more jobs. Please try again.");
    // The list stays on screen; the error does not replace it.
    assert_eq!(body["screen"]["state"], "jobs");

    let body = post_json(format!("{}/jobs/refresh", base)).await;
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let base = spawn_app(HashMap::new()).await;
    let text = reqwest::get(format!("{}/", base)).await.unwrap().text().await.unwrap();
    assert!(text.contains("/jobs/{id}/bookmark"));

    let body = get_json(format!("{}/jobs", base)).await;
    assert_eq!(body["screen"]["state"], "empty");
    assert_eq!(body["has_more"], false);
}
