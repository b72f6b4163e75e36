//! Job browser
//!
//! Paginated job listings from the remote API, plus locally persisted
//! bookmarks, exposed to UI clients over HTTP.

pub mod api;
pub mod bookmarks;
pub mod config;
pub mod kv;
pub mod state;
pub mod view;

pub use bookmarks::{BookmarkStore, StorageBackend};
pub use config::BrowserConfig;
pub use kv::StorageError;
pub use state::{JobsManager, SessionState};
