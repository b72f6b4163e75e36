use browser::{BrowserConfig, StorageBackend};
use clap::Parser;
use std::path::PathBuf;

/// Job Browser - browse job listings and keep bookmarks offline
#[derive(Parser, Debug)]
#[command(name = "browser")]
#[command(version)]
#[command(about = "Serve the job list and bookmarks to UI clients", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/job-browser/config.toml)
    #[arg(short = 'c', long = "config", env = "JOB_BROWSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listing endpoint
    #[arg(long = "api-url", env = "JOB_BROWSER_API_URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (0 = none)
    #[arg(long = "timeout", env = "JOB_BROWSER_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Where bookmarks are kept
    #[arg(long = "storage", value_enum, env = "JOB_BROWSER_STORAGE")]
    pub storage: Option<StorageBackend>,

    /// Directory for the file storage backend
    #[arg(long = "data-dir", env = "JOB_BROWSER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(short = 'a', long = "addr", env = "JOB_BROWSER_ADDR")]
    pub addr: Option<String>,
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply(&self, config: &mut BrowserConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.api.timeout_secs = secs;
        }
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
    }
}
