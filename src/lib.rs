//! Bulk chatbot detection for website URL lists.
//!
//! Load a URL list, fetch every page with bounded concurrency, scan each body
//! for chat-widget keywords and elements, and report the URLs that have one.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod report;
pub mod results;

pub use batch::{check_url, BatchRunner};
pub use classifier::Classifier;
pub use config::{ScanConfig, Signatures};
pub use error::{ConfigError, LoadError, ReportError};
pub use fetcher::{FailureReason, FetchOutcome, HttpFetcher, PageFetcher};
pub use loader::{load_urls, try_load_urls};
pub use report::{write_full_report, write_report, DEFAULT_REPORT_PATH};
pub use results::{ClassifiedEntry, ResultSet, Summary};
