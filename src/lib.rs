//! A resumable, rate-limited web crawler.
//!
//! Fetched responses are written as newline-delimited JSON to a content file, alongside a sibling
//! index file that makes the store searchable and lets a rerun over an overlapping URL set
//! resume instead of refetching.
//!
//! ```rust,no_run
//! use arc_crawler::{Crawler, GetOptions};
//!
//! # async fn run() -> arc_crawler::error::Result<()> {
//! let crawler = Crawler::new("./crawl-data");
//! let urls = vec!["https://example.com/".to_owned()];
//! let reader = crawler.get(urls, GetOptions::new()).await?;
//! println!("stored {} records", reader.len());
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod console;
pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod filename;
pub mod hooks;
pub mod logging;
pub mod response;
pub mod session;
pub mod store;
pub mod termination;

pub use body::html_body_processor;
pub use console::{AutoConfirm, Console, StdConsole};
pub use crawler::{Crawler, GetOptions, Mode};
pub use error::{CrawlerError, Result};
pub use fetcher::{Fetcher, ParallelFetcher, SequentialFetcher};
pub use response::Response;
pub use session::{ReqwestSession, Session};
pub use store::IndexReader;
pub use termination::{StatusMatcher, TerminationPolicy};
