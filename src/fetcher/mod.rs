pub mod parallel;
pub mod sequential;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::hooks::{RequestHook, ResponseHook};
use crate::session::Session;
use crate::termination::TerminationPolicy;

pub use parallel::ParallelFetcher;
pub use sequential::SequentialFetcher;

/// The contract shared by [`SequentialFetcher`] and [`ParallelFetcher`].
///
/// Both drive the same URL list against the same session, invoking `on_request` before each GET
/// and `on_response` after each response is received, subject to `min_request_delay` spacing and
/// `termination` aborting the whole batch on a fatal status.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(
        &self,
        urls: Vec<String>,
        on_request: RequestHook,
        on_response: ResponseHook,
        min_request_delay: Duration,
        termination: TerminationPolicy,
        session: Arc<dyn Session>,
    ) -> Result<()>;
}
