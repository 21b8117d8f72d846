use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::hooks::{RequestHook, ResponseHook};
use crate::session::Session;
use crate::termination::TerminationPolicy;

use super::Fetcher;

/// Issues URLs one at a time, strictly in input order, spaced by at least `min_request_delay`.
pub struct SequentialFetcher;

#[async_trait]
impl Fetcher for SequentialFetcher {
    async fn get(
        &self,
        urls: Vec<String>,
        on_request: RequestHook,
        on_response: ResponseHook,
        min_request_delay: Duration,
        termination: TerminationPolicy,
        session: Arc<dyn Session>,
    ) -> Result<()> {
        let last = urls.len().saturating_sub(1);

        for (i, url) in urls.into_iter().enumerate() {
            on_request(&url);

            log::debug!("fetching {}", url);
            let response = session.get(&url).await?;

            if let Some(error) = termination.evaluate(response.status, &url) {
                return Err(error);
            }

            on_response(response, session.clone()).await?;

            if i != last && !min_request_delay.is_zero() {
                tokio::time::sleep(min_request_delay).await;
            }
        }

        Ok(())
    }
}
