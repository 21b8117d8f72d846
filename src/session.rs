use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{CrawlerError, Result};
use crate::response::Response;

/// A reusable HTTP capability shared across every fetch in one [`Crawler::get`](crate::crawler::Crawler::get)
/// call.
///
/// Implementors must be cheap to share (`Send + Sync`) since the same instance is handed to every
/// response hook, including ones that issue follow-up requests.
#[async_trait]
pub trait Session: Send + Sync {
    async fn get(&self, url: &str) -> Result<Response>;
}

/// The default [`Session`], backed by one shared [`reqwest::Client`].
pub struct ReqwestSession {
    client: Client,
}

impl ReqwestSession {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("arc-crawler/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client configuration is always valid");

        ReqwestSession { client }
    }
}

impl Default for ReqwestSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Session for ReqwestSession {
    async fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CrawlerError::Request {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect::<HashMap<_, _>>();

        let is_json = headers
            .get("content-type")
            .map(|ct| ct.contains("json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|source| CrawlerError::Request {
                url: url.to_owned(),
                source,
            })?;

        let json = if is_json {
            serde_json::from_str(&text).ok()
        } else {
            None
        };

        Ok(Response {
            url: url.to_owned(),
            status,
            text: Some(text),
            json,
            headers,
        })
    }
}

/// Constructs the default session, boxed for use behind `Arc<dyn Session>`.
pub fn default_session() -> Arc<dyn Session> {
    Arc::new(ReqwestSession::new())
}
