use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::console::{Console, StdConsole};
use crate::error::Result;
use crate::fetcher::{Fetcher, ParallelFetcher, SequentialFetcher};
use crate::filename;
use crate::hooks::{IndexRecordSetter, RequestHook, ResponseHook};
use crate::logging;
use crate::session::{self, Session};
use crate::store::IndexReader;
use crate::termination::TerminationPolicy;

/// Selects which [`Fetcher`] implementation `Crawler::get` drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Concurrent, staggered-start fetching via [`ParallelFetcher`].
    Async,
    /// Strictly ordered, one-at-a-time fetching via [`SequentialFetcher`].
    Sync,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Async
    }
}

/// Per-call options for [`Crawler::get`].
#[derive(Default, Clone)]
pub struct GetOptions {
    pub out_file_name: Option<String>,
    pub request_delay: Duration,
    pub response_processor: Option<ResponseHook>,
    pub index_record_setter: Option<IndexRecordSetter>,
    pub request_processor: Option<RequestHook>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn out_file_name(mut self, name: impl Into<String>) -> Self {
        self.out_file_name = Some(name.into());
        self
    }

    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn response_processor(mut self, processor: ResponseHook) -> Self {
        self.response_processor = Some(processor);
        self
    }

    pub fn index_record_setter(mut self, setter: IndexRecordSetter) -> Self {
        self.index_record_setter = Some(setter);
        self
    }

    pub fn request_processor(mut self, processor: RequestHook) -> Self {
        self.request_processor = Some(processor);
        self
    }
}

/// Binds a [`Fetcher`] to a resumable [`IndexReader`], computing the work-set on every call and
/// resuming automatically when the same URL set is submitted again.
pub struct Crawler {
    out_file_path: PathBuf,
    mode: Mode,
    termination_criteria: TerminationPolicy,
    log_level: log::LevelFilter,
    console: Arc<dyn Console>,
    session: Option<Arc<dyn Session>>,
}

impl Crawler {
    /// Creates a crawler writing its stores under `out_file_path`.
    pub fn new(out_file_path: impl Into<PathBuf>) -> Self {
        Crawler {
            out_file_path: out_file_path.into(),
            mode: Mode::default(),
            termination_criteria: TerminationPolicy::default(),
            log_level: log::LevelFilter::Info,
            console: Arc::new(StdConsole),
            session: None,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn termination_criteria(mut self, policy: TerminationPolicy) -> Self {
        self.termination_criteria = policy;
        self
    }

    pub fn log_level(mut self, level: log::LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    /// Overrides the HTTP session used by `get`. Mainly useful for tests, where a mock session
    /// stands in for a real network connection.
    pub fn session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Fetches every URL in `urls` not already present in the resolved store, applying
    /// `options`'s hooks, and returns the store for postfetch querying.
    pub async fn get(&self, urls: Vec<String>, options: GetOptions) -> Result<IndexReader> {
        logging::init(self.log_level);

        let urls = filename::dedupe_preserving_order(urls);
        let base = options
            .out_file_name
            .clone()
            .unwrap_or_else(|| filename::derive_name(&urls));

        let store = IndexReader::open(
            &self.out_file_path,
            &base,
            options.index_record_setter.clone(),
            self.console.as_ref(),
        )?;

        let work_set: Vec<String> = urls
            .iter()
            .filter(|url| !store.contains_url(url))
            .cloned()
            .collect();

        log::info!(
            "crawling {} of {} URLs ({} already indexed)",
            work_set.len(),
            urls.len(),
            urls.len() - work_set.len()
        );

        if work_set.is_empty() {
            return Ok(store);
        }

        let session = self.session.clone().unwrap_or_else(session::default_session);
        let fetcher: Box<dyn Fetcher> = match self.mode {
            Mode::Async => Box::new(ParallelFetcher),
            Mode::Sync => Box::new(SequentialFetcher),
        };

        let request_processor = options
            .request_processor
            .clone()
            .unwrap_or_else(crate::hooks::noop_request_hook);

        let response_processor = options.response_processor.clone();
        let store = Arc::new(Mutex::new(store));
        let store_for_hook = store.clone();

        let internal_response_hook: ResponseHook = Arc::new(move |response, session| {
            let response_processor = response_processor.clone();
            let store = store_for_hook.clone();

            Box::pin(async move {
                let url = response.url.clone();
                let record = match &response_processor {
                    Some(processor) => processor(response, session).await?,
                    None => Some(response.to_value()),
                };

                let record = match record {
                    Some(record) => record,
                    None => {
                        log::debug!("skipped storing {}", url);
                        return Ok(None);
                    }
                };

                store.lock().await.write(&url, record.clone())?;
                Ok(Some(record))
            })
        });

        fetcher
            .get(
                work_set,
                request_processor,
                internal_response_hook,
                options.request_delay,
                self.termination_criteria.clone(),
                session,
            )
            .await?;

        Ok(Arc::try_unwrap(store)
            .unwrap_or_else(|_| unreachable!("fetch completed, no other references remain"))
            .into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::AutoConfirm;
    use crate::response::Response;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct MockSession {
        responses: HashMap<String, u16>,
        requested: Arc<StdMutex<Vec<String>>>,
    }

    #[async_trait]
    impl Session for MockSession {
        async fn get(&self, url: &str) -> Result<Response> {
            self.requested.lock().unwrap().push(url.to_owned());
            let status = self.responses.get(url).copied().unwrap_or(200);

            Ok(Response {
                url: url.to_owned(),
                status,
                text: Some(format!("body for {}", url)),
                json: None,
                headers: HashMap::new(),
            })
        }
    }

    #[tokio::test]
    async fn s1_empty_input_creates_empty_store() {
        let dir = tempdir().unwrap();
        let crawler = Crawler::new(dir.path())
            .console(Arc::new(AutoConfirm))
            .session(Arc::new(MockSession::default()));

        let reader = crawler.get(vec![], GetOptions::new()).await.unwrap();
        assert_eq!(reader.len(), 0);

        let reader_again = crawler.get(vec![], GetOptions::new()).await.unwrap();
        assert_eq!(reader.path(), reader_again.path());
    }

    #[tokio::test]
    async fn s2_skips_404_responses() {
        let dir = tempdir().unwrap();
        let urls: Vec<String> = (80..110).map(|i| format!("http://x/posts/{}", i)).collect();

        let mut responses = HashMap::new();
        for (i, url) in urls.iter().enumerate() {
            if i % 3 == 0 {
                responses.insert(url.clone(), 404);
            }
        }
        let not_found = responses.len();

        let session = Arc::new(MockSession {
            responses,
            requested: Arc::new(StdMutex::new(Vec::new())),
        });

        let crawler = Crawler::new(dir.path())
            .console(Arc::new(AutoConfirm))
            .session(session);

        let processor: ResponseHook = Arc::new(|response: Response, _session| {
            Box::pin(async move {
                if response.status == 404 {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(response.text.unwrap_or_default())))
                }
            })
        });

        let reader = crawler
            .get(urls.clone(), GetOptions::new().response_processor(processor))
            .await
            .unwrap();

        assert_eq!(reader.len(), urls.len() - not_found);
    }

    #[tokio::test]
    async fn s3_resumes_without_refetching() {
        let dir = tempdir().unwrap();
        let urls: Vec<String> = (0..6).map(|i| format!("http://x/{}", i)).collect();
        let requested = Arc::new(StdMutex::new(Vec::new()));

        let session = Arc::new(MockSession {
            responses: HashMap::new(),
            requested: requested.clone(),
        });

        let crawler = Crawler::new(dir.path())
            .console(Arc::new(AutoConfirm))
            .session(session);

        let subset = urls[..3].to_vec();
        crawler.get(subset, GetOptions::new()).await.unwrap();
        requested.lock().unwrap().clear();

        let reader = crawler.get(urls.clone(), GetOptions::new()).await.unwrap();

        let mut second_pass: Vec<String> = requested.lock().unwrap().clone();
        second_pass.sort();
        let mut expected: Vec<String> = urls[3..].to_vec();
        expected.sort();

        assert_eq!(second_pass, expected);
        assert_eq!(reader.len(), urls.len());
    }

    #[tokio::test]
    async fn s5_termination_list_aborts_after_first_match() {
        let dir = tempdir().unwrap();
        let urls: Vec<String> = vec!["a", "b", "c", "d", "e"]
            .into_iter()
            .map(String::from)
            .collect();
        let statuses = [200, 204, 404, 418, 500];

        let mut responses = HashMap::new();
        for (url, status) in urls.iter().zip(statuses.iter()) {
            responses.insert(url.clone(), *status);
        }

        let session = Arc::new(MockSession {
            responses,
            requested: Arc::new(StdMutex::new(Vec::new())),
        });

        let crawler = Crawler::new(dir.path())
            .mode(Mode::Sync)
            .console(Arc::new(AutoConfirm))
            .session(session)
            .termination_criteria(TerminationPolicy::List(vec![
                crate::termination::StatusMatcher::Range(300, 400),
                crate::termination::StatusMatcher::Range(405, 430),
            ]));

        let result = crawler.get(urls, GetOptions::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn s6_rebuilds_index_after_deletion() {
        let dir = tempdir().unwrap();
        let urls: Vec<String> = vec!["a", "b", "c"].into_iter().map(String::from).collect();

        let session = Arc::new(MockSession {
            responses: HashMap::new(),
            requested: Arc::new(StdMutex::new(Vec::new())),
        });

        let crawler = Crawler::new(dir.path())
            .console(Arc::new(AutoConfirm))
            .session(session);

        let reader = crawler.get(urls, GetOptions::new()).await.unwrap();
        let index_path = reader.index_path().to_path_buf();
        let base = index_path.file_stem().unwrap().to_string_lossy().to_string();
        drop(reader);

        std::fs::remove_file(&index_path).unwrap();

        let reopened =
            IndexReader::open(dir.path(), &base, None, &AutoConfirm).unwrap();
        assert_eq!(reopened.len(), 3);
    }
}
