use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinSet;

use crate::error::Result;
use crate::hooks::{RequestHook, ResponseHook};
use crate::session::Session;
use crate::termination::TerminationPolicy;

use super::Fetcher;

/// Issues every URL as a concurrent task, staggering the *start* of consecutive tasks by
/// `min_request_delay`. There is no separate concurrency cap: the stagger is the only admission
/// control, since every task is purely I/O-bound.
///
/// Request hooks fire from the scheduling loop, in input order, before each task is spawned.
/// Response hooks fire from inside each task at its own completion time, so response order falls
/// out of real completion order with no extra bookkeeping.
pub struct ParallelFetcher;

#[async_trait]
impl Fetcher for ParallelFetcher {
    async fn get(
        &self,
        urls: Vec<String>,
        on_request: RequestHook,
        on_response: ResponseHook,
        min_request_delay: Duration,
        termination: TerminationPolicy,
        session: Arc<dyn Session>,
    ) -> Result<()> {
        let mut tasks = JoinSet::new();
        let last = urls.len().saturating_sub(1);

        for (i, url) in urls.into_iter().enumerate() {
            on_request(&url);

            let session = session.clone();
            let on_response = on_response.clone();
            let termination = termination.clone();

            tasks.spawn(async move {
                log::debug!("fetching {}", url);
                let response = session.get(&url).await?;

                if let Some(error) = termination.evaluate(response.status, &url) {
                    return Err(error);
                }

                on_response(response, session).await
            });

            if i != last && !min_request_delay.is_zero() {
                tokio::time::sleep(min_request_delay).await;
            }
        }

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(_)) => {}
                Ok(Err(error)) => {
                    tasks.abort_all();
                    return Err(error);
                }
                Err(join_error) => {
                    tasks.abort_all();
                    return Err(join_error.into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use crate::session::Session;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSession {
        responses: HashMap<String, (u16, Option<Duration>)>,
    }

    #[async_trait]
    impl Session for MockSession {
        async fn get(&self, url: &str) -> Result<Response> {
            let (status, delay) = self.responses.get(url).cloned().unwrap_or((200, None));

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            Ok(Response {
                url: url.to_owned(),
                status,
                text: Some(String::new()),
                json: None,
                headers: HashMap::new(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn responses_arrive_in_completion_order() {
        let urls = vec![
            "a".to_owned(),
            "b".to_owned(),
            "c".to_owned(),
            "d".to_owned(),
            "e".to_owned(),
        ];
        let delays = [1000, 850, 700, 550, 400];

        let mut responses = HashMap::new();
        for (url, delay) in urls.iter().zip(delays.iter()) {
            responses.insert(url.clone(), (200, Some(Duration::from_millis(*delay))));
        }

        let session: Arc<dyn Session> = Arc::new(MockSession { responses });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let on_response: ResponseHook = Arc::new(move |response, _session| {
            let seen = seen_clone.clone();
            Box::pin(async move {
                seen.lock().unwrap().push(response.url);
                Ok(None)
            })
        });

        ParallelFetcher
            .get(
                urls,
                crate::hooks::noop_request_hook(),
                on_response,
                Duration::from_millis(0),
                TerminationPolicy::default(),
                session,
            )
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["e".to_owned(), "d".to_owned(), "c".to_owned(), "b".to_owned(), "a".to_owned()]
        );
    }

    #[tokio::test]
    async fn termination_cancels_inflight_tasks() {
        let urls = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let mut responses = HashMap::new();
        responses.insert("a".to_owned(), (200, None));
        responses.insert("b".to_owned(), (500, None));
        responses.insert("c".to_owned(), (200, Some(Duration::from_secs(5))));

        let session: Arc<dyn Session> = Arc::new(MockSession { responses });

        let on_response: ResponseHook = Arc::new(|_response, _session| Box::pin(async { Ok(None) }));

        let result = ParallelFetcher
            .get(
                urls,
                crate::hooks::noop_request_hook(),
                on_response,
                Duration::from_millis(0),
                TerminationPolicy::codes(vec![500]),
                session,
            )
            .await;

        assert!(result.is_err());
    }
}
