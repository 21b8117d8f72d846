use std::sync::Arc;

use crate::error::CrawlerError;

/// A single status-code matcher within a [`TerminationPolicy::List`].
#[derive(Debug, Clone)]
pub enum StatusMatcher {
    /// Matches one exact status code.
    Code(u16),
    /// Matches a half-open range `[lo, hi)`.
    Range(u16, u16),
}

impl StatusMatcher {
    fn matches(&self, status: u16) -> bool {
        match *self {
            StatusMatcher::Code(code) => status == code,
            StatusMatcher::Range(lo, hi) => status >= lo && status < hi,
        }
    }
}

pub type TerminationCallback = Arc<dyn Fn(u16, &str) -> Option<CrawlerError> + Send + Sync>;

/// Classifies a response status as fatal to the current batch.
///
/// Evaluated once per response, before the response hook runs. A positive match aborts the
/// whole crawl.
#[derive(Clone)]
pub enum TerminationPolicy {
    /// No status is ever fatal.
    Never,
    /// A response is fatal if any matcher in the list matches its status.
    List(Vec<StatusMatcher>),
    /// A response is fatal if the callback returns `Some(error)`.
    Callback(TerminationCallback),
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        TerminationPolicy::Never
    }
}

impl TerminationPolicy {
    pub fn codes(codes: impl IntoIterator<Item = u16>) -> Self {
        TerminationPolicy::List(codes.into_iter().map(StatusMatcher::Code).collect())
    }

    pub fn ranges(ranges: impl IntoIterator<Item = (u16, u16)>) -> Self {
        TerminationPolicy::List(
            ranges
                .into_iter()
                .map(|(lo, hi)| StatusMatcher::Range(lo, hi))
                .collect(),
        )
    }

    /// Evaluate the policy against a response. Returns `Some(error)` when the crawl must abort.
    pub fn evaluate(&self, status: u16, url: &str) -> Option<CrawlerError> {
        match self {
            TerminationPolicy::Never => None,
            TerminationPolicy::List(matchers) => {
                if matchers.iter().any(|m| m.matches(status)) {
                    Some(CrawlerError::Terminated {
                        status,
                        url: url.to_owned(),
                    })
                } else {
                    None
                }
            }
            TerminationPolicy::Callback(callback) => callback(status, url),
        }
    }
}

impl std::fmt::Debug for TerminationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationPolicy::Never => write!(f, "TerminationPolicy::Never"),
            TerminationPolicy::List(matchers) => {
                write!(f, "TerminationPolicy::List({:?})", matchers)
            }
            TerminationPolicy::Callback(_) => write!(f, "TerminationPolicy::Callback(..)"),
        }
    }
}
