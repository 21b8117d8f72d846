use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::response::Response;
use crate::session::Session;

/// Observes an outgoing request before it is issued. Synchronous: no hook in practice needs to
/// suspend here, and keeping it synchronous keeps request-order guarantees trivial to reason
/// about.
pub type RequestHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Processes a response once received, optionally issuing follow-up requests over the shared
/// session. Returning `Ok(None)` suppresses the store append for that URL.
pub type ResponseHook =
    Arc<dyn Fn(Response, Arc<dyn Session>) -> BoxFuture<'static, Result<Option<Value>>> + Send + Sync>;

/// Derives extra fields to merge into a record's index entry.
pub type IndexRecordSetter = Arc<dyn Fn(&Value) -> Map<String, Value> + Send + Sync>;

pub fn noop_request_hook() -> RequestHook {
    Arc::new(|_url: &str| {})
}
