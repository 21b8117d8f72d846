use std::sync::Arc;

use serde_json::Value;

use crate::hooks::ResponseHook;
use crate::response::Response;
use crate::session::Session;

/// Extracts the substring between the first `<body...>` opening tag and its matching `</body>`.
///
/// Responses whose text does not contain a body tag (including non-HTML responses) pass through
/// unchanged as the full response text.
pub fn extract_body(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();

    let open_start = match lower.find("<body") {
        Some(pos) => pos,
        None => return text,
    };

    let open_end = match lower[open_start..].find('>') {
        Some(pos) => open_start + pos + 1,
        None => return text,
    };

    match lower[open_end..].find("</body>") {
        Some(pos) => &text[open_end..open_end + pos],
        None => &text[open_end..],
    }
}

/// A stock [`ResponseHook`](crate::hooks::ResponseHook) that stores the extracted HTML body as
/// the content record.
pub fn html_body_processor() -> ResponseHook {
    Arc::new(move |response: Response, _session: Arc<dyn Session>| {
        Box::pin(async move {
            let body = response
                .text
                .as_deref()
                .map(extract_body)
                .map(str::to_owned)
                .unwrap_or_default();

            Ok(Some(Value::String(body)))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_between_body_tags() {
        let html = "<html><head></head><body class=\"x\">hello</body></html>";
        assert_eq!(extract_body(html), "hello");
    }

    #[test]
    fn passes_through_without_body_tag() {
        let text = "{\"ok\":true}";
        assert_eq!(extract_body(text), text);
    }

    #[test]
    fn handles_unterminated_body() {
        let html = "<body>trailing";
        assert_eq!(extract_body(html), "trailing");
    }
}
