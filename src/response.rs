use std::collections::HashMap;

use serde_json::{Map, Value};

/// The result of a single GET performed by a [`Session`](crate::session::Session).
#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub text: Option<String>,
    pub json: Option<serde_json::Value>,
    pub headers: HashMap<String, String>,
}

impl Response {
    /// True when the status code falls in `[200, 300)`.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The identity record: this response's own fields as a JSON object, unchanged.
    ///
    /// This is what the orchestrator stores when no `response_processor` is supplied, so a
    /// default crawl's record always carries `url` (recoverable on index rebuild) alongside
    /// `status`, `text`, `json`, `headers`, and `ok`.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("url".to_owned(), Value::String(self.url.clone()));
        object.insert("status".to_owned(), Value::from(self.status));
        object.insert(
            "text".to_owned(),
            self.text.clone().map(Value::String).unwrap_or(Value::Null),
        );
        object.insert("json".to_owned(), self.json.clone().unwrap_or(Value::Null));
        object.insert(
            "headers".to_owned(),
            Value::Object(
                self.headers
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        );
        object.insert("ok".to_owned(), Value::Bool(self.ok()));
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_value_carries_url_and_status() {
        let response = Response {
            url: "http://a".to_owned(),
            status: 200,
            text: Some("hi".to_owned()),
            json: None,
            headers: HashMap::new(),
        };

        let value = response.to_value();
        assert_eq!(value["url"], Value::String("http://a".to_owned()));
        assert_eq!(value["status"], Value::from(200));
        assert_eq!(value["text"], Value::String("hi".to_owned()));
        assert_eq!(value["json"], Value::Null);
        assert_eq!(value["ok"], Value::Bool(true));
    }
}
