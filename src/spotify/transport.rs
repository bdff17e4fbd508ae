use std::{collections::BTreeMap, fmt, future::Future};

use reqwest::{Client, Method, Url, header::HeaderMap};
use serde_json::Value;

use crate::error::{Error, Result};

/// A single outgoing request, fully built by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// First value of a request header, matched case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response body: parsed JSON when the payload was valid JSON, otherwise the
/// original text untouched.
///
/// Payloads are decoded as UTF-8 first; invalid sequences become U+FFFD.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(raw),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Json(value) => write!(f, "{}", value),
            Body::Text(text) => f.write_str(text),
        }
    }
}

/// A response header that may have been sent more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderField {
    One(String),
    Many(Vec<String>),
}

impl HeaderField {
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderField::One(value) => Some(value),
            HeaderField::Many(values) => values.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestResponse {
    pub status: u16,
    /// Header names are lowercase.
    pub headers: BTreeMap<String, HeaderField>,
    pub body: Body,
}

impl RequestResponse {
    pub fn new(status: u16, body: Body) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(HeaderField::first)
    }
}

/// Performs exactly one HTTP round-trip.
///
/// Implementations resolve with whatever status, headers and body the server
/// returned, including 4xx and 5xx answers, and only fail when the exchange
/// itself breaks down. They do not retry and do not enforce timeouts.
pub trait Transport: Send + Sync {
    fn perform(&self, request: HttpRequest) -> impl Future<Output = Result<RequestResponse>> + Send;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// A transport that refuses anything but HTTPS URLs.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .https_only(true)
            .build()
            .map_err(|e| Error::transport("<client>", e))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn perform(&self, request: HttpRequest) -> Result<RequestResponse> {
        let url = request.url.to_string();
        let method = request.method.clone();

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let mut response = builder
            .send()
            .await
            .map_err(|e| Error::transport(url.as_str(), e))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let mut raw = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::transport(url.as_str(), e))?
        {
            raw.extend_from_slice(&chunk);
        }

        log::debug!("{} {} -> {} ({} bytes)", method, url, status, raw.len());

        Ok(RequestResponse {
            status,
            headers,
            body: Body::parse(String::from_utf8_lossy(&raw).into_owned()),
        })
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, HeaderField> {
    let mut collected = BTreeMap::new();
    for name in headers.keys() {
        let mut values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();

        let field = if values.len() == 1 {
            HeaderField::One(values.remove(0))
        } else {
            HeaderField::Many(values)
        };
        collected.insert(name.as_str().to_string(), field);
    }
    collected
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderValue, SET_COOKIE};
    use serde_json::json;

    use super::*;

    #[test]
    fn valid_json_is_parsed() {
        let body = Body::parse(r#"{"access_token":"X","expires_in":3600}"#.to_string());
        assert_eq!(body, Body::Json(json!({"access_token": "X", "expires_in": 3600})));
    }

    #[test]
    fn invalid_json_keeps_original_text() {
        let raw = "<html>Bad Gateway</html>\n".to_string();
        assert_eq!(Body::parse(raw.clone()), Body::Text(raw));
    }

    #[test]
    fn empty_body_is_text() {
        assert_eq!(Body::parse(String::new()), Body::Text(String::new()));
    }

    #[test]
    fn repeated_headers_are_grouped() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let collected = collect_headers(&headers);
        assert_eq!(
            collected.get("set-cookie"),
            Some(&HeaderField::Many(vec!["a=1".to_string(), "b=2".to_string()]))
        );
        assert_eq!(
            collected.get("content-type"),
            Some(&HeaderField::One("application/json".to_string()))
        );
    }

    #[test]
    fn request_header_lookup_ignores_case() {
        let request = HttpRequest::new(Method::GET, Url::parse("https://api.spotify.com/v1/me").unwrap())
            .header("Authorization", "Bearer X");
        assert_eq!(request.header_value("authorization"), Some("Bearer X"));
    }
}
