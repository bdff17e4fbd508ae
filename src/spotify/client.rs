use std::fmt;

use reqwest::{Method, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    spotify::transport::{Body, HttpRequest, HttpTransport, Transport},
    types::Page,
};

/// Bearer token presented on every catalog request.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Typed access to the Spotify Web API for one access token.
///
/// Every endpoint method performs exactly one round-trip through the
/// transport. The client never refreshes its token and never retries: an
/// expired token surfaces as [`Error::Query`] with status 401.
///
/// The endpoint methods themselves are generated in
/// [`endpoints`](crate::spotify::endpoints).
#[derive(Debug, Clone)]
pub struct ApiClient<T: Transport = HttpTransport> {
    token: AccessToken,
    config: ClientConfig,
    transport: T,
}

impl ApiClient<HttpTransport> {
    /// Client for the public Spotify hosts over HTTPS.
    pub fn new(token: impl Into<AccessToken>) -> Result<Self> {
        Ok(Self::with_transport(
            token,
            ClientConfig::default(),
            HttpTransport::new()?,
        ))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(token: impl Into<AccessToken>, config: ClientConfig, transport: T) -> Self {
        Self {
            token: token.into(),
            config,
            transport,
        }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the page behind `page.next`, or `None` on the last page.
    pub async fn next_page<I: DeserializeOwned>(&self, page: &Page<I>) -> Result<Option<Page<I>>> {
        self.follow(page.next.as_deref()).await
    }

    /// Fetches the page behind `page.previous`, or `None` on the first page.
    pub async fn previous_page<I: DeserializeOwned>(
        &self,
        page: &Page<I>,
    ) -> Result<Option<Page<I>>> {
        self.follow(page.previous.as_deref()).await
    }

    pub(crate) async fn query<R, O>(
        &self,
        method: Method,
        template: &str,
        args: &[(&str, &str)],
        ids: Option<&[&str]>,
        options: Option<&O>,
    ) -> Result<R>
    where
        R: DeserializeOwned,
        O: Serialize + ?Sized,
    {
        let request = self.build_request(method, template, args, ids, options)?;
        self.fetch(request).await
    }

    pub(crate) async fn command<O>(
        &self,
        method: Method,
        template: &str,
        args: &[(&str, &str)],
        ids: Option<&[&str]>,
        options: Option<&O>,
    ) -> Result<()>
    where
        O: Serialize + ?Sized,
    {
        let request = self.build_request(method, template, args, ids, options)?;
        let method = request.method.clone();
        let endpoint = request.url.path().to_string();

        let response = self.transport.perform(request).await?;
        if !(200..300).contains(&response.status) {
            return Err(Error::Query {
                method,
                endpoint,
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }

    async fn follow<I: DeserializeOwned>(&self, link: Option<&str>) -> Result<Option<Page<I>>> {
        let Some(link) = link else {
            return Ok(None);
        };

        let url = Url::parse(link).map_err(|e| Error::InvalidUrl(format!("{link}: {e}")))?;
        if url.origin() != self.config.api_url.origin() {
            // The bearer token must never leave the configured API host.
            return Err(Error::InvalidUrl(format!(
                "{link}: page link points outside {}",
                self.config.api_url
            )));
        }

        self.fetch(self.authorize(HttpRequest::new(Method::GET, url)))
            .await
            .map(Some)
    }

    async fn fetch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        let method = request.method.clone();
        let endpoint = request.url.path().to_string();

        let response = self.transport.perform(request).await?;
        if response.status != 200 {
            return Err(Error::Query {
                method,
                endpoint,
                status: response.status,
                body: response.body,
            });
        }
        decode(&endpoint, response.body)
    }

    fn build_request<O: Serialize + ?Sized>(
        &self,
        method: Method,
        template: &str,
        args: &[(&str, &str)],
        ids: Option<&[&str]>,
        options: Option<&O>,
    ) -> Result<HttpRequest> {
        let mut url = endpoint_url(&self.config.api_url, template, args)?;
        let query = query_string(ids, options)?;
        url.set_query(query.as_deref());
        log::trace!("{} {}", method, url);

        Ok(self.authorize(HttpRequest::new(method, url)))
    }

    fn authorize(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Authorization", format!("Bearer {}", self.token.as_str()))
            .header("Content-Type", "application/json")
    }
}

/// `<base>/v1/<template>` with every `{name}` segment replaced by its
/// argument, percent-encoded as a single path segment.
fn endpoint_url(base: &Url, template: &str, args: &[(&str, &str)]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{base}: cannot be used as a base url")))?;
        segments.pop_if_empty().push("v1");

        for segment in template.split('/') {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = args
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            Error::InvalidUrl(format!("no value for '{{{name}}}' in {template}"))
                        })?;
                    // `url` drops dot segments, and an empty segment names a different endpoint.
                    if value.is_empty() || value == "." || value == ".." {
                        return Err(Error::InvalidUrl(format!(
                            "'{value}' is not a valid value for '{{{name}}}'"
                        )));
                    }
                    segments.push(value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }
    Ok(url)
}

/// `ids` first when non-empty, then the option fields that are set.
fn query_string<O: Serialize + ?Sized>(
    ids: Option<&[&str]>,
    options: Option<&O>,
) -> Result<Option<String>> {
    let mut parts = Vec::new();
    if let Some(ids) = ids.filter(|ids| !ids.is_empty()) {
        parts.push(serde_urlencoded::to_string([("ids", ids.join(","))])?);
    }
    if let Some(options) = options {
        let encoded = serde_urlencoded::to_string(options)?;
        if !encoded.is_empty() {
            parts.push(encoded);
        }
    }

    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts.join("&")))
    }
}

fn decode<R: DeserializeOwned>(endpoint: &str, body: Body) -> Result<R> {
    let decoded = match body {
        Body::Json(value) => serde_path_to_error::deserialize(value),
        Body::Text(text) => {
            serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(&text))
        }
    };
    decoded.map_err(|source| Error::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
