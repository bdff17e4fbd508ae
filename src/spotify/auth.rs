use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ClientConfig, Credentials},
    error::{Error, Result},
    spotify::{
        client::ApiClient,
        scopes::Scope,
        transport::{Body, HttpRequest, HttpTransport, Transport},
    },
    utils,
};

/// Body of a token request, form encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum Grant {
    ClientCredentials,
    AuthorizationCode { code: String, redirect_uri: String },
}

/// Successful answer of the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds, as reported by the accounts service.
    #[serde(default)]
    pub expires_in: u64,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
    /// UNIX timestamp of the exchange, set locally.
    #[serde(default)]
    pub obtained_at: i64,
}

impl TokenGrant {
    pub fn expires_at(&self) -> i64 {
        self.obtained_at + self.expires_in as i64
    }
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("obtained_at", &self.obtained_at)
            .finish_non_exhaustive()
    }
}

/// A pending authorization-code request.
///
/// Keep it until the redirect arrives; its `state` is what the callback is
/// verified against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: Url,
    pub state: String,
    pub redirect_uri: String,
}

/// Query parameters the accounts service appends to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorizationCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl AuthorizationCallback {
    /// Parses the callback out of a full redirect URL, e.g. one pasted by
    /// the user.
    pub fn from_redirect_url(redirect: &str) -> Result<Self> {
        let url = Url::parse(redirect).map_err(|e| Error::InvalidUrl(format!("{redirect}: {e}")))?;
        serde_urlencoded::from_str(url.query().unwrap_or_default())
            .map_err(|e| Error::InvalidUrl(format!("{redirect}: {e}")))
    }
}

/// Exchanges application credentials for access tokens.
///
/// Both supported flows end in an [`ApiClient`] that owns the obtained
/// token. Nothing is cached between exchanges.
#[derive(Debug, Clone)]
pub struct Authenticator<T: Transport = HttpTransport> {
    credentials: Credentials,
    config: ClientConfig,
    transport: T,
}

impl Authenticator<HttpTransport> {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(
            credentials,
            ClientConfig::default(),
            HttpTransport::new()?,
        ))
    }
}

impl<T: Transport + Clone> Authenticator<T> {
    pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        Self {
            credentials,
            config,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Client-credentials flow: an app-only token without user context.
    pub async fn client_credentials(&self) -> Result<ApiClient<T>> {
        let grant = self.request_token(&Grant::ClientCredentials).await?;
        Ok(self.client_for(grant))
    }

    /// Builds the URL the user has to visit to grant access.
    ///
    /// Every call draws a fresh `state`. The `scope` parameter is left out
    /// when `scopes` is empty.
    pub fn authorization_request(
        &self,
        redirect_uri: &str,
        scopes: &[Scope],
    ) -> Result<AuthorizationRequest> {
        let state = utils::generate_state();
        let mut url = self.config.authorize_url()?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.credentials.client_id);
            if !scopes.is_empty() {
                query.append_pair("scope", &Scope::join(scopes));
            }
            query
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("state", &state);
        }

        Ok(AuthorizationRequest {
            url,
            state,
            redirect_uri: redirect_uri.to_string(),
        })
    }

    /// Verifies the redirect against `request` and exchanges its code.
    ///
    /// A denied, forged or code-less callback is rejected before anything is
    /// sent to the accounts service.
    pub async fn finish_authorization(
        &self,
        request: &AuthorizationRequest,
        callback: &AuthorizationCallback,
    ) -> Result<ApiClient<T>> {
        if let Some(error) = &callback.error {
            log::warn!("authorization callback reported '{error}'");
            return Err(Error::AuthorizationDenied(error.clone()));
        }
        if callback.state.as_deref() != Some(request.state.as_str()) {
            log::warn!("authorization callback carried an unexpected state");
            return Err(Error::StateMismatch);
        }
        let Some(code) = &callback.code else {
            log::warn!("authorization callback carried no code");
            return Err(Error::MissingCode);
        };

        let grant = self
            .request_token(&Grant::AuthorizationCode {
                code: code.clone(),
                redirect_uri: request.redirect_uri.clone(),
            })
            .await?;
        Ok(self.client_for(grant))
    }

    /// `POST <accounts>/api/token` with Basic client authentication.
    pub async fn request_token(&self, grant: &Grant) -> Result<TokenGrant> {
        let url = self.config.token_url()?;
        let form = serde_urlencoded::to_string(grant)?;
        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));

        let request = HttpRequest::new(Method::POST, url)
            .header("Authorization", format!("Basic {basic}"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form);

        let response = self.transport.perform(request).await?;
        log::debug!("token exchange answered with status {}", response.status);

        let grant = match (response.status, &response.body) {
            (200, Body::Json(value)) => serde_json::from_value::<TokenGrant>(value.clone()).ok(),
            _ => None,
        };

        match grant {
            Some(mut grant) if !grant.access_token.is_empty() => {
                grant.obtained_at = Utc::now().timestamp();
                Ok(grant)
            }
            _ => Err(Error::Authentication {
                status: response.status,
                body: response.body,
            }),
        }
    }

    fn client_for(&self, grant: TokenGrant) -> ApiClient<T> {
        ApiClient::with_transport(
            grant.access_token,
            self.config.clone(),
            self.transport.clone(),
        )
    }
}
