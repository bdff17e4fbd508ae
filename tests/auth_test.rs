mod common;

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;
use spotwire::{AuthorizationCallback, Body, Error, Scope};

use common::{FakeTransport, authenticator, form_fields};

#[tokio::test]
async fn test_client_credentials_token_is_used_by_the_client() {
    let transport = FakeTransport::new();
    transport
        .respond(200, json!({"access_token": "X"}))
        .respond(200, json!({"markets": ["SE", "US"]}));

    let client = authenticator(&transport).client_credentials().await.unwrap();
    let markets = client.get_available_markets().await.unwrap();
    assert_eq!(markets.markets, vec!["SE", "US"]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);

    // Token request: Basic client authentication and a form body
    let token_request = &requests[0];
    assert_eq!(token_request.method, reqwest::Method::POST);
    assert_eq!(
        token_request.url.as_str(),
        "https://accounts.spotify.com/api/token"
    );
    let basic = format!("Basic {}", STANDARD.encode("client-id:client-secret"));
    assert_eq!(
        token_request.header_value("authorization"),
        Some(basic.as_str())
    );
    assert_eq!(
        token_request.header_value("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(token_request.body.as_deref(), Some("grant_type=client_credentials"));

    // Catalog request: bearer token
    assert_eq!(requests[1].header_value("authorization"), Some("Bearer X"));
    assert_eq!(requests[1].url.as_str(), "https://api.spotify.com/v1/markets");
}

#[tokio::test]
async fn test_token_grant_fields_are_decoded() {
    let transport = FakeTransport::new();
    transport.respond(
        200,
        json!({
            "access_token": "BQD",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "user-library-modify"
        }),
    );

    let grant = authenticator(&transport)
        .request_token(&spotwire::Grant::ClientCredentials)
        .await
        .unwrap();
    assert_eq!(grant.access_token, "BQD");
    assert_eq!(grant.expires_in, 3600);
    assert_eq!(grant.scope.as_deref(), Some("user-library-modify"));
    assert!(grant.refresh_token.is_none());
    assert!(grant.obtained_at > 0);
}

#[tokio::test]
async fn test_rejected_token_request_is_an_authentication_error() {
    let transport = FakeTransport::new();
    transport.respond(400, json!({"error": "invalid_client"}));

    let err = authenticator(&transport).client_credentials().await.unwrap_err();
    match err {
        Error::Authentication { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, Body::Json(json!({"error": "invalid_client"})));
        }
        other => panic!("expected authentication error, got {other}"),
    }
}

#[tokio::test]
async fn test_token_response_without_token_is_an_authentication_error() {
    let transport = FakeTransport::new();
    transport.respond_text(200, "<html>maintenance</html>");

    let err = authenticator(&transport).client_credentials().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { status: 200, .. }));
    assert_eq!(
        err.body(),
        Some(&Body::Text("<html>maintenance</html>".to_string()))
    );
}

#[test]
fn test_authorization_url_carries_scopes_and_fresh_state() {
    let transport = FakeTransport::new();
    let auth = authenticator(&transport);
    let scopes = [Scope::UserLibraryModify, Scope::AppRemoteControl];

    let first = auth
        .authorization_request("http://127.0.0.1:8888/callback", &scopes)
        .unwrap();
    let second = auth
        .authorization_request("http://127.0.0.1:8888/callback", &scopes)
        .unwrap();

    assert_eq!(first.url.path(), "/authorize");
    let params: HashMap<String, String> = first.url.query_pairs().into_owned().collect();
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], "client-id");
    assert_eq!(params["scope"], "user-library-modify app-remote-control");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:8888/callback");
    assert_eq!(params["state"], first.state);

    // A new state for every request
    assert!(!first.state.is_empty());
    assert_ne!(first.state, second.state);

    // Nothing was sent
    assert!(transport.requests().is_empty());
}

#[test]
fn test_authorization_url_omits_empty_scope() {
    let transport = FakeTransport::new();
    let request = authenticator(&transport)
        .authorization_request("http://127.0.0.1:8888/callback", &[])
        .unwrap();

    assert!(request.url.query_pairs().all(|(key, _)| key != "scope"));
}

#[tokio::test]
async fn test_callback_with_wrong_state_is_rejected_before_exchange() {
    let transport = FakeTransport::new();
    let auth = authenticator(&transport);
    let request = auth
        .authorization_request("http://127.0.0.1:8888/callback", &[Scope::UserReadPrivate])
        .unwrap();

    let forged = AuthorizationCallback {
        code: Some("AQD".to_string()),
        state: Some("forged".to_string()),
        error: None,
    };
    let err = auth.finish_authorization(&request, &forged).await.unwrap_err();
    assert!(matches!(err, Error::StateMismatch));

    let stateless = AuthorizationCallback {
        code: Some("AQD".to_string()),
        ..Default::default()
    };
    let err = auth.finish_authorization(&request, &stateless).await.unwrap_err();
    assert!(matches!(err, Error::StateMismatch));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_denied_and_codeless_callbacks_are_rejected() {
    let transport = FakeTransport::new();
    let auth = authenticator(&transport);
    let request = auth
        .authorization_request("http://127.0.0.1:8888/callback", &[])
        .unwrap();

    let denied = AuthorizationCallback {
        error: Some("access_denied".to_string()),
        state: Some(request.state.clone()),
        code: None,
    };
    assert!(matches!(
        auth.finish_authorization(&request, &denied).await,
        Err(Error::AuthorizationDenied(reason)) if reason == "access_denied"
    ));

    let codeless = AuthorizationCallback {
        state: Some(request.state.clone()),
        ..Default::default()
    };
    assert!(matches!(
        auth.finish_authorization(&request, &codeless).await,
        Err(Error::MissingCode)
    ));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_matching_callback_exchanges_the_code() {
    let transport = FakeTransport::new();
    transport
        .respond(
            200,
            json!({
                "access_token": "USER-TOKEN",
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "REFRESH",
                "scope": "user-library-modify app-remote-control"
            }),
        )
        .respond(200, json!({}));

    let auth = authenticator(&transport);
    let request = auth
        .authorization_request(
            "http://127.0.0.1:8888/callback",
            &[Scope::UserLibraryModify, Scope::AppRemoteControl],
        )
        .unwrap();
    let callback = AuthorizationCallback::from_redirect_url(&format!(
        "http://127.0.0.1:8888/callback?code=AQD&state={}",
        request.state
    ))
    .unwrap();

    let client = auth.finish_authorization(&request, &callback).await.unwrap();
    assert_eq!(client.token().as_str(), "USER-TOKEN");

    let exchange = transport.last_request();
    let fields = form_fields(&exchange);
    assert_eq!(
        fields,
        vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), "AQD".to_string()),
            (
                "redirect_uri".to_string(),
                "http://127.0.0.1:8888/callback".to_string()
            ),
        ]
    );

    // The client uses the user token
    client.save_albums(&["4aawyAB9vmqN3uQ7FjRGTy"]).await.unwrap();
    assert_eq!(
        transport.last_request().header_value("authorization"),
        Some("Bearer USER-TOKEN")
    );
}
