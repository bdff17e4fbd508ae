#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde_json::Value;
use spotwire::{
    ApiClient, Authenticator, Body, HttpRequest, RequestResponse, Transport,
    config::{ClientConfig, Credentials},
    error::{Error, Result},
};

/// Transport answering from a queue of canned responses and recording every
/// request it was given.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<RequestResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.respond_with(RequestResponse::new(status, Body::Json(body)))
    }

    pub fn respond_text(&self, status: u16, body: &str) -> &Self {
        self.respond_with(RequestResponse::new(status, Body::Text(body.to_string())))
    }

    pub fn respond_with(&self, response: RequestResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("no request was performed")
    }
}

impl Transport for FakeTransport {
    async fn perform(&self, request: HttpRequest) -> Result<RequestResponse> {
        let url = request.url.to_string();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::transport(url, "no canned response left"))
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("client-id", "client-secret")
}

pub fn authenticator(transport: &FakeTransport) -> Authenticator<FakeTransport> {
    Authenticator::with_transport(credentials(), ClientConfig::default(), transport.clone())
}

pub fn client(transport: &FakeTransport) -> ApiClient<FakeTransport> {
    ApiClient::with_transport("X", ClientConfig::default(), transport.clone())
}

/// Decoded query pairs of a request URL.
pub fn query_pairs(request: &HttpRequest) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Decoded form fields of a request body.
pub fn form_fields(request: &HttpRequest) -> Vec<(String, String)> {
    serde_urlencoded::from_str(request.body.as_deref().unwrap_or_default()).unwrap()
}
