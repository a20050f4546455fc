// socialauth-test-utils — transport doubles shared across the workspace's
// test suites.
//
// `ScriptedTransport` answers requests from a URL-keyed script, records
// everything it sees, and is the workhorse for flow tests.
// `RefusingTransport` fails the test the moment anything touches the
// network — used to prove a short-circuit path never does.
// `FailingTransport` surfaces a fixed transport error, e.g. cancellation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use socialauth_core::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Answers requests by exact URL, falling back to the URL with its query
/// string stripped. Unmatched requests answer 404 so a missing script
/// entry shows up as a test failure rather than a hang.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a URL (with or without query string).
    pub fn respond(self, url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.into(), HttpResponse::new(status, body));
        self
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The number of requests executed so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(&request.url) {
            return Ok(response.clone());
        }

        let without_query = request.url.split('?').next().unwrap_or_default();
        if let Some(response) = responses.get(without_query) {
            return Ok(response.clone());
        }

        Ok(HttpResponse::new(
            404,
            format!("no scripted response for {}", request.url),
        ))
    }
}

/// Panics on any request; proves a code path never reaches the network.
#[derive(Debug, Default)]
pub struct RefusingTransport;

#[async_trait]
impl HttpTransport for RefusingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        panic!(
            "the transport must not be invoked on this path, but got {} {}",
            request.method.as_str(),
            request.url
        );
    }
}

/// Always answers with the configured transport error.
#[derive(Debug)]
pub struct FailingTransport(pub TransportError);

impl FailingTransport {
    pub fn cancelled() -> Self {
        Self(TransportError::Cancelled)
    }
}

#[async_trait]
impl HttpTransport for FailingTransport {
    async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(self.0.clone())
    }
}
