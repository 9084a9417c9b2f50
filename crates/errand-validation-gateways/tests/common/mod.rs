// crates/errand-validation-gateways/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Scripted local HTTP servers for gateway tests.
// Purpose: Serve canned responses and capture the requests gateways send.
// Dependencies: tiny_http
// ============================================================================

//! ## Overview
//! A [`ScriptedServer`] answers a fixed sequence of requests with canned
//! status codes and bodies, recording each request for assertions.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use errand_validation_gateways::HttpGatewayConfig;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Scripted Server
// ============================================================================

/// Request captured by a scripted server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// HTTP method.
    pub method: String,
    /// Request target including the query string.
    pub url: String,
    /// Request body.
    pub body: String,
    /// Authorization header, when present.
    pub authorization: Option<String>,
}

/// Canned response.
#[derive(Debug, Clone)]
pub struct Canned {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl Canned {
    /// Creates a JSON response.
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// Local server answering a fixed sequence of requests.
pub struct ScriptedServer {
    /// Base URL of the server.
    pub base_url: String,
    /// Requests captured so far.
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    /// Serving thread.
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    /// Starts a server answering one request per canned response.
    pub fn start(responses: Vec<Canned>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let handle = thread::spawn(move || {
            for canned in responses {
                let Ok(mut request) = server.recv() else {
                    return;
                };
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_string());
                sink.lock().unwrap().push(CapturedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body,
                    authorization,
                });
                let content_type =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(canned.body)
                    .with_status_code(canned.status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            captured,
            handle,
        }
    }

    /// Returns a gateway configuration pointing at the server.
    pub fn config(&self) -> HttpGatewayConfig {
        HttpGatewayConfig {
            allow_http: true,
            ..HttpGatewayConfig::new(self.base_url.clone())
        }
    }

    /// Waits for the scripted responses to be served and returns the requests.
    pub fn finish(self) -> Vec<CapturedRequest> {
        self.handle.join().unwrap();
        self.captured.lock().unwrap().clone()
    }
}
