//! Local axum server standing in for the job source.

use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Canned response for one path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// One route per path; axum answers 404 for anything else.
#[derive(Default)]
pub struct StubServerBuilder {
    routes: Vec<(String, StubResponse)>,
}

impl StubServerBuilder {
    pub fn route(mut self, path: &str, response: StubResponse) -> Self {
        self.routes.push((path.to_string(), response));
        self
    }

    pub async fn start(self) -> StubServer {
        let requests = RequestLog::default();

        let mut app = Router::new();
        for (path, response) in self.routes {
            app = app.route(&path, get(move || reply(response.clone())));
        }
        let app = app.layer(middleware::from_fn_with_state(requests.clone(), record));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubServer { addr, requests }
    }
}

async fn reply(response: StubResponse) -> Response {
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }
    (
        response.status,
        [(CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    log.lock().unwrap().push(RecordedRequest {
        path: request.uri().path().to_string(),
        headers: request.headers().clone(),
    });
    next.run(request).await
}

/// Running stub server.
pub struct StubServer {
    addr: SocketAddr,
    requests: RequestLog,
}

impl StubServer {
    pub fn builder() -> StubServerBuilder {
        StubServerBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Request paths received, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.path).collect()
    }
}
