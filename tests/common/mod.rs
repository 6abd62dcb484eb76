//! Shared test utilities for integration and E2E tests.
//!
//! [`TestServer`] is a scripted HTTP server standing in for the gCTS ICF
//! service. It answers the CSRF token handshake, replays responses per
//! method and path, and records every request it receives.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let server = TestServer::start();
//! server.json("GET", "repository", 200, json!({"result": []}));
//! server.sapcli().args(["gcts", "repolist"]).assert().success();
//! ```

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use predicates::prelude::*;
    pub use serde_json::json;

    pub use super::{unused_port, TestServer};
}

pub const ICF_PATH: &str = "/sap/bc/cts_abapvcs/";
pub const CSRF_TOKEN: &str = "test-csrf-token";

/// A request as the server saw it; `path` is relative to the ICF service.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

struct Route {
    method: String,
    path: String,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    requests: Vec<Recorded>,
}

/// Scripted HTTP server on a random local port
pub struct TestServer {
    port: u16,
    state: Arc<Mutex<State>>,
}

impl TestServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));

        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => handle(stream, &shared),
                    Err(_) => break,
                }
            }
        });

        Self { port, state }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Adds a JSON reply; several replies for one route are served in order
    /// and the last one repeats.
    pub fn json(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.reply(method, path, status, "application/json", body.to_string())
    }

    pub fn text(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.reply(method, path, status, "text/plain", body.to_string())
    }

    fn reply(&self, method: &str, path: &str, status: u16, content_type: &'static str, body: String) -> &Self {
        let reply = Reply {
            status,
            content_type,
            body,
        };
        let mut state = self.state.lock().unwrap();
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) => route.replies.push_back(reply),
            None => state.routes.push(Route {
                method: method.to_string(),
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// Requests to gCTS routes, without the CSRF handshake.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| !r.path.is_empty())
            .cloned()
            .collect()
    }

    /// The `sapcli` binary pointed at this server over plain HTTP.
    pub fn sapcli(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sapcli");
        for var in [
            "SAP_ASHOST",
            "SAP_PORT",
            "SAP_CLIENT",
            "SAP_USER",
            "SAP_PASSWORD",
            "SAP_SSL",
            "SAP_SSL_VERIFY",
            "SAPCLI_HTTP_TIMEOUT",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1")
            .env("SAPCLI_HTTP_TIMEOUT", "10")
            .args(["--ashost", "127.0.0.1", "--ssl", "no"])
            .args(["--port", &self.port.to_string()])
            .args(["--client", "001", "--user", "DEVELOPER", "--password", "secret"]);
        cmd
    }
}

/// A local port nothing listens on.
pub fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn handle(stream: TcpStream, state: &Mutex<State>) {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    let (path, query) = target.split_once('?').unwrap_or((target.as_str(), ""));
    let recorded = Recorded {
        method,
        path: path.strip_prefix(ICF_PATH).unwrap_or(path).to_string(),
        query: query.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    };

    let (reply, extra_headers) = respond(&recorded, state);
    state.lock().unwrap().requests.push(recorded);

    let mut stream = reader.into_inner();
    let _ = write!(
        stream,
        "HTTP/1.1 {} Test\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
        reply.status,
        reply.content_type,
        reply.body.len(),
        extra_headers,
        reply.body
    );
    let _ = stream.flush();
}

fn respond(request: &Recorded, state: &Mutex<State>) -> (Reply, String) {
    if request.path.is_empty() {
        let reply = Reply {
            status: 200,
            content_type: "text/plain",
            body: String::new(),
        };
        return (reply, format!("x-csrf-token: {}\r\n", CSRF_TOKEN));
    }

    let mut state = state.lock().unwrap();
    let route = state
        .routes
        .iter_mut()
        .find(|r| r.method == request.method && r.path == request.path);

    let reply = match route {
        Some(route) if route.replies.len() > 1 => route.replies.pop_front(),
        Some(route) => route.replies.front().cloned(),
        None => None,
    };

    let reply = reply.unwrap_or_else(|| Reply {
        status: 404,
        content_type: "text/plain",
        body: format!("no route for {} {}", request.method, request.path),
    });
    (reply, String::new())
}
