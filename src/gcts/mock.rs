//! Recording mock connection for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::connection::{Connection, HttpResponse, Method, Request};
use crate::error::Result;

struct Route {
    method: Method,
    path: String,
    responses: VecDeque<HttpResponse>,
}

/// Answers requests from scripted routes and records every request.
///
/// Each route replays its responses in order and repeats the last one.
/// Requests without a route get a plain-text 404.
#[derive(Default)]
pub struct MockConnection {
    routes: RefCell<Vec<Route>>,
    requests: RefCell<Vec<Request>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: Method, path: &str, response: HttpResponse) -> &Self {
        let mut routes = self.routes.borrow_mut();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) => route.responses.push_back(response),
            None => routes.push(Route {
                method,
                path: path.to_string(),
                responses: VecDeque::from([response]),
            }),
        }
        self
    }

    pub fn on_json(&self, method: Method, path: &str, body: Value) -> &Self {
        self.on(method, path, HttpResponse::json_body(200, &body))
    }

    pub fn on_error(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.on(method, path, HttpResponse::json_body(status, &body))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn total(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Connection for MockConnection {
    fn send(&self, request: &Request) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());

        let mut routes = self.routes.borrow_mut();
        let route = routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == request.path);

        let response = match route {
            Some(route) if route.responses.len() > 1 => route.responses.pop_front(),
            Some(route) => route.responses.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| {
            HttpResponse::new(404, format!("no route for {} {}", request.method, request.path))
                .with_header("Content-Type", "text/plain")
        }))
    }
}
