//! # HTTP Connection
//!
//! The gCTS layer never talks to the network directly. It goes through the
//! [`Connection`] trait, which has a single required method, [`Connection::send`],
//! and derives the verbs the repository proxy needs (`execute`, `get_json`,
//! `post_obj_as_json`) from it. Any response with a non-success status is
//! turned into an [`HttpRequestError`] that still carries the response, so the
//! caller can inspect its headers and body.
//!
//! [`HttpConnection`] is the production implementation built on
//! `reqwest::blocking`. Tests substitute a recording mock.

use std::cell::RefCell;
use std::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// HTTP verbs used against the gCTS service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the service root
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub accept: Option<String>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            accept: None,
            body: None,
        }
    }

    pub fn with_params(mut self, params: &[(&str, &str)]) -> Self {
        self.params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_accept(mut self, accept: Option<&str>) -> Self {
        self.accept = accept.map(str::to_string);
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully read HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A response with a JSON body and the matching content type.
    pub fn json_body(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string()).with_header("Content-Type", "application/json")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> &str {
        self.header("Content-Type").unwrap_or_default()
    }

    pub fn is_json(&self) -> bool {
        self.content_type().contains("application/json")
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// The server answered a request with a non-success status.
#[derive(Error, Debug)]
#[error("{method} {path} failed with HTTP {}\n{}", response.status(), response.text())]
pub struct HttpRequestError {
    pub method: Method,
    pub path: String,
    pub response: HttpResponse,
}

/// Transport used by the gCTS layer.
pub trait Connection {
    /// Sends the request and returns the response whatever its status.
    ///
    /// Only failures that produce no response at all are errors here.
    fn send(&self, request: &Request) -> Result<HttpResponse>;

    /// Sends the request and fails with [`HttpRequestError`] on a non-success
    /// status.
    fn send_checked(&self, request: Request) -> Result<HttpResponse> {
        let response = self.send(&request)?;
        if response.is_success() {
            return Ok(response);
        }

        Err(HttpRequestError {
            method: request.method,
            path: request.path,
            response,
        }
        .into())
    }

    fn execute(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<HttpResponse> {
        self.send_checked(Request::new(method, path).with_params(params))
    }

    /// GET with `Accept: application/json`, returning only the parsed body.
    fn get_json(&self, path: &str) -> Result<Value> {
        self.send_checked(Request::new(Method::Get, path).with_accept(Some("application/json")))?
            .json()
    }

    fn post_obj_as_json(&self, path: &str, body: Value, accept: Option<&str>) -> Result<HttpResponse> {
        self.send_checked(
            Request::new(Method::Post, path)
                .with_accept(accept)
                .with_json(body),
        )
    }
}

const CSRF_HEADER: &str = "x-csrf-token";

/// Blocking HTTP connection to the gCTS ICF service
pub struct HttpConnection {
    client: reqwest::blocking::Client,
    base_url: Url,
    sap_client: Option<String>,
    user: String,
    password: Option<String>,
    csrf_token: RefCell<Option<String>>,
}

impl HttpConnection {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Cannot create the HTTP client: {}", e),
                hint: None,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            sap_client: config.client.clone(),
            user: config.user.clone().unwrap_or_default(),
            password: config.password.clone(),
            csrf_token: RefCell::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(client) = &self.sap_client {
                query.append_pair("sap-client", client);
            }
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn network_error(url: &Url, err: reqwest::Error) -> Error {
        Error::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    /// Modifying requests need the session's CSRF token, fetched once.
    fn csrf_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.csrf_token.borrow().as_ref() {
            return Ok(Some(token.clone()));
        }

        let url = self.url_for("", &[])?;
        debug!("Fetching CSRF token from {}", url);
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.user, self.password.as_ref())
            .header(CSRF_HEADER, "Fetch")
            .send()
            .map_err(|e| Self::network_error(&url, e))?;

        let token = response
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        self.csrf_token.replace(token.clone());
        Ok(token)
    }
}

impl Connection for HttpConnection {
    fn send(&self, request: &Request) -> Result<HttpResponse> {
        let url = self.url_for(&request.path, &request.params)?;
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.into(), url.clone())
            .basic_auth(&self.user, self.password.as_ref());

        if request.method != Method::Get {
            if let Some(token) = self.csrf_token()? {
                builder = builder.header(CSRF_HEADER, token);
            }
        }

        if let Some(accept) = &request.accept {
            builder = builder.header(reqwest::header::ACCEPT, accept);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| Self::network_error(&url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().map_err(|e| Self::network_error(&url, e))?;

        debug!("{} {} -> HTTP {}", request.method, url, status);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
