//! # gCTS Error Classification
//!
//! The gCTS service does not return structured error codes. Failures come back
//! as JSON bodies with an `exception` string, an `errorLog` list and a `log`
//! list whose entries may nest `protocol` trees. The only way to tell an
//! "already exists" from a "does not exist" is to match the server's message
//! texts, so the patterns live in an [`ErrorClassifier`] that callers can
//! extend when the service words things differently.

use serde_json::Value;
use thiserror::Error;

use crate::connection::HttpRequestError;
use crate::error::Error;

/// Suffix of the first log message when a repository is created twice.
pub const ALREADY_EXISTS_SUFFIX: &str = "Error action CREATE_REPOSITORY Repository already exists";

/// Exception text for unknown repositories.
pub const NO_RELATION_EXCEPTION: &str = "No relation between system and repository";

/// Replacement for [`NO_RELATION_EXCEPTION`], which reads like a setup problem.
pub const NOT_EXISTS_EXCEPTION: &str = "Repository does not exist";

/// A gCTS failure carrying the raw JSON error body
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GctsError {
    #[error("gCTS exception: {}", summary(messages))]
    Request { messages: Value },

    #[error("gCTS exception: {}", summary(messages))]
    AlreadyExists { messages: Value },

    #[error("gCTS exception: {}", summary(messages))]
    NotExists { messages: Value },
}

impl GctsError {
    /// Builds a `NotExists` error, replacing the ambiguous server exception.
    pub fn not_exists(mut messages: Value) -> Self {
        if let Some(obj) = messages.as_object_mut() {
            obj.insert(
                "exception".to_string(),
                Value::String(NOT_EXISTS_EXCEPTION.to_string()),
            );
        }
        GctsError::NotExists { messages }
    }

    pub fn messages(&self) -> &Value {
        match self {
            GctsError::Request { messages }
            | GctsError::AlreadyExists { messages }
            | GctsError::NotExists { messages } => messages,
        }
    }

    pub fn exception(&self) -> Option<&str> {
        self.messages().get("exception").and_then(Value::as_str)
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, GctsError::AlreadyExists { .. })
    }

    pub fn is_not_exists(&self) -> bool {
        matches!(self, GctsError::NotExists { .. })
    }
}

fn first_message(list: Option<&Value>) -> Option<&str> {
    list?.as_array()?.first()?.get("message")?.as_str()
}

fn summary(messages: &Value) -> String {
    messages
        .get("exception")
        .and_then(Value::as_str)
        .or_else(|| first_message(messages.get("errorLog")))
        .or_else(|| first_message(messages.get("log")))
        .map(str::to_string)
        .unwrap_or_else(|| messages.to_string())
}

/// Text patterns that map gCTS error bodies onto [`GctsError`] kinds
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    already_exists_suffixes: Vec<String>,
    not_exists_exceptions: Vec<String>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self {
            already_exists_suffixes: vec![ALREADY_EXISTS_SUFFIX.to_string()],
            not_exists_exceptions: vec![NO_RELATION_EXCEPTION.to_string()],
        }
    }
}

impl ErrorClassifier {
    /// A classifier that only produces generic `Request` errors.
    pub fn empty() -> Self {
        Self {
            already_exists_suffixes: Vec::new(),
            not_exists_exceptions: Vec::new(),
        }
    }

    /// Also treat a first log message ending with `suffix` as "already exists".
    pub fn with_already_exists_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.already_exists_suffixes.push(suffix.into());
        self
    }

    /// Also treat an `exception` equal to `text` as "does not exist".
    pub fn with_not_exists_exception(mut self, text: impl Into<String>) -> Self {
        self.not_exists_exceptions.push(text.into());
        self
    }

    /// Classifies the messages of a JSON error body.
    pub fn classify_messages(&self, messages: Value) -> GctsError {
        let already_exists = first_message(messages.get("log")).is_some_and(|message| {
            self.already_exists_suffixes
                .iter()
                .any(|suffix| message.ends_with(suffix.as_str()))
        });
        if already_exists {
            return GctsError::AlreadyExists { messages };
        }

        let not_exists = messages
            .get("exception")
            .and_then(Value::as_str)
            .is_some_and(|exception| self.not_exists_exceptions.iter().any(|e| e == exception));
        if not_exists {
            return GctsError::not_exists(messages);
        }

        GctsError::Request { messages }
    }

    /// Converts an HTTP error into a gCTS error when its body is JSON.
    ///
    /// Anything else is returned untouched.
    pub fn classify(&self, err: HttpRequestError) -> Error {
        if !err.response.is_json() {
            return Error::Http(err);
        }

        match err.response.json::<Value>() {
            Ok(messages) => self.classify_messages(messages).into(),
            Err(_) => Error::Http(err),
        }
    }

    /// Applies [`ErrorClassifier::classify`] to HTTP errors only.
    pub fn translate(&self, err: Error) -> Error {
        match err {
            Error::Http(http) => self.classify(http),
            other => other,
        }
    }
}

/// Classifies with the default patterns.
pub fn exception_from_http_error(err: HttpRequestError) -> Error {
    ErrorClassifier::default().classify(err)
}
