//! Rendering of gCTS error bodies.
//!
//! Error bodies carry an `errorLog` list, a `log` list and an `exception`
//! string. Log entries are either plain strings or objects with a `message`
//! and an optional `protocol`, which is itself an entry or a list of entries.
//! Parsing into [`MessageNode`] trees is tolerant: shapes it does not know
//! contribute nothing instead of failing.

use std::fmt;

use serde_json::Value;

/// One log entry and its nested protocol entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageNode {
    pub message: Option<String>,
    pub children: Vec<MessageNode>,
}

impl MessageNode {
    pub fn leaf(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            children: Vec::new(),
        }
    }

    pub fn parse(value: &Value) -> Self {
        match value {
            Value::String(message) => Self::leaf(message.as_str()),
            Value::Object(obj) => {
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string);

                let children = match obj.get("protocol") {
                    Some(Value::Array(items)) => items.iter().map(Self::parse).collect(),
                    Some(protocol @ (Value::Object(_) | Value::String(_))) => {
                        vec![Self::parse(protocol)]
                    }
                    _ => Vec::new(),
                };

                Self { message, children }
            }
            Value::Array(items) => Self {
                message: None,
                children: items.iter().map(Self::parse).collect(),
            },
            _ => Self::default(),
        }
    }

    fn render(&self, prefix: &str, out: &mut Vec<String>) {
        let mut prefix = prefix.to_string();

        if let Some(message) = &self.message {
            out.push(format!("{} {}", prefix, message));
            prefix.push_str("  ");
        }

        for child in &self.children {
            child.render(&prefix, out);
        }
    }
}

fn parse_list(value: Option<&Value>) -> Vec<MessageNode> {
    match value {
        Some(Value::Array(items)) => items.iter().map(MessageNode::parse).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![MessageNode::parse(other)],
    }
}

/// The printable form of a gCTS error body
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDump {
    pub error_log: Vec<MessageNode>,
    pub log: Vec<MessageNode>,
    pub exception: Option<String>,
    raw: Value,
}

impl MessageDump {
    pub fn from_messages(messages: &Value) -> Self {
        let exception = match messages.get("exception") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Null) | Some(Value::String(_)) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Self {
            error_log: parse_list(messages.get("errorLog")),
            log: parse_list(messages.get("log")),
            exception,
            raw: messages.clone(),
        }
    }

    /// Output lines; the raw body when there are no known sections.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();

        if !self.error_log.is_empty() {
            out.push("Error Log:".to_string());
            for node in &self.error_log {
                node.render(" ", &mut out);
            }
        }

        if !self.log.is_empty() {
            out.push("Log:".to_string());
            for node in &self.log {
                node.render(" ", &mut out);
            }
        }

        if let Some(exception) = &self.exception {
            out.push("Exception:".to_string());
            out.push(format!("  {}", exception));
        }

        if out.is_empty() {
            out.push(self.raw.to_string());
        }

        out
    }
}

impl fmt::Display for MessageDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}
