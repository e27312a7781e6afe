// src/api/encode.rs

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::dsv::Value;

/// Characters `encodeURIComponent` leaves alone, besides alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// What a write sends.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteContent {
    /// Take the body from the endpoint's query string (form style only).
    FromQuery,
    /// Sent as is.
    Text(String),
    /// `key=value` pairs joined by `&`; `None` is a null value.
    Fields(Vec<(String, Option<Value>)>),
}

impl Default for WriteContent {
    fn default() -> Self {
        WriteContent::Text(String::new())
    }
}

/// How a write's body is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Declares `application/x-www-form-urlencoded`; null fields encode as
    /// the literal `null`.
    #[default]
    Form,
    /// No content type; null fields encode as the empty string.
    JsonIntent,
}

impl Encoding {
    pub fn content_type(self) -> Option<&'static str> {
        match self {
            Encoding::Form => Some("application/x-www-form-urlencoded"),
            Encoding::JsonIntent => None,
        }
    }

    fn null_text(self) -> &'static str {
        match self {
            Encoding::Form => "null",
            Encoding::JsonIntent => "",
        }
    }
}

/// A fully prepared POST: target endpoint (query possibly stripped) and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedWrite {
    pub endpoint: String,
    pub body: String,
    pub content_type: Option<&'static str>,
}

pub fn encode_fields(fields: &[(String, Option<Value>)], encoding: Encoding) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Some(v) => v.to_string(),
                None => encoding.null_text().to_string(),
            };
            format!("{}={}", key, encode_component(&text))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Work out the URL and body a write will use.
pub fn prepare_write(endpoint: &str, content: WriteContent, encoding: Encoding) -> PreparedWrite {
    let content_type = encoding.content_type();

    let (endpoint, body) = match (content, encoding) {
        (WriteContent::FromQuery, Encoding::Form) => match endpoint.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (endpoint.to_string(), String::new()),
        },
        (WriteContent::FromQuery, Encoding::JsonIntent) => (endpoint.to_string(), String::new()),
        (WriteContent::Text(text), _) => (endpoint.to_string(), text),
        (WriteContent::Fields(fields), enc) => (endpoint.to_string(), encode_fields(&fields, enc)),
    };

    PreparedWrite {
        endpoint,
        body,
        content_type,
    }
}
