use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        HttpRequest {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        HttpRequest::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        HttpRequest::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        HttpRequest::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        HttpRequest::new(Method::Delete, url)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Attaches `Authorization: Bearer <token>` when a token is held.
    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.with_header("Authorization", &format!("Bearer {}", token)),
            None => self,
        }
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self.with_header("Content-Type", "application/json"))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// The `error` field of a JSON object body, stringified if it is not a string.
    pub fn error_message(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        error_field(&value)
    }

    /// Turns a non-2xx status into [`ClientError::Status`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Status {
                status: self.status,
                message: self.error_message(),
            })
        }
    }
}

pub(crate) fn error_field(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Appends `params` as an `application/x-www-form-urlencoded` query string.
pub fn url_with_query(url: &str, params: &[(&str, &str)]) -> Result<String> {
    let query = serde_urlencoded::to_string(params)?;
    Ok(format!("{}?{}", url, query))
}

/// One HTTP round trip. Implementations only fail when no response arrived;
/// status handling is left to the caller.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Sends `request` and rejects non-2xx answers.
pub async fn send_checked<T: Transport + ?Sized>(
    transport: &T,
    request: HttpRequest,
) -> Result<HttpResponse> {
    debug!("{} {}", request.method.as_str(), request.url);
    let response = transport.send(request).await?;
    debug!("-> {}", response.status);
    response.error_for_status()
}
