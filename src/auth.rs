use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::transport::{error_field, HttpRequest, Transport};

#[derive(Clone, Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct LoginReply {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

pub fn login_url(origin: &str) -> String {
    format!("{}/api/v1/login", origin)
}

pub fn register_url(origin: &str) -> String {
    format!("{}/api/v1/register", origin)
}

/// Exchanges credentials for a token. The body decides, not the status: a
/// reply without a token is [`ClientError::Rejected`] carrying the server's
/// `error` text (possibly empty).
pub async fn login<T: Transport + ?Sized>(
    transport: &T,
    origin: &str,
    credentials: &Credentials<'_>,
) -> Result<String> {
    debug!("login request for {}", credentials.username);
    let request = HttpRequest::post(login_url(origin)).json(credentials)?;
    let reply: LoginReply = transport.send(request).await?.json()?;

    match reply.token.filter(|token| !token.is_empty()) {
        Some(token) => Ok(token),
        None => {
            let message = reply.error.as_ref().map(describe).unwrap_or_default();
            warn!("login rejected for {}: {}", credentials.username, message);
            Err(ClientError::Rejected(message))
        }
    }
}

/// Creates an account. Any `error` in the reply body is a rejection.
pub async fn register<T: Transport + ?Sized>(
    transport: &T,
    origin: &str,
    credentials: &Credentials<'_>,
) -> Result<()> {
    debug!("register request for {}", credentials.username);
    let request = HttpRequest::post(register_url(origin)).json(credentials)?;
    let reply: Value = transport.send(request).await?.json()?;

    match error_field(&reply) {
        Some(message) => Err(ClientError::Rejected(message)),
        None => Ok(()),
    }
}

fn describe(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
