use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong between a user action and the rendered page.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never completed (connection refused, CORS, DNS...)
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{}", describe_status(.status, .message))]
    Status { status: u16, message: Option<String> },

    /// The body parsed, but not into the shape the endpoint promises.
    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not encode query: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// The server answered, but refused (login without a token, `{error}` bodies).
    #[error("{0}")]
    Rejected(String),

    #[error("no post is being edited")]
    NoEditTarget,

    #[error("storage error: {0}")]
    Storage(String),
}

fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("request failed with status {}", status),
    }
}
