use axum::http::StatusCode;

/// Per-request failure kinds.
///
/// Every failure a request can hit is tagged here and mapped exactly once to
/// an HTTP status and message at the response boundary, so the transport
/// status and the body's `status_code` can never disagree.
#[derive(thiserror::Error, Debug)]
pub enum Failure {
    /// The model returned no usable content.
    #[error("Empty response from chat API")]
    EmptyOutput,

    /// The model's reply did not match the declared output schema.
    #[error("Unexpected result from chat API")]
    BadParse,

    /// The call to the model provider failed.
    #[error("Internal Server error: {0}")]
    Oracle(String),

    /// Anything else that escaped the handler.
    #[error("Internal Server error: {0}")]
    Internal(String),
}

impl Failure {
    pub fn status(&self) -> StatusCode {
        match self {
            Failure::EmptyOutput => StatusCode::NOT_FOUND,
            Failure::BadParse | Failure::Oracle(_) | Failure::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn into_body(self) -> ErrorBody {
        ErrorBody {
            status_code: self.status().as_u16(),
            message: self.to_string(),
        }
    }
}

/// Uniform JSON body returned on every failure path.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}
