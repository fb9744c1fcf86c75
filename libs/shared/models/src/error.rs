use serde_json::Value;
use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str = "Cannot connect to backend. Please check if the backend server is running.";
const BAD_REQUEST_MESSAGE: &str = "Invalid request data. Please check your input fields.";
const UNAUTHORIZED_MESSAGE: &str = "Invalid or expired authentication token";
const FORBIDDEN_MESSAGE: &str = "You do not have permission to access this resource";
const NOT_FOUND_MESSAGE: &str = "The requested resource was not found";
const CONFLICT_MESSAGE: &str = "The selected slot or date is already taken. Please pick a different slot or date.";
const SERVER_MESSAGE: &str = "Internal server error. Please check backend logs.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{0}")]
    Connectivity(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Error {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Access denied: {0} role required")]
    AccessDenied(String),
}

impl ClientError {
    /// Map an HTTP status and raw response body onto the error taxonomy.
    ///
    /// Status 0 stands for a transport failure. The backend message is taken
    /// from a `{message, details}` body, or from a plain string body, and
    /// otherwise replaced by the generic message for the status.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_backend_message(body);

        match status {
            0 => ClientError::Connectivity(CONNECTIVITY_MESSAGE.to_string()),
            400 => ClientError::BadRequest(detail.unwrap_or_else(|| BAD_REQUEST_MESSAGE.to_string())),
            401 => ClientError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()),
            403 => ClientError::Forbidden(FORBIDDEN_MESSAGE.to_string()),
            404 => ClientError::NotFound(detail.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string())),
            409 => ClientError::Conflict(detail.unwrap_or_else(|| CONFLICT_MESSAGE.to_string())),
            500..=599 => ClientError::Server(detail.unwrap_or_else(|| SERVER_MESSAGE.to_string())),
            _ => ClientError::Unexpected {
                status,
                message: detail.unwrap_or_else(|| "Unknown error occurred".to_string()),
            },
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(vec![message.into()])
    }

    /// HTTP status this error came from, 0 for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Connectivity(_) => Some(0),
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::Server(_) => Some(500),
            ClientError::Unexpected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Connectivity(_))
    }

    /// Failures raised before anything reached the network.
    pub fn is_client_side(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::AccessDenied(_))
    }
}

fn extract_backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let message = map.get("message").and_then(Value::as_str).filter(|m| !m.is_empty());
            let details = map.get("details").and_then(Value::as_str).filter(|d| !d.is_empty());
            match (message, details) {
                (Some(message), Some(details)) => Some(format!("{}: {}", message, details)),
                (Some(message), None) => Some(message.to_string()),
                (None, _) => map
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        }
        Ok(Value::String(s)) if !s.is_empty() => Some(s),
        Ok(_) => None,
        Err(_) => Some(trimmed.to_string()),
    }
}
