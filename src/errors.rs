//! Connector error hierarchy
//!
//! A pruned version of the CCXT error classes, limited to the kinds this
//! connector actually raises or forwards.

use thiserror::Error;

/// Errors surfaced by the Gemini connector
#[derive(Error, Debug)]
pub enum GeminiError {
    /// Exchange-reported failure (the `{"result":"error"}` envelope);
    /// carries the exchange's `reason` text verbatim
    #[error("Exchange error: {message}")]
    ExchangeError { message: String },

    /// Authentication failed or credentials missing for a private call
    #[error("Authentication error: {message}")]
    AuthenticationError { message: String },

    /// Feature the exchange cannot fulfill (e.g. pure market orders)
    #[error("Not supported: {feature}")]
    NotSupported { feature: String },

    /// Invalid order parameters
    #[error("Invalid order: {message}")]
    InvalidOrder { message: String },

    /// Order not found on the exchange
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    /// Transport-level failure
    #[error("Network error: {url} - {message}")]
    NetworkError { url: String, message: String },

    /// Request timed out
    #[error("Request timeout: {url}")]
    RequestTimeout { url: String },

    /// Failed to map response data into the domain model
    #[error("Parse error: {data_type} - {message}")]
    ParseError { data_type: String, message: String },

    /// JSON (de)serialization error
    #[error("JSON error: {message}")]
    JsonError { message: String },
}

impl GeminiError {
    /// Returns the error code as a string constant
    pub fn code(&self) -> &'static str {
        match self {
            GeminiError::ExchangeError { .. } => "EXCHANGE_ERROR",
            GeminiError::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            GeminiError::NotSupported { .. } => "NOT_SUPPORTED",
            GeminiError::InvalidOrder { .. } => "INVALID_ORDER",
            GeminiError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            GeminiError::NetworkError { .. } => "NETWORK_ERROR",
            GeminiError::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            GeminiError::ParseError { .. } => "PARSE_ERROR",
            GeminiError::JsonError { .. } => "JSON_ERROR",
        }
    }

    /// Returns true if this error is temporary and the operation can be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeminiError::NetworkError { .. } | GeminiError::RequestTimeout { .. }
        )
    }

    /// Returns true if this is an authentication-related error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, GeminiError::AuthenticationError { .. })
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::JsonError {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::RequestTimeout {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if err.is_connect() {
            GeminiError::NetworkError {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                message: "Connection failed".into(),
            }
        } else {
            GeminiError::NetworkError {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias
pub type GeminiResult<T> = Result<T, GeminiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = GeminiError::AuthenticationError {
            message: "Invalid API key".into(),
        };
        assert_eq!(err.code(), "AUTHENTICATION_ERROR");

        let err = GeminiError::ExchangeError {
            message: "InvalidNonce".into(),
        };
        assert_eq!(err.code(), "EXCHANGE_ERROR");
    }

    #[test]
    fn test_retryable_errors() {
        let network_err = GeminiError::NetworkError {
            url: "https://api.gemini.com".into(),
            message: "Connection refused".into(),
        };
        assert!(network_err.is_retryable());

        let timeout_err = GeminiError::RequestTimeout {
            url: "https://api.gemini.com".into(),
        };
        assert!(timeout_err.is_retryable());

        let auth_err = GeminiError::AuthenticationError {
            message: "Invalid key".into(),
        };
        assert!(!auth_err.is_retryable());
        assert!(auth_err.is_auth_error());
    }

    #[test]
    fn test_exchange_error_keeps_reason_verbatim() {
        let err = GeminiError::ExchangeError {
            message: "InvalidSignature".into(),
        };
        assert!(err.to_string().contains("InvalidSignature"));
    }
}
