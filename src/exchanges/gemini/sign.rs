//! Request signing for private Gemini endpoints
//!
//! Private calls carry the whole request payload in three headers: the
//! base64-encoded JSON payload, a hex HMAC-SHA384 digest of that base64
//! text, and the public API key. The request itself is a POST with an
//! empty body.

use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha384;
use std::collections::HashMap;
use std::fmt;

use crate::client::ExchangeConfig;
use crate::errors::{GeminiError, GeminiResult};

type HmacSha384 = Hmac<Sha384>;

/// Header carrying the base64 payload
pub const PAYLOAD_HEADER: &str = "X-GEMINI-PAYLOAD";
/// Header carrying the hex HMAC-SHA384 digest
pub const SIGNATURE_HEADER: &str = "X-GEMINI-SIGNATURE";
/// Header carrying the plaintext API key
pub const API_KEY_HEADER: &str = "X-GEMINI-APIKEY";

/// Reserved payload key holding the request path
const REQUEST_KEY: &str = "request";

/// API key pair for private endpoints
///
/// Held by the signer only; the secret never appears in logs or serialized
/// output beyond the signed digest.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Build credentials from config, if both key and secret are set
    pub fn from_config(config: &ExchangeConfig) -> Option<Self> {
        match (config.api_key(), config.api_secret()) {
            (Some(key), Some(secret)) => Some(Self::new(key, secret)),
            _ => None,
        }
    }

    /// Sign a payload for the given request path.
    ///
    /// The path is inserted under the reserved `request` key ahead of the
    /// caller's entries, then the payload is serialized in map insertion
    /// order (the
    /// exchange validates the digest against the exact byte sequence),
    /// base64-encoded, and digested with HMAC-SHA384 keyed by the secret.
    pub fn sign(&self, path: &str, payload: Map<String, Value>) -> GeminiResult<SignedHeaders> {
        let mut full = Map::new();
        full.insert(REQUEST_KEY.into(), Value::String(path.to_string()));
        full.extend(payload);

        let bytes = serde_json::to_vec(&full)?;
        let payload_b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let mut mac = HmacSha384::new_from_slice(self.api_secret.as_bytes()).map_err(|_| {
            GeminiError::AuthenticationError {
                message: "Invalid secret key".into(),
            }
        })?;
        mac.update(payload_b64.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(SignedHeaders {
            payload: payload_b64,
            signature,
            api_key: self.api_key.clone(),
        })
    }
}

/// The three headers authenticating a private request
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    /// Base64 of the serialized payload
    pub payload: String,
    /// Hex HMAC-SHA384 digest over the base64 text
    pub signature: String,
    /// Plaintext API key identifier
    pub api_key: String,
}

impl SignedHeaders {
    /// Convert into the header map sent with the request
    pub fn into_header_map(self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(PAYLOAD_HEADER.into(), self.payload);
        headers.insert(SIGNATURE_HEADER.into(), self.signature);
        headers.insert(API_KEY_HEADER.into(), self.api_key);
        headers
    }
}
