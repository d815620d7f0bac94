//! Identity Management Service (IMS) credential issuance
//!
//! Validates credential inputs, resolves scopes per flow, drives the token
//! service through its context protocol and translates provider failures.

pub mod acquire;
pub mod request;
pub mod scopes;
pub mod translate;
pub mod validate;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub use acquire::generate_token;
pub use request::{CredentialRequest, JwtCredentials, OAuthStsCredentials};

/// Supported credential-issuance flows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Service account (JWT) exchange
    Jwt,
    /// OAuth Server-to-Server client credentials
    OAuthServerToServer,
}

impl Flow {
    /// Flow name as it appears in failure messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jwt => "auth",
            Self::OAuthServerToServer => "oauth_sts",
        }
    }

    /// Prefix of the context names minted for this flow
    pub fn context_prefix(&self) -> &'static str {
        match self {
            Self::Jwt => "genToken-jwt",
            Self::OAuthServerToServer => "genToken-oauth-sts",
        }
    }

    pub fn schema(&self) -> &'static validate::Schema {
        match self {
            Self::Jwt => &validate::JWT_SCHEMA,
            Self::OAuthServerToServer => &validate::OAUTH_STS_SCHEMA,
        }
    }
}

/// Context configuration for the JWT flow, in the token service's shape
#[derive(Clone, Serialize)]
pub struct JwtContextConfig {
    pub client_id: String,
    pub client_secret: String,
    pub technical_account_id: String,
    pub ims_org_id: String,
    pub private_key: String,
    /// Used verbatim from the scopes input, elements are not checked
    pub meta_scopes: Vec<Value>,
}

/// Context configuration for the OAuth Server-to-Server flow
#[derive(Clone, Serialize)]
pub struct OAuthStsContextConfig {
    pub client_id: String,
    pub client_secrets: Vec<String>,
    pub technical_account_email: String,
    pub technical_account_id: String,
    pub ims_org_id: String,
    pub scopes: Vec<String>,
}

/// Configuration registered with the token service under a context name
#[derive(Clone, Serialize)]
#[serde(untagged)]
pub enum ContextConfig {
    Jwt(JwtContextConfig),
    OAuthServerToServer(OAuthStsContextConfig),
}

impl ContextConfig {
    pub fn flow(&self) -> Flow {
        match self {
            Self::Jwt(_) => Flow::Jwt,
            Self::OAuthServerToServer(_) => Flow::OAuthServerToServer,
        }
    }
}

impl fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(c) => f
                .debug_struct("Jwt")
                .field("client_id", &c.client_id)
                .field("technical_account_id", &c.technical_account_id)
                .field("ims_org_id", &c.ims_org_id)
                .field("meta_scopes", &c.meta_scopes)
                .finish_non_exhaustive(),
            Self::OAuthServerToServer(c) => f
                .debug_struct("OAuthServerToServer")
                .field("client_id", &c.client_id)
                .field("technical_account_email", &c.technical_account_email)
                .field("technical_account_id", &c.technical_account_id)
                .field("ims_org_id", &c.ims_org_id)
                .field("scopes", &c.scopes)
                .finish_non_exhaustive(),
        }
    }
}

/// Failure reported by the token service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TokenServiceError {
    pub message: String,
    /// Provider error code (e.g. `invalid_scope`), when the provider sent one
    pub code: Option<String>,
}

impl TokenServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Bearer token minted for one invocation
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    /// Absolute expiry in epoch milliseconds (JWT flow only)
    pub expires_at_ms: Option<u64>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}
