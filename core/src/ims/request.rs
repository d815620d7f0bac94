//! Typed credential requests
//!
//! A request only exists once its inputs passed validation and its scopes
//! resolved, so nothing partial ever reaches the token service.

use serde_json::Value;
use std::fmt;

use super::scopes::{resolve_meta_scopes, resolve_oauth_sts_scopes, split_list};
use super::validate::validate;
use super::{ContextConfig, Flow, JwtContextConfig, OAuthStsContextConfig};
use crate::config::{input, Params};
use crate::error::{ActionError, Result};

/// JWT flow credentials
pub struct JwtCredentials {
    pub private_key: String,
    pub client_id: String,
    pub client_secret: String,
    pub technical_account_id: String,
    pub ims_org_id: String,
    pub meta_scopes: Vec<Value>,
}

/// OAuth Server-to-Server flow credentials
pub struct OAuthStsCredentials {
    pub client_id: String,
    /// One or more secrets; the input may carry a comma-separated list
    pub client_secrets: Vec<String>,
    pub technical_account_id: String,
    pub technical_account_email: String,
    pub ims_org_id: String,
    pub scopes: Vec<String>,
}

/// Validated credential request for one flow
pub enum CredentialRequest {
    Jwt(JwtCredentials),
    OAuthServerToServer(OAuthStsCredentials),
}

impl CredentialRequest {
    /// Validate `params` for `flow` and resolve its scopes
    pub fn from_params(flow: Flow, params: &Params) -> Result<Self> {
        let report = validate(flow.schema(), params);
        if !report.valid {
            return Err(ActionError::validation(flow.name(), report.errors));
        }
        tracing::debug!(flow = flow.name(), "credential inputs validated");

        let scopes = string_field(params, input::SCOPES);
        let request = match flow {
            Flow::Jwt => Self::Jwt(JwtCredentials {
                private_key: required_field(params, input::KEY),
                client_id: required_field(params, input::CLIENT_ID),
                client_secret: required_field(params, input::CLIENT_SECRET),
                technical_account_id: required_field(params, input::TECHNICAL_ACCOUNT_ID),
                ims_org_id: required_field(params, input::IMS_ORG_ID),
                meta_scopes: resolve_meta_scopes(scopes)?,
            }),
            Flow::OAuthServerToServer => Self::OAuthServerToServer(OAuthStsCredentials {
                client_id: required_field(params, input::CLIENT_ID),
                client_secrets: split_list(&required_field(params, input::CLIENT_SECRET)),
                technical_account_id: required_field(params, input::TECHNICAL_ACCOUNT_ID),
                technical_account_email: required_field(params, input::TECHNICAL_ACCOUNT_EMAIL),
                ims_org_id: required_field(params, input::IMS_ORG_ID),
                scopes: resolve_oauth_sts_scopes(scopes),
            }),
        };

        tracing::debug!(flow = flow.name(), "scopes resolved");
        Ok(request)
    }

    pub fn flow(&self) -> Flow {
        match self {
            Self::Jwt(_) => Flow::Jwt,
            Self::OAuthServerToServer(_) => Flow::OAuthServerToServer,
        }
    }

    /// Rename the credential fields into the token service's configuration shape
    pub fn into_context_config(self) -> ContextConfig {
        match self {
            Self::Jwt(c) => ContextConfig::Jwt(JwtContextConfig {
                client_id: c.client_id,
                client_secret: c.client_secret,
                technical_account_id: c.technical_account_id,
                ims_org_id: c.ims_org_id,
                private_key: c.private_key,
                meta_scopes: c.meta_scopes,
            }),
            Self::OAuthServerToServer(c) => {
                ContextConfig::OAuthServerToServer(OAuthStsContextConfig {
                    client_id: c.client_id,
                    client_secrets: c.client_secrets,
                    technical_account_email: c.technical_account_email,
                    technical_account_id: c.technical_account_id,
                    ims_org_id: c.ims_org_id,
                    scopes: c.scopes,
                })
            }
        }
    }
}

impl fmt::Debug for CredentialRequest {
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
                .field("technical_account_id", &c.technical_account_id)
                .field("technical_account_email", &c.technical_account_email)
                .field("ims_org_id", &c.ims_org_id)
                .field("scopes", &c.scopes)
                .finish_non_exhaustive(),
        }
    }
}

fn string_field<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}

// Only called after validation succeeded.
fn required_field(params: &Params, name: &str) -> String {
    string_field(params, name).unwrap_or_default().to_string()
}
