//! Scope resolution
//!
//! The two flows have independent scope grammars: the JWT flow takes a JSON
//! array of meta-scopes, the OAuth Server-to-Server flow a comma list.

use serde_json::Value;

use crate::error::{ActionError, Result};

/// Meta-scopes requested by the JWT flow when none are configured
pub const DEFAULT_META_SCOPES: [&str; 1] = ["ent_adobeio_sdk"];

/// Scopes granted by the I/O Management API, requested by the OAuth
/// Server-to-Server flow when none are configured
pub const DEFAULT_OAUTH_STS_SCOPES: [&str; 8] = [
    "AdobeID",
    "openid",
    "read_organizations",
    "additional_info.projectedProductContext",
    "additional_info.roles",
    "adobeio_api",
    "read_client_secret",
    "manage_client_secrets",
];

pub const META_SCOPES_FORMAT_ERROR: &str = "SCOPES environment variable must be an array of strings (e.g. [\"meta_scope_1\"]) to use the auth command";

/// Resolve the JWT flow's meta-scopes from a JSON array string
pub fn resolve_meta_scopes(input: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = input.filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_META_SCOPES.iter().map(|s| Value::from(*s)).collect());
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(scopes)) => Ok(scopes),
        _ => Err(ActionError::scope_format(META_SCOPES_FORMAT_ERROR)),
    }
}

/// Resolve the OAuth Server-to-Server scopes from a comma list
pub fn resolve_oauth_sts_scopes(input: Option<&str>) -> Vec<String> {
    match input.filter(|s| !s.is_empty()) {
        Some(raw) => split_list(raw),
        None => DEFAULT_OAUTH_STS_SCOPES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Split a comma-separated list, trimming whitespace around each entry
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}
