//! Token acquisition
//!
//! Registers a freshly named context with the token service, forcing it
//! active, then requests a token for it. One attempt per invocation.

use uuid::Uuid;

use super::translate::into_action_error;
use super::{AccessToken, ContextConfig, CredentialRequest, Flow, TokenServiceError};
use crate::config::TOKEN_EXPIRY_WINDOW_MS;
use crate::error::Result;
use crate::platform::{Clock, TokenService};

/// Mint a context name unique to this acquisition
pub fn mint_context_name(flow: Flow) -> String {
    format!("{}-{}", flow.context_prefix(), Uuid::new_v4())
}

/// Run the two-step context protocol, returning the service's failure unchanged
pub async fn acquire_token(
    service: &dyn TokenService,
    context_name: &str,
    config: &ContextConfig,
) -> std::result::Result<String, TokenServiceError> {
    tracing::info!(context = context_name, "registering IMS context");
    service.set_active_context(context_name, config, true).await?;

    tracing::info!(context = context_name, "requesting token from IMS");
    service.get_token(context_name).await
}

/// Acquire an access token for a validated request
pub async fn generate_token(
    request: CredentialRequest,
    service: &dyn TokenService,
    clock: &dyn Clock,
) -> Result<AccessToken> {
    let flow = request.flow();
    let context_name = mint_context_name(flow);
    let config = request.into_context_config();

    tracing::debug!(flow = flow.name(), config = ?config, "acquiring token");
    let token = acquire_token(service, &context_name, &config)
        .await
        .map_err(|e| into_action_error(flow, e))?;

    let expires_at_ms = match flow {
        Flow::Jwt => Some(clock.now_millis() + TOKEN_EXPIRY_WINDOW_MS),
        Flow::OAuthServerToServer => None,
    };

    tracing::info!(flow = flow.name(), "token acquired");
    Ok(AccessToken {
        token,
        expires_at_ms,
    })
}
