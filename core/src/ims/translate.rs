//! Token service failure translation

use super::{Flow, TokenServiceError};
use crate::error::ActionError;

/// Provider error code for scopes the credential is not entitled to
pub const INVALID_SCOPE: &str = "invalid_scope";

pub const INVALID_SCOPE_MESSAGE: &str = "
Invalid scopes requested during auth command.
You may need to add the I/O Management API to your credential using either the Developer Console or the aio CLI (e.g. aio app add service).
Otherwise, if custom scopes were configured using the SCOPES variable, please ensure that the credential has access to the configured scopes by inspecting the credential in the Developer Console.
";

/// Final message for a JWT-flow failure
pub fn translate_message(err: &TokenServiceError) -> String {
    if err.code.as_deref() == Some(INVALID_SCOPE) {
        INVALID_SCOPE_MESSAGE.to_string()
    } else {
        err.message.clone()
    }
}

/// Map a token service failure for `flow` into an acquisition error.
///
/// Only the JWT flow rewrites `invalid_scope`; OAuth Server-to-Server
/// failures always surface the service's own message.
pub fn into_action_error(flow: Flow, err: TokenServiceError) -> ActionError {
    let message = match flow {
        Flow::Jwt => translate_message(&err),
        Flow::OAuthServerToServer => err.message,
    };
    ActionError::acquisition(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scope_is_rewritten() {
        let err = TokenServiceError::with_code("", INVALID_SCOPE);
        let message = translate_message(&err);
        assert!(message.contains("Invalid scopes requested"));
    }

    #[test]
    fn test_invalid_scope_replaces_provider_message() {
        let err = TokenServiceError::with_code("upstream said no", INVALID_SCOPE);
        assert!(!translate_message(&err).contains("upstream said no"));
    }

    #[test]
    fn test_other_failures_pass_through() {
        let err = TokenServiceError::new("some other failure");
        assert_eq!(translate_message(&err), "some other failure");

        let err = TokenServiceError::with_code("bad client", "invalid_client");
        assert_eq!(translate_message(&err), "bad client");
    }

    #[test]
    fn test_oauth_sts_keeps_raw_message_for_invalid_scope() {
        let err = TokenServiceError::with_code("raw provider message", INVALID_SCOPE);
        let action_err = into_action_error(Flow::OAuthServerToServer, err);
        assert_eq!(action_err.to_string(), "raw provider message");
        assert_eq!(action_err.error_key(), "acquisition_error");
    }

    #[test]
    fn test_jwt_flow_translates() {
        let err = TokenServiceError::with_code("raw provider message", INVALID_SCOPE);
        let action_err = into_action_error(Flow::Jwt, err);
        assert_eq!(action_err.to_string(), INVALID_SCOPE_MESSAGE);
    }
}
