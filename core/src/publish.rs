//! Credential publication
//!
//! Exposes the minted token to later workflow steps through the environment.

use chrono::{DateTime, Utc};

use crate::config::{EXPIRY_ENV_KEY, TOKEN_ENV_KEY};
use crate::error::Result;
use crate::ims::AccessToken;
use crate::platform::EnvironmentSink;

/// Publish the token (secret) and, when known, its expiry
pub fn publish(sink: &dyn EnvironmentSink, token: &AccessToken) -> Result<()> {
    sink.set(TOKEN_ENV_KEY, &token.token, true)?;

    if let Some(expires_at_ms) = token.expires_at_ms {
        sink.set(EXPIRY_ENV_KEY, &expires_at_ms.to_string(), false)?;
        let expires_at = i64::try_from(expires_at_ms)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis);
        if let Some(expires_at) = expires_at {
            tracing::info!(expires_at = %expires_at.to_rfc3339(), "token expiry published");
        }
    }

    tracing::info!("Done setting env var");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSink;

    #[test]
    fn test_publish_marks_token_secret() {
        let sink = MockSink::new();
        let token = AccessToken {
            token: "abc-123".to_string(),
            expires_at_ms: Some(1_706_901_800_000),
        };

        publish(&sink, &token).unwrap();

        assert_eq!(sink.get(TOKEN_ENV_KEY), Some(("abc-123".to_string(), true)));
        assert_eq!(
            sink.get(EXPIRY_ENV_KEY),
            Some(("1706901800000".to_string(), false))
        );
    }

    #[test]
    fn test_publish_without_expiry_writes_token_only() {
        let sink = MockSink::new();
        let token = AccessToken {
            token: "abc-123".to_string(),
            expires_at_ms: None,
        };

        publish(&sink, &token).unwrap();

        assert_eq!(sink.len(), 1);
        assert!(sink.get(EXPIRY_ENV_KEY).is_none());
    }

    #[test]
    fn test_publish_propagates_sink_failure() {
        let sink = MockSink::failing();
        let token = AccessToken {
            token: "abc-123".to_string(),
            expires_at_ms: None,
        };

        let err = publish(&sink, &token).unwrap_err();
        assert_eq!(err.error_key(), "publish_error");
    }
}
