//! Platform abstraction traits
//!
//! These traits define the boundary between the action logic and the runtime
//! it executes in (GitHub Actions runner, tests).

use async_trait::async_trait;

use crate::error::Result;
use crate::ims::{ContextConfig, TokenServiceError};

/// Action input lookup
pub trait Inputs {
    /// Returns `None` for inputs that are unset or empty.
    fn get_input(&self, name: &str) -> Option<String>;
}

/// Identity token service: register a named context, then mint a token for it
#[async_trait(?Send)]
pub trait TokenService {
    async fn set_active_context(
        &self,
        name: &str,
        config: &ContextConfig,
        force_active: bool,
    ) -> std::result::Result<(), TokenServiceError>;

    async fn get_token(&self, name: &str) -> std::result::Result<String, TokenServiceError>;
}

/// Sink for environment variables consumed by later workflow steps
pub trait EnvironmentSink {
    /// Secret values must be redacted by any logging layer downstream.
    fn set(&self, key: &str, value: &str, secret: bool) -> Result<()>;
}

/// Runs a single CLI command line to completion
#[async_trait(?Send)]
pub trait CommandRunner {
    async fn run(&self, command: &str) -> Result<()>;
}

/// Clock for current time (enables testing with deterministic timestamps)
pub trait Clock {
    fn now_millis(&self) -> u64;
}
