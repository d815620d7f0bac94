//! Mock implementations of platform traits for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ActionError, Result};
use crate::ims::{ContextConfig, TokenServiceError};
use crate::platform::{Clock, CommandRunner, EnvironmentSink, Inputs, TokenService};

/// Mock inputs backed by an in-memory HashMap
pub struct MockInputs {
    values: HashMap<String, String>,
}

impl MockInputs {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Inputs for MockInputs {
    fn get_input(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Mock token service with a pre-configured outcome.
///
/// Records every call as `set:<context>` or `get:<context>`.
pub struct MockTokenService {
    token: std::result::Result<String, TokenServiceError>,
    context_failure: Option<TokenServiceError>,
    calls: Mutex<Vec<String>>,
    configs: Mutex<Vec<ContextConfig>>,
}

impl MockTokenService {
    pub fn returning(token: &str) -> Self {
        Self::with_outcome(Ok(token.to_string()))
    }

    pub fn rejecting(err: TokenServiceError) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(token: std::result::Result<String, TokenServiceError>) -> Self {
        Self {
            token,
            context_failure: None,
            calls: Mutex::new(Vec::new()),
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_context(mut self, err: TokenServiceError) -> Self {
        self.context_failure = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn configs(&self) -> Vec<ContextConfig> {
        self.configs.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl TokenService for MockTokenService {
    async fn set_active_context(
        &self,
        name: &str,
        config: &ContextConfig,
        _force_active: bool,
    ) -> std::result::Result<(), TokenServiceError> {
        self.calls.lock().unwrap().push(format!("set:{}", name));
        self.configs.lock().unwrap().push(config.clone());
        match &self.context_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn get_token(&self, name: &str) -> std::result::Result<String, TokenServiceError> {
        self.calls.lock().unwrap().push(format!("get:{}", name));
        self.token.clone()
    }
}

/// Mock environment sink recording `(value, secret)` per key
pub struct MockSink {
    vars: Mutex<HashMap<String, (String, bool)>>,
    fail: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            vars: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            vars: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    pub fn get(&self, key: &str) -> Option<(String, bool)> {
        self.vars.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.vars.lock().unwrap().len()
    }
}

impl EnvironmentSink for MockSink {
    fn set(&self, key: &str, value: &str, secret: bool) -> Result<()> {
        if self.fail {
            return Err(ActionError::publish(key, "sink unavailable"));
        }
        self.vars
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), secret));
        Ok(())
    }
}

/// Mock command runner recording every command line it receives
pub struct MockRunner {
    commands: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Fails any command line containing `pattern`
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_on: Some(pattern.to_string()),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl CommandRunner for MockRunner {
    async fn run(&self, command: &str) -> Result<()> {
        self.commands.lock().unwrap().push(command.to_string());
        match &self.fail_on {
            Some(pattern) if command.contains(pattern.as_str()) => Err(
                ActionError::command_failed(format!("The process '{}' failed with exit code 1", command)),
            ),
            _ => Ok(()),
        }
    }
}

/// Mock clock with a fixed timestamp
pub struct MockClock(pub u64);

impl Clock for MockClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}
