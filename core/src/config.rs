//! Action inputs and constants

use serde_json::{Map, Value};

use crate::platform::Inputs;

/// Environment slot holding the minted access token
pub const TOKEN_ENV_KEY: &str = "AIO_IMS_CONTEXTS_CLI_ACCESS__TOKEN_TOKEN";

/// Environment slot holding the token expiry (epoch milliseconds)
pub const EXPIRY_ENV_KEY: &str = "AIO_IMS_CONTEXTS_CLI_ACCESS__TOKEN_EXPIRY";

/// Lifetime assumed for JWT-flow tokens (30 minutes)
pub const TOKEN_EXPIRY_WINDOW_MS: u64 = 30 * 60 * 1000;

/// Credential input names, as declared by the action
pub mod input {
    pub const KEY: &str = "key";
    pub const CLIENT_ID: &str = "clientId";
    pub const CLIENT_SECRET: &str = "clientSecret";
    pub const TECHNICAL_ACCOUNT_ID: &str = "technicalAccountId";
    pub const TECHNICAL_ACCOUNT_EMAIL: &str = "technicalAccountEmail";
    pub const IMS_ORG_ID: &str = "imsOrgId";
    pub const SCOPES: &str = "scopes";
}

const CREDENTIAL_INPUTS: [&str; 7] = [
    input::KEY,
    input::CLIENT_ID,
    input::CLIENT_SECRET,
    input::TECHNICAL_ACCOUNT_ID,
    input::TECHNICAL_ACCOUNT_EMAIL,
    input::IMS_ORG_ID,
    input::SCOPES,
];

/// Untyped credential parameters keyed by input name
pub type Params = Map<String, Value>;

/// Everything the action reads from its inputs
#[derive(Default)]
pub struct ActionInputs {
    /// Command name (`build`, `deploy`, `test`, `auth`, `oauth_sts`)
    pub command: Option<String>,
    /// Runner operating system label (e.g. "ubuntu-latest")
    pub os: Option<String>,
    pub no_publish: bool,
    pub force_deploy: bool,
    /// Credential inputs for the token flows
    pub params: Params,
}

impl ActionInputs {
    /// Load inputs from the platform
    pub fn from_inputs(inputs: &dyn Inputs) -> Self {
        let mut params = Params::new();
        for name in CREDENTIAL_INPUTS {
            if let Some(value) = inputs.get_input(name).filter(|v| !v.is_empty()) {
                params.insert(name.to_string(), Value::String(value));
            }
        }

        Self {
            command: inputs.get_input("command").filter(|v| !v.is_empty()),
            os: inputs.get_input("os").filter(|v| !v.is_empty()),
            no_publish: is_true(inputs.get_input("noPublish")),
            force_deploy: is_true(inputs.get_input("forceDeploy")),
            params,
        }
    }
}

fn is_true(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}
