//! IMS token service client
//!
//! Keeps registered contexts in memory and exchanges them for access tokens:
//! JWT contexts via a signed service-account assertion, OAuth
//! Server-to-Server contexts via the client credentials grant.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aio_action_core::ims::{ContextConfig, JwtContextConfig, OAuthStsContextConfig, TokenServiceError};
use aio_action_core::platform::TokenService;

pub const IMS_PROD_URL: &str = "https://ims-na1.adobelogin.com";
pub const IMS_STAGE_URL: &str = "https://ims-na1-stg1.adobelogin.com";

/// Lifetime of the signed JWT assertion (30 minutes)
const JWT_ASSERTION_TTL_SECS: u64 = 30 * 60;

/// Successful token response
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error body returned by IMS
#[derive(Deserialize)]
struct ImsErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// HTTP-backed token service
pub struct ImsClient {
    http: reqwest::Client,
    base_url: String,
    contexts: RefCell<HashMap<String, ContextConfig>>,
    current: RefCell<Option<String>>,
}

impl ImsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            contexts: RefCell::new(HashMap::new()),
            current: RefCell::new(None),
        }
    }

    /// Select the IMS environment from `AIO_CLI_ENV` (`stage` or production)
    pub fn from_env() -> Self {
        match std::env::var("AIO_CLI_ENV").as_deref() {
            Ok("stage") => Self::new(IMS_STAGE_URL),
            _ => Self::new(IMS_PROD_URL),
        }
    }

    /// Name of the context most recently forced active
    pub fn current_context(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    async fn exchange_jwt(&self, config: &JwtContextConfig) -> Result<String, TokenServiceError> {
        let claims = jwt_claims(config, &self.base_url, now_secs());
        let assertion = sign_assertion(&config.private_key, &claims)?;

        self.post_token_request(
            "/ims/exchange/jwt",
            &[
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
                ("jwt_token", assertion.as_str()),
            ],
        )
        .await
    }

    async fn client_credentials(
        &self,
        config: &OAuthStsContextConfig,
    ) -> Result<String, TokenServiceError> {
        let scope = config.scopes.join(",");
        let mut last_error = TokenServiceError::new("no client secret configured");

        // Rotated credentials carry several secrets; the first accepted one wins.
        for secret in &config.client_secrets {
            let result = self
                .post_token_request(
                    "/ims/token/v3",
                    &[
                        ("grant_type", "client_credentials"),
                        ("client_id", config.client_id.as_str()),
                        ("client_secret", secret.as_str()),
                        ("scope", scope.as_str()),
                    ],
                )
                .await;

            match result {
                Ok(token) => return Ok(token),
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }

    async fn post_token_request(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<String, TokenServiceError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("User-Agent", "aio-action")
            .form(form)
            .send()
            .await
            .map_err(|e| TokenServiceError::new(format!("failed to call IMS: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TokenServiceError::new(format!("failed to read IMS response: {}", e)))?;

        parse_token_response(status, &body)
    }
}

#[async_trait(?Send)]
impl TokenService for ImsClient {
    async fn set_active_context(
        &self,
        name: &str,
        config: &ContextConfig,
        force_active: bool,
    ) -> Result<(), TokenServiceError> {
        if name.is_empty() {
            return Err(TokenServiceError::new("context name must not be empty"));
        }

        self.contexts
            .borrow_mut()
            .insert(name.to_string(), config.clone());
        if force_active {
            *self.current.borrow_mut() = Some(name.to_string());
        }
        Ok(())
    }

    async fn get_token(&self, name: &str) -> Result<String, TokenServiceError> {
        tracing::debug!(context = name, active = ?self.current_context(), "exchanging IMS context");
        let config = self
            .contexts
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| TokenServiceError::new(format!("IMS context '{}' is not configured", name)))?;

        match &config {
            ContextConfig::Jwt(c) => self.exchange_jwt(c).await,
            ContextConfig::OAuthServerToServer(c) => self.client_credentials(c).await,
        }
    }
}

/// Interpret an IMS token endpoint response
fn parse_token_response(status: u16, body: &[u8]) -> Result<String, TokenServiceError> {
    if (200..300).contains(&status) {
        let token: TokenResponse = serde_json::from_slice(body).map_err(|e| {
            TokenServiceError::new(format!("invalid IMS token response: {}", e))
        })?;
        return Ok(token.access_token);
    }

    match serde_json::from_slice::<ImsErrorBody>(body) {
        Ok(err) => {
            let detail = err
                .error_description
                .or_else(|| err.error.clone())
                .unwrap_or_else(|| "unknown error".to_string());
            let message = format!("IMS token request failed ({}): {}", status, detail);
            Err(match err.error {
                Some(code) => TokenServiceError::with_code(message, code),
                None => TokenServiceError::new(message),
            })
        }
        Err(_) => Err(TokenServiceError::new(format!(
            "IMS token request failed ({}): {}",
            status,
            String::from_utf8_lossy(body)
        ))),
    }
}

/// Claims of the service-account assertion
fn jwt_claims(config: &JwtContextConfig, base_url: &str, now_secs: u64) -> Value {
    let base_url = base_url.trim_end_matches('/');
    let mut claims = Map::new();
    claims.insert("exp".to_string(), Value::from(now_secs + JWT_ASSERTION_TTL_SECS));
    claims.insert("iss".to_string(), Value::from(config.ims_org_id.as_str()));
    claims.insert("sub".to_string(), Value::from(config.technical_account_id.as_str()));
    claims.insert(
        "aud".to_string(),
        Value::from(format!("{}/c/{}", base_url, config.client_id)),
    );

    for scope in &config.meta_scopes {
        let name = match scope {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        claims.insert(format!("{}/s/{}", base_url, name), Value::Bool(true));
    }

    Value::Object(claims)
}

/// Sign the assertion with the credential's RSA private key
fn sign_assertion(private_key: &str, claims: &Value) -> Result<String, TokenServiceError> {
    use surrealdb_jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| TokenServiceError::new(format!("invalid private key: {}", e)))?;

    encode(&Header::new(Algorithm::RS256), claims, &key)
        .map_err(|e| TokenServiceError::new(format!("failed to encode JWT: {}", e)))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
