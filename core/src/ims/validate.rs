//! Parameter validation
//!
//! Structural checks of the untyped credential inputs against a per-flow
//! schema. Every violation is collected, not just the first one.

use serde::Serialize;
use serde_json::Value;

use crate::config::{input, Params};

/// Required and optional string fields for one flow
pub struct Schema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const JWT_SCHEMA: Schema = Schema {
    required: &[
        input::KEY,
        input::CLIENT_ID,
        input::CLIENT_SECRET,
        input::TECHNICAL_ACCOUNT_ID,
        input::IMS_ORG_ID,
    ],
    optional: &[input::SCOPES],
};

pub const OAUTH_STS_SCHEMA: Schema = Schema {
    required: &[
        input::CLIENT_ID,
        input::CLIENT_SECRET,
        input::TECHNICAL_ACCOUNT_ID,
        input::TECHNICAL_ACCOUNT_EMAIL,
        input::IMS_ORG_ID,
    ],
    optional: &[input::SCOPES],
};

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// `required` or `type`
    pub keyword: &'static str,
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn required(field: &str) -> Self {
        Self {
            keyword: "required",
            field: field.to_string(),
            message: format!("must have required property '{}'", field),
        }
    }

    pub fn not_a_string(field: &str) -> Self {
        Self {
            keyword: "type",
            field: field.to_string(),
            message: "must be string".to_string(),
        }
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Violation>,
}

/// Check `params` against `schema`
pub fn validate(schema: &Schema, params: &Params) -> ValidationReport {
    let mut errors = Vec::new();

    for field in schema.required {
        match params.get(*field) {
            None | Some(Value::Null) => errors.push(Violation::required(field)),
            Some(Value::String(_)) => {}
            Some(_) => errors.push(Violation::not_a_string(field)),
        }
    }

    for field in schema.optional {
        match params.get(*field) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => errors.push(Violation::not_a_string(field)),
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
