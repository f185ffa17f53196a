//! Grade verdict
//!
//! The oracle's output contract. The schema is derived from the type itself
//! and compiled once; raw oracle output is validated against it before a
//! typed deserialize is trusted.

use crate::error::OracleError;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

static SCHEMA_JSON: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(schema_for!(GradeVerdict)).expect("verdict schema serializes")
});

static COMPILED_SCHEMA: Lazy<JSONSchema> =
    Lazy::new(|| JSONSchema::compile(&SCHEMA_JSON).expect("verdict schema compiles"));

/// A validated critique of one diagram against one problem statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeVerdict {
    /// Overall score
    #[schemars(range(min = 1, max = 10))]
    pub score: u8,
    /// Narrative explaining the score
    pub feedback: String,
    /// What the design does well
    pub strengths: Vec<String>,
    /// What could be improved
    pub weaknesses: Vec<String>,
    /// Essential components the design lacks
    pub missing_components: Vec<String>,
    /// Security risks identified
    pub security_risks: Vec<String>,
}

impl GradeVerdict {
    /// The JSON schema the oracle's output must satisfy.
    #[must_use]
    pub fn schema() -> &'static Value {
        &SCHEMA_JSON
    }

    /// Validate raw oracle output and convert it into a verdict.
    ///
    /// # Errors
    /// `OracleError::SchemaViolation` when the value does not conform.
    pub fn from_value(value: Value) -> Result<Self, OracleError> {
        if let Err(errors) = COMPILED_SCHEMA.validate(&value) {
            let detail = errors.map(|error| error.to_string()).collect::<Vec<_>>().join("; ");
            return Err(OracleError::SchemaViolation(detail));
        }
        serde_json::from_value(value).map_err(|error| OracleError::SchemaViolation(error.to_string()))
    }
}
