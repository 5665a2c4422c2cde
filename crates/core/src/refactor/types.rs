use serde::{Deserialize, Serialize};

/// One named field the model is expected to return.
///
/// The descriptor is used twice: to generate the format instructions sent to
/// the model, and to validate key presence when parsing its reply.
#[derive(Debug, Clone, Copy)]
pub struct ResponseField {
    /// Key the model must emit.
    pub name: &'static str,
    /// Human-readable meaning, shown to the model next to the key.
    pub description: &'static str,
}

/// Parsed result of one refactor request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeOutput {
    /// The refactored source code.
    pub refactor_code: String,
    /// Name of the programming language the model detected.
    pub language: String,
}
