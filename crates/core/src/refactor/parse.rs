use std::collections::BTreeMap;

use super::schema::RESPONSE_FIELDS;
use super::types::{CodeOutput, ResponseField};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response JSON is not an object")]
    NotAnObject,

    #[error("response is missing the \"{0}\" field")]
    MissingField(&'static str),
}

/// Parse a model reply into the declared output fields.
///
/// Validates key presence against the field descriptors, not full type
/// correctness of the values: a non-string value is carried as its compact
/// JSON text.
pub fn parse_fields(
    response: &str,
    fields: &[ResponseField],
) -> Result<BTreeMap<&'static str, String>, ParseError> {
    let block = extract_json_block(response);

    let value: serde_json::Value =
        serde_json::from_str(block).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let mut values = BTreeMap::new();
    for field in fields {
        let text = match object.get(field.name) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(ParseError::MissingField(field.name)),
        };
        values.insert(field.name, text);
    }

    Ok(values)
}

/// Parse a model reply against the refactor schema.
pub fn parse_output(response: &str) -> Result<CodeOutput, ParseError> {
    let mut values = parse_fields(response, RESPONSE_FIELDS)?;

    Ok(CodeOutput {
        refactor_code: values.remove("refactor_code").unwrap_or_default(),
        language: values.remove("language").unwrap_or_default(),
    })
}

/// Extract the JSON payload from a model reply.
///
/// Prefers a ```json fenced block, then a bare ``` fence, else the whole
/// trimmed text. Leading commentary before the fence is ignored.
fn extract_json_block(response: &str) -> &str {
    let trimmed = response.trim();

    let body = if let Some(start) = trimmed.find("```json") {
        &trimmed[start + "```json".len()..]
    } else if let Some(start) = trimmed.find("```") {
        &trimmed[start + "```".len()..]
    } else {
        return trimmed;
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}
