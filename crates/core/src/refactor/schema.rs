use super::types::ResponseField;

/// The two fields every model reply must contain.
pub const RESPONSE_FIELDS: &[ResponseField] = &[
    ResponseField {
        name: "refactor_code",
        description: "the refactored source code",
    },
    ResponseField {
        name: "language",
        description: "programming language of the refactored code",
    },
];

/// Render machine-readable formatting instructions for a field set.
///
/// Tells the model to answer with a fenced JSON object holding exactly the
/// declared keys. The fragment is injected into the prompt template and is
/// the counterpart of [`super::parse::parse_output`].
pub fn format_instructions(fields: &[ResponseField]) -> String {
    let lines: Vec<String> = fields
        .iter()
        .map(|field| format!("\t\"{}\": string  // {}", field.name, field.description))
        .collect();

    format!(
        "The output should be a markdown code snippet formatted in the following schema, \
         including the leading and trailing \"```json\" and \"```\":\n\n```json\n{{\n{}\n}}\n```",
        lines.join("\n")
    )
}
