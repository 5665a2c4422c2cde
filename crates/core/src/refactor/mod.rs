pub mod parse;
pub mod prompt;
pub mod schema;
pub mod types;

pub use parse::{parse_output, ParseError};
pub use prompt::render_prompt;
pub use schema::{format_instructions, RESPONSE_FIELDS};
pub use types::{CodeOutput, ResponseField};
