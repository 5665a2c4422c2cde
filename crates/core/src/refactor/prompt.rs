/// Instructional template sent to the model on every request.
///
/// `{format_instructions}` is substituted first, then `{code}`, so a snippet
/// that itself contains `{format_instructions}` passes through untouched.
const CODE_TEMPLATE: &str = "\
Refactor the code below according to the following criteria:
- improve variable, function and class names to be descriptive and meaningful
- update renamed identifiers everywhere they are referenced
- use consistent formatting, indentation and commenting
- follow the best practices of the respective programming language
- group related code together and separate concerns to improve readability and maintainability
- do not change the imports or exports of the code
- insert semicolons where needed but do not add redundant semicolons
- omit the language name at the top of the code
- do not change CSS class names, renaming them could break the HTML styling

The code is delimited by triple backticks.

code: ```{code}```

{format_instructions}
";

/// Render the final prompt for one submitted snippet.
///
/// Pure string substitution: the same inputs always produce a byte-identical
/// prompt, so repeated requests for the same code hit the model with the
/// exact same text.
pub fn render_prompt(code: &str, format_instructions: &str) -> String {
    CODE_TEMPLATE
        .replace("{format_instructions}", format_instructions)
        .replace("{code}", code)
}
