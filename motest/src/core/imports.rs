//! Front-loaded import scanning.
//!
//! Imports are expected at the top of a module. The scanner reads lines until
//! the first one that is not an import, a blank line, or a `//` comment. It
//! is a line-prefix scanner, not a parser: an import that appears after the
//! first declaration is never seen.

const IMPORT_KEYWORD: &str = "import";
const COMMENT_PREFIX: &str = "//";

/// Extract raw import specifiers from module source, in source order.
///
/// Each import line contributes its last whitespace-delimited token with the
/// trailing `;` and surrounding quotes removed.
pub fn extract_imports(source: &str) -> Vec<String> {
    let mut specifiers = Vec::new();

    for line in source.lines() {
        if is_import_line(line) {
            if let Some(specifier) = specifier_of(line) {
                specifiers.push(specifier.to_string());
            }
        } else if !line.trim().is_empty() && !line.starts_with(COMMENT_PREFIX) {
            break;
        }
    }

    specifiers
}

fn is_import_line(line: &str) -> bool {
    line.strip_prefix(IMPORT_KEYWORD)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}

fn specifier_of(line: &str) -> Option<&str> {
    let token = line.split_whitespace().last()?;
    let specifier = token.trim_end_matches(';').trim_matches('"');
    (!specifier.is_empty()).then_some(specifier)
}
