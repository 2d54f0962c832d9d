//! Branch name validation.
//!
//! Names follow git conventions so that they are unambiguous on the command
//! line: no whitespace or revision syntax, no `..`, no leading `-` (which
//! would read as an option), and no empty or dot-prefixed `/` components.

use crate::error::{RefError, RefResult};

/// Characters that are forbidden anywhere in a branch name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Substrings that are forbidden anywhere in a branch name.
const FORBIDDEN_SEQUENCES: &[&str] = &["..", "@{", "//"];

/// Validate a branch name, returning `Ok(())` if valid.
///
/// ```
/// use twig_refs::validate_branch_name;
///
/// assert!(validate_branch_name("master").is_ok());
/// assert!(validate_branch_name("feature/merge").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("-f").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> RefResult<()> {
    let invalid = |reason: String| RefError::InvalidBranchName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("must not be empty".into()));
    }
    if name.starts_with('-') {
        return Err(invalid("must not start with '-'".into()));
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control()) {
        return Err(invalid(format!("contains forbidden character {ch:?}")));
    }
    if let Some(seq) = FORBIDDEN_SEQUENCES.iter().find(|s| name.contains(*s)) {
        return Err(invalid(format!("must not contain {seq:?}")));
    }
    if name.ends_with('.') || name.ends_with(".lock") {
        return Err(invalid("must not end with '.' or '.lock'".into()));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid("'/'-separated components must not be empty".into()));
        }
        if component.starts_with('.') {
            return Err(invalid(format!("component {component:?} starts with '.'")));
        }
    }

    Ok(())
}
