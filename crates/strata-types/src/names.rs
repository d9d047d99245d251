//! Object name rules.
//!
//! Valid object names:
//! - Must be non-empty
//! - Must not exceed the configured maximum length (in bytes)
//! - Must not contain the path separator `/`
//! - Must not contain control characters
//! - Must not be `.` or `..`

use crate::error::TypeError;

/// Separator used in the string form of a data path (`"Foo/Bar/Bazz"`).
pub const PATH_SEPARATOR: char = '/';

/// Default upper bound on name length, in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 255;

/// Validate an object name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use strata_types::names::validate_object_name;
///
/// assert!(validate_object_name("Image Data", 255).is_ok());
/// assert!(validate_object_name("", 255).is_err());
/// assert!(validate_object_name("a/b", 255).is_err());
/// ```
pub fn validate_object_name(name: &str, max_len: usize) -> Result<(), TypeError> {
    let invalid = |reason: String| TypeError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name must not be empty".into()));
    }

    if name.len() > max_len {
        return Err(invalid(format!(
            "name is {} bytes, limit is {max_len}",
            name.len()
        )));
    }

    if name.contains(PATH_SEPARATOR) {
        return Err(invalid(format!(
            "must not contain the path separator {PATH_SEPARATOR:?}"
        )));
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(invalid(format!("contains control character {ch:?}")));
    }

    if name == "." || name == ".." {
        return Err(invalid("'.' and '..' are reserved".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_object_name("Foo", DEFAULT_MAX_NAME_LEN).is_ok());
        assert!(validate_object_name("Bar1.3", DEFAULT_MAX_NAME_LEN).is_ok());
        assert!(validate_object_name("Cell Data", DEFAULT_MAX_NAME_LEN).is_ok());
        assert!(validate_object_name("...", DEFAULT_MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(validate_object_name("", DEFAULT_MAX_NAME_LEN).is_err());
    }

    #[test]
    fn reject_separator() {
        assert!(validate_object_name("Foo/Bar", DEFAULT_MAX_NAME_LEN).is_err());
        assert!(validate_object_name("/", DEFAULT_MAX_NAME_LEN).is_err());
    }

    #[test]
    fn reject_control_chars() {
        assert!(validate_object_name("a\nb", DEFAULT_MAX_NAME_LEN).is_err());
        assert!(validate_object_name("a\tb", DEFAULT_MAX_NAME_LEN).is_err());
    }

    #[test]
    fn reject_dot_names() {
        assert!(validate_object_name(".", DEFAULT_MAX_NAME_LEN).is_err());
        assert!(validate_object_name("..", DEFAULT_MAX_NAME_LEN).is_err());
    }

    #[test]
    fn length_limit_is_in_bytes() {
        assert!(validate_object_name("abcd", 4).is_ok());
        assert!(validate_object_name("abcde", 4).is_err());
        // two bytes per char
        assert!(validate_object_name("éé", 3).is_err());
    }

    #[test]
    fn error_mentions_name() {
        let err = validate_object_name("a/b", DEFAULT_MAX_NAME_LEN).unwrap_err();
        assert!(err.to_string().contains("a/b"));
    }
}
