//! Route-name validation.
//!
//! The grammar is ASCII: a plain route name starts with a letter, ends with a
//! letter or digit, uses only letters, digits, dashes, underscores, and
//! forward slashes, and is at least two characters long. Every `/`-delimited
//! sub-route must itself start with a letter, end with a letter or digit, and
//! be at least two characters long. System routes (reserved, e.g.
//! introspection endpoints) are the same grammar behind a leading underscore,
//! minimum length three.
//!
//! Validation returns a specific reason rather than a generic failure; the
//! reason strings are part of the protocol contract and are surfaced to
//! clients verbatim.

use thiserror::Error;

/// The specific reason a route name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteNameError {
    /// The name was empty.
    #[error("Route is required")]
    Required,
    /// The name was shorter than two characters.
    #[error("Route should be at least two characters long")]
    TooShort,
    /// The first character was not a letter.
    #[error("Route should start with a letter")]
    BadStart,
    /// The last character was not a letter or a digit.
    #[error("Route should end with a letter or a number")]
    BadEnd,
    /// The name contained a character outside the allowed set.
    #[error("Route should contain only letters, numbers, dashes, underscores, and forward slashes")]
    BadCharacter,
    /// A sub-route did not start with a letter.
    #[error("Sub-routes should start with a letter")]
    SubRouteBadStart,
    /// A sub-route did not end with a letter or a digit.
    #[error("Sub-routes should end with a letter or a number")]
    SubRouteBadEnd,
    /// A sub-route was shorter than two characters.
    #[error("Sub-routes should be at least two characters long")]
    SubRouteTooShort,
    /// The system route name was shorter than three characters.
    #[error("System route should be at least three characters long")]
    SystemTooShort,
    /// The system route name did not start with an underscore.
    #[error("System route should start with an underscore")]
    SystemBadStart,
    /// The system route name did not end with a letter or a digit.
    #[error("System route should end with a letter or a number")]
    SystemBadEnd,
    /// The system route name contained a character outside the allowed set.
    #[error(
        "System route should contain only letters, numbers, dashes, underscores, and forward slashes"
    )]
    SystemBadCharacter,
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '/'
}

/// Validates a plain route name, returning the specific failure reason.
pub fn validate_route_name(name: &str) -> Result<(), RouteNameError> {
    if name.is_empty() {
        return Err(RouteNameError::Required);
    }
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 2 {
        return Err(RouteNameError::TooShort);
    }
    if !chars[0].is_ascii_alphabetic() {
        return Err(RouteNameError::BadStart);
    }
    if !chars[chars.len() - 1].is_ascii_alphanumeric() {
        return Err(RouteNameError::BadEnd);
    }
    if !chars.iter().copied().all(is_name_char) {
        return Err(RouteNameError::BadCharacter);
    }
    validate_sub_routes(&chars, name)
}

/// Validates a reserved system route name (leading underscore).
pub fn validate_system_route_name(name: &str) -> Result<(), RouteNameError> {
    if name.is_empty() {
        return Err(RouteNameError::Required);
    }
    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 3 {
        return Err(RouteNameError::SystemTooShort);
    }
    if chars[0] != '_' {
        return Err(RouteNameError::SystemBadStart);
    }
    if !chars[chars.len() - 1].is_ascii_alphanumeric() {
        return Err(RouteNameError::SystemBadEnd);
    }
    if !chars[1].is_ascii_alphabetic() || !chars.iter().skip(1).copied().all(is_name_char) {
        return Err(RouteNameError::SystemBadCharacter);
    }
    validate_sub_routes(&chars, name)
}

/// Sub-route boundary checks, applied after the whole-name grammar passes.
///
/// The checks scan slash-adjacent characters rather than split segments so
/// the leading underscore of a system route is never misread as a bad
/// sub-route start.
fn validate_sub_routes(chars: &[char], name: &str) -> Result<(), RouteNameError> {
    for (i, c) in chars.iter().enumerate() {
        if *c == '/' && chars.get(i + 1).is_some_and(|next| !next.is_ascii_alphabetic()) {
            return Err(RouteNameError::SubRouteBadStart);
        }
    }
    for (i, c) in chars.iter().enumerate() {
        if *c == '/' && i > 0 && !chars[i - 1].is_ascii_alphanumeric() {
            return Err(RouteNameError::SubRouteBadEnd);
        }
    }
    if name.contains('/') && name.split('/').any(|segment| segment.chars().count() < 2) {
        return Err(RouteNameError::SubRouteTooShort);
    }
    Ok(())
}
