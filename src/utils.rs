use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier pattern"));

static BARE_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").expect("bare string pattern"));

static COMMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^comment([0-9]+)$").expect("comment name pattern"));

/// Object names, types, member names, units and ref targets.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Strings that can be written without quotes and read back unchanged.
pub fn is_bare_string(s: &str) -> bool {
    BARE_STRING.is_match(s)
}

/// Offset encoded in a synthetic `comment<offset>` name.
pub fn comment_offset(name: &str) -> Option<usize> {
    COMMENT_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Shortest text that reads back as the same `f64`; always carries a `.` or
/// an exponent so it is never mistaken for an integer.
pub fn format_float(n: f64) -> String {
    format!("{:?}", n)
}
