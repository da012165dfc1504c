//! Identifier sanitization for SpiceDB schema names

/// Sanitize a string into a valid SpiceDB identifier.
///
/// Every character outside `[0-9a-zA-Z_]` becomes `_`, and a leading digit is prefixed
/// with `_`. Sanitizing an already sanitized identifier returns it unchanged.
pub fn sanitize_identifier(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }

    sanitized
}
