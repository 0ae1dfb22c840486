//! Label normalisation for vocabulary lookups.

/// Uppercase and drop everything that is not alphanumeric.
///
/// Punctuation, case and whitespace variants of a label collapse to one key:
/// `"Dried and pressed"`, `"DRIED-AND-PRESSED"` and `"dried_and_pressed"`
/// all become `"DRIEDANDPRESSED"`.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}
