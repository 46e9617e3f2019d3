/// Reduce a raw phone string to its ASCII digits; absent input yields an empty string.
pub fn normalize_phone(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

pub(crate) fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|raw| !raw.is_empty())
}

pub(crate) fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}
