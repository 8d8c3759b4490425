pub(crate) fn normalize_token(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Strip currency symbols and thousands separators from a money cell.
pub(crate) fn clean_money(value: &str) -> Option<f64> {
    let trimmed = value.trim().replace(['$', ','], "");
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
