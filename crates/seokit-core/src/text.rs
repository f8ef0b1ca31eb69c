//! Text measurement and truncation helpers shared by the parser and the
//! meta tag engine.

/// Suffix appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Languages whose text is measured with CJK weighting.
const CJK_LANGUAGES: &[&str] = &["zh", "zh-tw", "ja", "ko"];

/// Whether a language code uses CJK length rules.
pub fn is_cjk_language(language: &str) -> bool {
    CJK_LANGUAGES
        .iter()
        .any(|code| code.eq_ignore_ascii_case(language))
}

/// Whether a character falls in the CJK ideograph, kana or hangul ranges.
pub fn is_cjk_char(c: char) -> bool {
    matches!(
        c,
        '\u{4e00}'..='\u{9fa5}'
            | '\u{3040}'..='\u{309f}'
            | '\u{30a0}'..='\u{30ff}'
            | '\u{ac00}'..='\u{d7af}'
    )
}

/// Truncate text at a word boundary, respecting UTF-8 character boundaries.
///
/// Text of at most `max_chars` characters is returned unchanged. Otherwise the
/// text is cut at the last space inside the limit (or hard-cut when there is
/// none) and [`ELLIPSIS`] is appended.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    match truncated.rfind(' ') {
        Some(last_space) if last_space > 0 => format!("{}{ELLIPSIS}", &truncated[..last_space]),
        _ => format!("{truncated}{ELLIPSIS}"),
    }
}

/// Truncate with CJK weighting: CJK characters cost 2 units, others 1.
///
/// Characters are kept until the next one would exceed `max_units`.
pub fn truncate_weighted(text: &str, max_units: usize) -> String {
    let mut units = 0;
    let mut end = text.len();

    for (idx, c) in text.char_indices() {
        let weight = if is_cjk_char(c) { 2 } else { 1 };
        if units + weight > max_units {
            end = idx;
            break;
        }
        units += weight;
    }

    if end == text.len() {
        text.to_string()
    } else {
        format!("{}{ELLIPSIS}", &text[..end])
    }
}

/// Truncate using the rules for `language`.
pub fn truncate_for_language(text: &str, max_len: usize, language: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    if is_cjk_language(language) {
        truncate_weighted(text, max_len)
    } else {
        truncate_at_word_boundary(text, max_len)
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
