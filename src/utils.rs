//! Shared utility functions for the tool launcher

/// Convert a string to title case: everything lowercased, then the first
/// alphabetic character of each whitespace-separated word uppercased.
///
/// Non-alphabetic characters do not end the "next letter is capital" state,
/// so `"3d viewer"` becomes `"3D Viewer"`.
///
/// # Examples
///
/// ```
/// use tool_launcher::utils::title_case;
///
/// assert_eq!(title_case("build RELEASE"), "Build Release");
/// assert_eq!(title_case("3d viewer"), "3D Viewer");
/// ```
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut capitalize_next = true;

    for ch in input.chars() {
        if ch.is_whitespace() {
            capitalize_next = true;
            result.push(ch);
        } else if capitalize_next && ch.is_alphabetic() {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

/// Human label for a tool name: underscores become spaces, then title case.
///
/// ```
/// use tool_launcher::utils::display_label;
///
/// assert_eq!(display_label("clean_temp_FILES"), "Clean Temp Files");
/// ```
pub fn display_label(name: &str) -> String {
    title_case(&name.replace('_', " "))
}

/// Escape text for inclusion in SVG / XML character data or attributes.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Shorten `text` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("hello world"), "Hello World");
        assert_eq!(title_case("HELLO  wORLD"), "Hello  World");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_keeps_waiting_after_digits() {
        assert_eq!(title_case("2fa setup"), "2Fa Setup");
        assert_eq!(title_case("-x"), "-X");
    }

    #[test]
    fn test_display_label_replaces_underscores() {
        assert_eq!(display_label("disk_cleanup"), "Disk Cleanup");
        assert_eq!(display_label("a"), "A");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & 'c'>"), "a&lt;b &amp; &apos;c&apos;&gt;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }
}
