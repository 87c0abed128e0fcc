//! Path component sanitization and filename derivation.

use url::Url;

/// Stand-in for path separators inside a single path component (U+2215).
pub const SEPARATOR_REPLACEMENT: char = '\u{2215}';

/// Make a creator id, title or filename safe to use as one path component.
///
/// Path separators become [`SEPARATOR_REPLACEMENT`] and null bytes are
/// dropped, so the result never introduces a nested directory. Components
/// that would name the current or parent directory are neutralised.
pub fn sanitize_path_component(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != '\0')
        .map(|c| match c {
            '/' | '\\' => SEPARATOR_REPLACEMENT,
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if sanitized.chars().all(|c| c == '.') {
        return sanitized.replace('.', "_");
    }

    sanitized
}

/// Derive the on-disk filename of an attachment from its URL.
///
/// Uses the last path segment; query and fragment are ignored. Returns `None`
/// when the URL has no usable last segment.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let name = parsed.path_segments()?.last()?;

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    Some(sanitize_path_component(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_path_component("creator_name"), "creator_name");
        assert_eq!(sanitize_path_component("日常: rough"), "日常: rough");
    }

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize_path_component("a/b"), "a\u{2215}b");
        assert_eq!(sanitize_path_component("a\\b"), "a\u{2215}b");
        assert_eq!(sanitize_path_component("../evil").chars().filter(|&c| c == '/').count(), 0);
    }

    #[test]
    fn test_sanitize_removes_null_bytes() {
        assert_eq!(sanitize_path_component("nu\0ll"), "null");
    }

    #[test]
    fn test_sanitize_neutralises_dot_names() {
        assert_eq!(sanitize_path_component(".."), "__");
        assert_eq!(sanitize_path_component("."), "_");
        assert_eq!(sanitize_path_component(""), "_");
        assert_eq!(sanitize_path_component("\0"), "_");
        assert_eq!(sanitize_path_component(".hidden"), ".hidden");
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://downloads.fanbox.cc/images/post/1/abc.png").as_deref(),
            Some("abc.png")
        );
        assert_eq!(
            filename_from_url("https://downloads.fanbox.cc/files/post/1/clip.mp4?x=1#frag")
                .as_deref(),
            Some("clip.mp4")
        );
    }

    #[test]
    fn test_filename_from_url_rejects_unusable() {
        assert_eq!(filename_from_url("https://downloads.fanbox.cc/"), None);
        assert_eq!(filename_from_url("https://downloads.fanbox.cc/images/"), None);
        assert_eq!(filename_from_url("not a url"), None);
    }
}
