use crate::crawler::UNKNOWN_TITLE;

/// Characters that are not allowed in file names on common filesystems
const DISALLOWED: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest sanitized name in bytes, leaving room for an extension within the
/// usual 255-byte file name limit
const MAX_FILE_NAME_BYTES: usize = 200;

/// Makes a title safe to use as a file name
///
/// Disallowed and control characters become `_`, whitespace runs collapse
/// to one space, and an empty result becomes `"unknown"`. Names longer than
/// [`MAX_FILE_NAME_BYTES`] are cut at a character boundary.
///
/// # Examples
///
/// ```
/// use sumi_scroll::output::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("  Mist / Moon?  "), "Mist _ Moon_");
/// assert_eq!(sanitize_file_name("   "), "unknown");
/// ```
pub fn sanitize_file_name(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if DISALLOWED.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated = truncate_to_boundary(&collapsed, MAX_FILE_NAME_BYTES).trim_end();
    if truncated.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        truncated.to_string()
    }
}

fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
