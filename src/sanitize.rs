//! Filesystem-safe folder names.

/// Characters that are not allowed in folder names on common filesystems.
pub const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace invalid characters with `_`, then trim leading and trailing spaces
/// and periods.
///
/// A name made only of trimmable characters sanitizes to the empty string.
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    replaced.trim_matches(|c| c == ' ' || c == '.').to_string()
}
