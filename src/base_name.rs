//! Base-name resolution for caption files
//!
//! Caption downloads are typically named `<title>.<lang>.vtt`. The cleaned
//! artifact drops both suffixes but keeps every other dot in the title, so
//! `Dr. Who.en.vtt` becomes `Dr. Who`.

/// Caption file extension, without the leading dot
pub const CAPTION_EXTENSION: &str = "vtt";

/// Extension of cleaned transcript artifacts, without the leading dot
pub const TRANSCRIPT_EXTENSION: &str = "txt";

/// Language codes recognized as a trailing `.<code>` suffix
pub const KNOWN_LANGUAGE_CODES: [&str; 10] = [
    "en", "es", "fr", "de", "it", "pt", "ru", "ja", "ko", "zh",
];

/// Strip `.<suffix>` from the end of `name`, comparing ASCII case-insensitively.
/// Returns `None` when the suffix is absent.
pub fn strip_dotted_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let suffix = suffix.trim_start_matches('.');
    if suffix.is_empty() {
        return None;
    }
    let cut = name.len().checked_sub(suffix.len() + 1)?;
    if !name.is_char_boundary(cut) {
        return None;
    }
    let tail = &name[cut..];
    if tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(suffix) {
        Some(&name[..cut])
    } else {
        None
    }
}

/// Resolve the artifact base name of a caption file name using the default
/// extension and language-code set
pub fn resolve_base_name(file_name: &str) -> &str {
    resolve_base_name_with(file_name, CAPTION_EXTENSION, &KNOWN_LANGUAGE_CODES)
}

/// Strip at most one `extension`, then at most one of `language_codes`.
///
/// Each step is optional and applied once. The result is always a prefix of
/// `file_name`.
pub fn resolve_base_name_with<'a, S: AsRef<str>>(
    file_name: &'a str,
    extension: &str,
    language_codes: &[S],
) -> &'a str {
    let without_ext = strip_dotted_suffix(file_name, extension).unwrap_or(file_name);
    language_codes
        .iter()
        .find_map(|code| strip_dotted_suffix(without_ext, code.as_ref()))
        .unwrap_or(without_ext)
}

/// File name of the cleaned transcript produced for a caption file
pub fn output_file_name(file_name: &str) -> String {
    format!("{}.{}", resolve_base_name(file_name), TRANSCRIPT_EXTENSION)
}
