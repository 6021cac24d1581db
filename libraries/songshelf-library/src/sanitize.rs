//! Filesystem-safe filenames from arbitrary user strings

const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turn an arbitrary string into a single safe path component.
///
/// Separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are trimmed.
/// The result can be empty; callers pick their own fallback.
pub fn sanitize_filename(input: &str) -> String {
    let spaced: String = input
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if RESERVED_DEVICE_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(stem))
    {
        return format!("_{}", trimmed);
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(sanitize_filename("My Song"), "My_Song");
        assert_eq!(sanitize_filename("  lots   of\tspace "), "lots_of_space");
    }

    #[test]
    fn test_traversal_is_flattened() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\win\\system32"), "win_system32");
    }

    #[test]
    fn test_unsafe_characters_dropped() {
        assert_eq!(sanitize_filename("AC/DC: Back in Black?"), "AC_DC_Back_in_Black");
        assert_eq!(sanitize_filename("cover (1).png"), "cover_1.png");
        assert_eq!(sanitize_filename("Beyoncé"), "Beyonc");
    }

    #[test]
    fn test_only_unsafe_characters_is_empty() {
        assert_eq!(sanitize_filename("???"), "");
        assert_eq!(sanitize_filename("..."), "");
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn test_reserved_device_names_prefixed() {
        assert_eq!(sanitize_filename("con"), "_con");
        assert_eq!(sanitize_filename("NUL.txt"), "_NUL.txt");
        assert_eq!(sanitize_filename("console"), "console");
    }
}
