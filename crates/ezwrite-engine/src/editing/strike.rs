//! Struck ("done") state carried inside the line text itself.
//!
//! A struck line starts with [`STRUCK_MARKER`], a zero-width space followed by
//! a check mark. Users never type it; only checkbox toggles write it.

/// Invisible prefix marking a line as struck through.
pub const STRUCK_MARKER: &str = "\u{200B}\u{2713}";

/// Whether the line carries the strike marker.
pub fn is_struck(line: &str) -> bool {
    line.starts_with(STRUCK_MARKER)
}

/// The line without its strike marker (if any).
pub fn clean(line: &str) -> &str {
    line.strip_prefix(STRUCK_MARKER).unwrap_or(line)
}

/// Prefix the marker. Callers check [`is_struck`] first; applying it twice
/// produces a line whose visible text starts with a marker.
pub fn mark(line: &str) -> String {
    format!("{STRUCK_MARKER}{line}")
}

/// Rewrite `line` with the given struck state, keeping its visible text.
pub fn set_struck(line: &str, struck: bool) -> String {
    let text = clean(line);
    if struck { mark(text) } else { text.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("buy milk")]
    #[case("\u{200B}\u{2713}buy milk")]
    #[case("\u{2713} looks like a marker but is not")]
    fn test_clean_mark_roundtrip(#[case] line: &str) {
        assert_eq!(clean(&mark(clean(line))), clean(line));
    }

    #[test]
    fn test_is_struck_detects_prefix_only() {
        assert!(is_struck(&mark("done")));
        assert!(!is_struck("done"));
        assert!(!is_struck("done\u{200B}\u{2713}"));
    }

    #[test]
    fn test_clean_strips_single_marker() {
        assert_eq!(clean(&mark("task")), "task");
        assert_eq!(clean("task"), "task");
    }

    #[test]
    fn test_set_struck_is_idempotent() {
        let once = set_struck("task", true);
        let twice = set_struck(&once, true);
        assert_eq!(once, twice);
        assert_eq!(set_struck(&twice, false), "task");
    }
}
