// Label grammar shared by the library and its build script, which includes
// this file with `#[path]`. Keep it free of crate-local imports.

/// Dot-separated, non-empty runs of ASCII letters and digits.
pub fn is_identifier_list(s: &str) -> bool {
    s.split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// An identifier list whose all-digit parts carry no leading zero, as semver
/// requires of pre-release identifiers.
pub fn is_pre_release(s: &str) -> bool {
    is_identifier_list(s)
        && s.split('.').all(|part| {
            !(part.len() > 1 && part.starts_with('0') && part.bytes().all(|b| b.is_ascii_digit()))
        })
}

/// Reduces arbitrary text to valid build metadata: characters outside
/// `[0-9A-Za-z.]` are dropped and empty parts collapsed.
pub fn sanitize_build_metadata(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect();
    kept.split('.')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_lists() {
        assert!(is_identifier_list("rc1"));
        assert!(is_identifier_list("beta.2"));
        assert!(!is_identifier_list(""));
        assert!(!is_identifier_list("rc-1"));
        assert!(!is_identifier_list("a..b"));
        assert!(!is_identifier_list(".a"));
    }

    #[test]
    fn pre_release_rejects_leading_zero_numbers() {
        assert!(is_pre_release("rc.1"));
        assert!(is_pre_release("0"));
        assert!(is_pre_release("rc.0"));
        assert!(is_pre_release("0a"));
        assert!(!is_pre_release("rc.01"));
        assert!(!is_pre_release("01"));
        assert!(!is_pre_release("00"));
    }

    #[test]
    fn sanitize_drops_and_collapses() {
        assert_eq!(sanitize_build_metadata("3f2c9ab"), "3f2c9ab");
        assert_eq!(sanitize_build_metadata("g1-dirty"), "g1dirty");
        assert_eq!(sanitize_build_metadata("..a..b.."), "a.b");
        assert_eq!(sanitize_build_metadata(" "), "");
        assert_eq!(sanitize_build_metadata("ci build #42\n"), "cibuild42");
        assert_eq!(sanitize_build_metadata("a.-.b"), "a.b");
    }

    #[test]
    fn sanitized_output_is_empty_or_valid() {
        for raw in ["g1-dirty", "..a..b..", " ", "", "release/1.2", "héllo.wörld"] {
            let rev = sanitize_build_metadata(raw);
            assert!(rev.is_empty() || is_identifier_list(&rev), "{raw:?} -> {rev:?}");
        }
    }
}
