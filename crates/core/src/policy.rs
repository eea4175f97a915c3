//! Judge whether a default handler is fit for *editing* a file

/// Substrings that mark a handler as a script host rather than an editor:
/// - `WScript.exe` is the Windows Script Host executable
/// - `JSFile` is the legacy ProgID that routes `.js` files to that host
///
/// Matching is case-sensitive substring containment, to mirror how these
/// values are written by the OS.
pub const UNSAFE_HANDLER_MARKERS: [&str; 2] = ["WScript.exe", "JSFile"];

/// Is the handler described by these values safe to open a file for editing?
///
/// Safe iff no non-empty value contains any of the
/// [unsafe markers](UNSAFE_HANDLER_MARKERS), anywhere in the string. An empty
/// set is vacuously safe: no configuration is not evidence of a script host.
/// Empty values carry no information and are skipped.
pub fn is_default_handler_safe<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> bool {
    values
        .into_iter()
        .filter(|value| !value.is_empty())
        .all(|value| {
            !UNSAFE_HANDLER_MARKERS
                .iter()
                .any(|marker| value.contains(marker))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(&[], true)]
    #[case::only_empty_values(&["", ""], true)]
    #[case::editor(
        &[r#"C:\Program Files\Sublime\sublime_text.exe "%1""#],
        true
    )]
    #[case::progid_and_hash(&["Applications\\code.exe", "mBb0KL4dWpE="], true)]
    // Different case is a different string as far as we're concerned
    #[case::marker_wrong_case(&[r"C:\Windows\System32\wscript.exe"], true)]
    #[case::script_host(&[r"C:\Windows\System32\WScript.exe", ""], false)]
    #[case::legacy_progid(&["JSFile"], false)]
    #[case::marker_mid_string(&["xxJSFilexx"], false)]
    // One bad value spoils the set
    #[case::mixed(&["Applications\\code.exe", "JSFile"], false)]
    fn test_is_default_handler_safe(
        #[case] values: &[&str],
        #[case] expected: bool,
    ) {
        assert_eq!(is_default_handler_safe(values.iter().copied()), expected);
    }

    /// Every marker disqualifies on its own, wherever it appears
    #[rstest]
    fn test_each_marker_unsafe(
        #[values("", "prefix ", r"C:\dir\")] prefix: &str,
        #[values("", " suffix", ".bak")] suffix: &str,
    ) {
        for marker in UNSAFE_HANDLER_MARKERS {
            let value = format!("{prefix}{marker}{suffix}");
            assert!(
                !is_default_handler_safe([value.as_str()]),
                "{value:?} should be unsafe"
            );
        }
    }
}
