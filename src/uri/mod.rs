//! Conversion between filesystem paths and `file://` URIs.
//!
//! The Local History metadata records each tracked file's identity as a
//! `file://` URI, while callers pass plain filesystem paths. Both sides
//! are converted to a common decoded, lexically-clean form before any
//! equality comparison.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};

/// The `file://` scheme prefix used by the snapshot metadata.
const FILE_SCHEME: &str = "file://";

// Characters to percent-encode when building a URI. Path separators are
// deliberately left out so `/a/b c.txt` becomes `file:///a/b%20c.txt`.
const URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Converts a `file://` URI into a filesystem path.
///
/// Strips the scheme prefix and percent-decodes the remainder, including
/// multi-byte encoded sequences. Any input that does not carry the
/// `file://` prefix is returned unchanged.
pub fn uri_to_path(input: &str) -> String {
    match input.strip_prefix(FILE_SCHEME) {
        Some(rest) => percent_decode_str(rest).decode_utf8_lossy().into_owned(),
        None => input.to_string(),
    }
}

/// Converts a filesystem path into a `file://` URI.
///
/// Percent-encodes the path (preserving separators) and prepends the
/// scheme. Inputs that already carry the prefix are returned unchanged.
pub fn path_to_uri(input: &str) -> String {
    if input.starts_with(FILE_SCHEME) {
        return input.to_string();
    }
    let encoded = utf8_percent_encode(input, URI_ENCODE_SET).to_string();
    format!("{FILE_SCHEME}{encoded}")
}

/// Normalizes a path to an absolute, lexically-clean form.
///
/// Relative paths are joined onto the current directory; `.` components
/// are dropped, `..` components pop their parent, and a `..` left over
/// at the root is dropped. This is a textual cleanup only and never
/// touches the filesystem beyond reading the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_to_path_strips_scheme() {
        assert_eq!(uri_to_path("file:///a/b.txt"), "/a/b.txt");
    }

    #[test]
    fn test_uri_to_path_decodes_spaces() {
        assert_eq!(uri_to_path("file:///a/b%20c.txt"), "/a/b c.txt");
    }

    #[test]
    fn test_uri_to_path_decodes_multibyte() {
        // "ü" percent-encodes to two bytes
        assert_eq!(uri_to_path("file:///tmp/%C3%BCber.txt"), "/tmp/über.txt");
    }

    #[test]
    fn test_uri_to_path_identity_on_plain_paths() {
        assert_eq!(uri_to_path("/a/b c.txt"), "/a/b c.txt");
        assert_eq!(uri_to_path("relative/path.txt"), "relative/path.txt");
        assert_eq!(uri_to_path(""), "");
    }

    #[test]
    fn test_path_to_uri_plain() {
        assert_eq!(path_to_uri("/a/b.txt"), "file:///a/b.txt");
    }

    #[test]
    fn test_path_to_uri_encodes_spaces() {
        assert_eq!(path_to_uri("/a/b c.txt"), "file:///a/b%20c.txt");
    }

    #[test]
    fn test_path_to_uri_identity_on_uris() {
        assert_eq!(path_to_uri("file:///a/b.txt"), "file:///a/b.txt");
    }

    #[test]
    fn test_round_trip_preserves_paths() {
        for path in [
            "/plain/path.txt",
            "/with spaces/in the name.rs",
            "/unicode/über/naïve.md",
            "/percent%literal/file.txt",
        ] {
            assert_eq!(uri_to_path(&path_to_uri(path)), path, "round trip of {path}");
        }
    }

    #[test]
    fn test_normalize_path_resolves_dot_components() {
        assert_eq!(
            normalize_path(Path::new("/a/./b/../c.txt")),
            PathBuf::from("/a/c.txt")
        );
    }

    #[test]
    fn test_normalize_path_keeps_clean_absolute_paths() {
        assert_eq!(
            normalize_path(Path::new("/a/b/c.txt")),
            PathBuf::from("/a/b/c.txt")
        );
    }

    #[test]
    fn test_normalize_path_makes_relative_absolute() {
        let normalized = normalize_path(Path::new("some/file.txt"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("some/file.txt"));
    }
}
