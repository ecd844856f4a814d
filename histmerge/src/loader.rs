//! Reads history files into memory.
//!
//! History archives are sometimes truncated or corrupted mid-way through a
//! multi-byte character. Every byte that is not part of a valid UTF-8 sequence
//! is replaced with a visible marker so the rest of the pipeline only ever sees
//! valid text.

use histmerge_types::{MergeError, MergeResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Text content of one history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// Physical lines, each terminated by `\n`, CRLF endings reduced to LF.
    pub content: String,
    /// Number of invalid bytes that were replaced with the marker.
    pub repaired: usize,
}

/// Read `path` fully and repair invalid byte sequences with `marker`.
pub fn load_history(path: &Path, marker: char) -> MergeResult<Loaded> {
    let mut file = File::open(path).map_err(|source| MergeError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|source| MergeError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    let (text, repaired) = sanitize(&bytes, marker);
    if repaired > 0 {
        warn!(
            "{} contains {repaired} invalid UTF-8 bytes, replaced with '{marker}'",
            path.display()
        );
    }

    Ok(Loaded {
        content: normalize_line_endings(&text),
        repaired,
    })
}

/// Decode `bytes` as UTF-8, replacing each invalid byte with `marker`.
///
/// Returns the text and the number of replaced bytes.
pub fn sanitize(bytes: &[u8], marker: char) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut repaired = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        for _ in chunk.invalid() {
            text.push(marker);
            repaired += 1;
        }
    }
    (text, repaired)
}

fn normalize_line_endings(text: &str) -> String {
    let mut content = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        content.push_str(line);
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn valid_utf8_is_untouched() {
        let (text, repaired) = sanitize("ls -la ✓ 日本語".as_bytes(), '#');
        assert_eq!(text, "ls -la ✓ 日本語");
        assert_eq!(repaired, 0);
    }

    #[test]
    fn each_invalid_byte_gets_a_marker() {
        // 0x80 and 0x90 are stray continuation bytes
        let (text, repaired) = sanitize(b"echo \x80\x90 invalid", '#');
        assert_eq!(text, "echo ## invalid");
        assert_eq!(repaired, 2);
    }

    #[test]
    fn truncated_sequence_is_repaired_bytewise() {
        // first two bytes of a three byte character
        let (text, repaired) = sanitize(b"a\xe3\x81", '?');
        assert_eq!(text, "a??");
        assert_eq!(repaired, 2);
    }

    #[test]
    fn crlf_is_reduced_to_lf() {
        let content = normalize_line_endings("a\r\nb\r\nc");
        assert_eq!(content, "a\nb\nc\n");
    }

    #[test]
    fn load_file_with_invalid_bytes() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("zsh_history");
        let mut file = File::create(&path)?;
        file.write_all(b": 1625097600:0;echo \xff ok\n")?;
        file.flush()?;

        let loaded = load_history(&path, '#')?;
        assert_eq!(loaded.content, ": 1625097600:0;echo # ok\n");
        assert_eq!(loaded.repaired, 1);
        Ok(())
    }

    #[test]
    fn missing_file_is_file_access_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing");
        let err = load_history(&path, '#').unwrap_err();
        match err {
            MergeError::FileAccess { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other:?}"),
        }
        Ok(())
    }
}
