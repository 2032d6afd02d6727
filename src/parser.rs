//! Decoder for the survey export document.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;

use crate::analyzers::types::RawEntry;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decodes a JSON array of responses, each an array of `[question, answer]`
/// pairs. Gzip-compressed input is detected and inflated first.
///
/// # Errors
///
/// Returns an error if the bytes are not valid gzip (when gzip-tagged) or not
/// a JSON document of the expected shape.
pub fn parse_document(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut inflated)
            .context("Failed to inflate gzip document")?;
        return parse_json(&inflated);
    }
    parse_json(bytes)
}

fn parse_json(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    serde_json::from_slice(bytes).context("Malformed survey document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const DOC: &str = r#"[
        [["ID", "1"], ["Какой предмет у тебя был?", "Физика"]],
        [["ID", "2"], ["Теги", "а"], ["Теги", "б"]]
    ]"#;

    #[test]
    fn test_parse_empty_array() {
        let entries = parse_document(b"[]").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_entries_in_order() {
        let entries = parse_document(DOC.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0.len(), 3);
        assert_eq!(entries[0].iter().next(), Some(("ID", "1")));
    }

    #[test]
    fn test_parse_gzip_document() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(DOC.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let entries = parse_document(&compressed).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_document(b"{not json").is_err());
    }

    #[test]
    fn test_parse_wrong_shape() {
        // pairs must be two-element arrays
        assert!(parse_document(br#"[[["ID"]]]"#).is_err());
        assert!(parse_document(br#"{"ID": "1"}"#).is_err());
    }
}
