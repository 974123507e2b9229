//! Log ingestion and extraction.
//!
//! Build logs arrive as plain text, as gzip streams, or as ZIP archives
//! bundling several step logs. Format detection goes by magic bytes, never
//! by file extension.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Combined log content for one build job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContent {
    pub build_log: String,
    pub deploy_log: String,
    /// Every section concatenated, with `=== name ===` frames between them
    pub raw_content: String,
}

impl LogContent {
    /// Assemble from named sections, in order.
    ///
    /// Sections whose name mentions "build" or "deploy" also land in the
    /// corresponding dedicated field.
    pub fn from_sections<'a, I>(sections: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut log = LogContent::default();
        for (name, content) in sections {
            let name_lower = name.to_lowercase();
            if name_lower.contains("build") {
                log.build_log.push_str(content);
                log.build_log.push('\n');
            } else if name_lower.contains("deploy") {
                log.deploy_log.push_str(content);
                log.deploy_log.push('\n');
            }
            log.raw_content.push_str(&format!("=== {name} ===\n"));
            log.raw_content.push_str(content);
            log.raw_content.push_str("\n\n");
        }
        log
    }
}

/// Decode raw log bytes. ZIP and gzip payloads are unpacked; anything else
/// must be UTF-8 text.
pub fn decode_log_bytes(bytes: &[u8]) -> Result<String> {
    // ZIP magic "PK"
    if bytes.len() >= 4 && bytes[0] == 0x50 && bytes[1] == 0x4B {
        return decode_zip(bytes);
    }
    // GZIP magic
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        return decode_gzip(bytes);
    }
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::LogDecodeError("log is not UTF-8 text".to_string()))
}

/// Read a log file from disk, decoding compressed formats transparently.
///
/// The file name decides which phase the content counts toward; anything
/// that does not say "deploy" is treated as a build log.
pub fn read_log_file(path: &Path) -> Result<LogContent> {
    let bytes = fs::read(path)?;
    let content = decode_log_bytes(&bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "log file decoded");

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
    let section = if stem.to_lowercase().contains("deploy") {
        "DEPLOY"
    } else {
        "BUILD"
    };
    Ok(LogContent::from_sections([(section, content.as_str())]))
}

fn decode_zip(bytes: &[u8]) -> Result<String> {
    let cursor = Cursor::new(bytes);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| Error::LogDecodeError(format!("unreadable ZIP archive: {e}")))?;

    let mut content = String::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::LogDecodeError(format!("unreadable ZIP entry {index}: {e}")))?;
        let mut text = String::new();
        entry.read_to_string(&mut text).map_err(|e| {
            Error::LogDecodeError(format!("ZIP entry '{}' is not text: {e}", entry.name()))
        })?;
        content.push_str(&text);
        content.push('\n');
    }
    Ok(content)
}

fn decode_gzip(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .map_err(|e| Error::LogDecodeError(format!("gzip decompression failed: {e}")))?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn gzip_bytes(text: &str) -> Vec<u8> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, text) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(text.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn plain_text_passes_through() {
        let decoded = decode_log_bytes(b"npm ERR! something").unwrap();
        assert_eq!(decoded, "npm ERR! something");
    }

    #[test]
    fn gzip_payload_decodes_to_the_original_text() {
        let text = "FATAL ERROR: JavaScript heap out of memory\n";
        let decoded = decode_log_bytes(&gzip_bytes(text)).unwrap();
        assert_eq!(decoded, text);
    }

    #[test]
    fn zip_payload_concatenates_entries_in_archive_order() {
        let bytes = zip_bytes(&[("build.log", "first"), ("deploy.log", "second")]);
        let decoded = decode_log_bytes(&bytes).unwrap();
        assert_eq!(decoded, "first\nsecond\n");
    }

    #[test]
    fn detection_goes_by_magic_bytes_not_names() {
        // gzip bytes presented without any name or extension still decode
        let decoded = decode_log_bytes(&gzip_bytes("compressed")).unwrap();
        assert_eq!(decoded, "compressed");
    }

    #[test]
    fn non_utf8_plain_bytes_are_rejected() {
        let err = decode_log_bytes(&[0xFF, 0xFE, 0x00, 0x41]).unwrap_err();
        assert!(matches!(err, Error::LogDecodeError(_)));
    }

    #[test]
    fn truncated_gzip_is_rejected() {
        let err = decode_log_bytes(&[0x1F, 0x8B, 0x08]).unwrap_err();
        assert!(matches!(err, Error::LogDecodeError(_)));
    }

    #[test]
    fn sections_frame_raw_content_and_split_by_phase() {
        let log = LogContent::from_sections([("BUILD", "compiling"), ("DEPLOY", "uploading")]);

        assert_eq!(log.build_log, "compiling\n");
        assert_eq!(log.deploy_log, "uploading\n");
        assert_eq!(
            log.raw_content,
            "=== BUILD ===\ncompiling\n\n=== DEPLOY ===\nuploading\n\n"
        );
    }

    #[test]
    fn file_named_deploy_counts_toward_the_deploy_phase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job-42-deploy.log");
        fs::write(&path, "uploading artifacts").unwrap();

        let log = read_log_file(&path).unwrap();
        assert!(log.build_log.is_empty());
        assert_eq!(log.deploy_log, "uploading artifacts\n");
    }

    #[test]
    fn compressed_file_on_disk_decodes_like_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.log.gz");
        fs::write(&path, gzip_bytes("error TS2304: Cannot find name 'x'.")).unwrap();

        let log = read_log_file(&path).unwrap();
        assert!(log.build_log.contains("error TS2304"));
    }
}
