//! Header-signature format detection
//!
//! Reads whole leading lines from a buffered stream until one of the known
//! header signatures matches, skipping vendor comment and copyright lines.
//! On success the stream is left positioned at the first data row, ready to
//! hand to the streaming parser.

use super::schema::{FileKind, FormatVersion, Schema};
use crate::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Outcome of format detection for one file
#[derive(Debug, Clone, Copy)]
pub struct DetectedFormat {
    /// The schema this file carries
    pub schema: Schema,

    /// Number of lines consumed before the data section (comments + header)
    pub header_lines: u64,
}

/// Detect the vendor format of a file from its header signature
///
/// Consumes leading comment/copyright lines and the header line itself.
/// Fails if the stream ends (including an empty file) or if a non-comment
/// line does not match any known signature.
pub fn detect_format<R: BufRead>(reader: &mut R, file: &str) -> Result<DetectedFormat> {
    let mut line = String::new();
    let mut consumed: u64 = 0;

    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|e| Error::io(format!("Failed to read header of '{}'", file), e))?;

        if bytes == 0 {
            // Stream ended before any signature matched
            return Err(Error::unrecognized_format(file));
        }
        consumed += 1;

        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() || is_comment_line(trimmed) {
            continue;
        }

        for &schema in Schema::ALL {
            if trimmed.starts_with(schema.signature()) {
                debug!(
                    "Detected {} in '{}' after {} header line(s)",
                    schema, file, consumed
                );
                return Ok(DetectedFormat {
                    schema,
                    header_lines: consumed,
                });
            }
        }

        // First substantive line matched nothing; this file is not ours
        return Err(Error::unrecognized_format(file));
    }
}

/// Assert that the detected file kind is what the caller expected
pub fn expect_kind(detected: &DetectedFormat, expected: FileKind, file: &str) -> Result<()> {
    let found = detected.schema.kind();
    if found != expected {
        return Err(Error::format(
            file,
            format!("expected a {} file, found a {} file", expected, found),
        ));
    }
    Ok(())
}

/// Assert version agreement across the files of one load
///
/// Returns the version now fixed for the load. If a sibling file already
/// fixed a version, the new file must carry the same one.
pub fn expect_version(
    detected: &DetectedFormat,
    fixed: Option<FormatVersion>,
    file: &str,
) -> Result<FormatVersion> {
    let found = detected.schema.version();
    if let Some(expected) = fixed {
        if found != expected {
            return Err(Error::format(
                file,
                format!(
                    "format version mismatch: load uses {}, file is {}",
                    expected, found
                ),
            ));
        }
    }
    Ok(found)
}

fn is_comment_line(line: &str) -> bool {
    crate::constants::COMMENT_LINE_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn detect(content: &str) -> Result<DetectedFormat> {
        detect_format(&mut Cursor::new(content), "test.csv")
    }

    #[test]
    fn test_detects_all_signatures() {
        let cases = [
            ("locId,country,region\n1,US,KS\n", Schema::LegacyLocations),
            ("startIpNum,endIpNum,locId\n", Schema::LegacyBlocks),
            ("geoname_id,locale_code\n", Schema::LocationsV2),
            ("network,geoname_id\n", Schema::BlocksV2),
            ("id,country,region\n", Schema::NetacuityLocations),
            ("start_ip,end_ip,location_id\n", Schema::NetacuityBlocks),
        ];

        for (content, expected) in cases {
            let detected = detect(content).unwrap();
            assert_eq!(detected.schema, expected, "content: {}", content);
        }
    }

    #[test]
    fn test_skips_copyright_and_comment_lines() {
        let content = "Copyright (c) 2012 Example Vendor\n\
                       # generated 2012-04-01\n\
                       \n\
                       locId,country,region,city,postalCode,latitude,longitude,metroCode,areaCode\n\
                       1,\"US\",\"KS\",\"Wichita\",\"67212\",37.6,-97.4,678,316\n";

        let detected = detect(content).unwrap();
        assert_eq!(detected.schema, Schema::LegacyLocations);
        assert_eq!(detected.header_lines, 4);
    }

    #[test]
    fn test_stream_position_after_detection() {
        let mut reader = Cursor::new("startIpNum,endIpNum,locId\n16777216,16777471,1\n");
        detect_format(&mut reader, "blocks.csv").unwrap();

        let mut rest = String::new();
        reader.read_line(&mut rest).unwrap();
        assert_eq!(rest, "16777216,16777471,1\n");
    }

    #[test]
    fn test_empty_file_is_fatal() {
        assert!(matches!(
            detect(""),
            Err(Error::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn test_unknown_header_is_fatal() {
        assert!(matches!(
            detect("foo,bar,baz\n1,2,3\n"),
            Err(Error::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn test_comments_only_is_fatal() {
        assert!(matches!(
            detect("# nothing here\n# still nothing\n"),
            Err(Error::UnrecognizedFormat { .. })
        ));
    }

    #[test]
    fn test_expect_kind_mismatch() {
        let detected = detect("locId,country\n").unwrap();
        assert!(expect_kind(&detected, FileKind::Locations, "f").is_ok());
        assert!(matches!(
            expect_kind(&detected, FileKind::Blocks, "f"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_expect_version_fixes_and_rejects() {
        let locations = detect("locId,country\n").unwrap();
        let version = expect_version(&locations, None, "l").unwrap();
        assert_eq!(version, FormatVersion::LegacyV1);

        let blocks_v2 = detect("network,geoname_id\n").unwrap();
        assert!(matches!(
            expect_version(&blocks_v2, Some(version), "b"),
            Err(Error::Format { .. })
        ));
    }
}
