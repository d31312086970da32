//! Streaming row parser
//!
//! Drives the CSV reader over a buffered stream left positioned after the
//! header by the format detector. The underlying reader consumes the
//! stream in bounded chunks; a cell or row may span any number of chunks,
//! quoted fields may contain delimiters and raw newlines, and a final
//! unterminated row is still delivered. The first hard error stops
//! consumption of the file and propagates to the caller.

use super::record_parser::{parse_row, DiscardReason, RowData, RowOutcome};
use super::schema::Schema;
use super::stats::ParseStats;
use crate::{Error, Result};
use csv::StringRecord;
use std::io::BufRead;
use tracing::debug;

/// Parse all data rows of a file, invoking the row handler for each kept row
///
/// `header_lines` is the number of lines the detector consumed, so that
/// diagnostics report absolute line numbers. The handler receives the
/// assembled row and its line number; a handler error aborts the parse.
pub fn parse_rows<R, F>(
    schema: Schema,
    reader: R,
    file: &str,
    header_lines: u64,
    mut on_row: F,
) -> Result<ParseStats>
where
    R: BufRead,
    F: FnMut(RowData, u64) -> Result<()>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut stats = ParseStats::new();
    let mut record = StringRecord::new();

    loop {
        // Line of the row about to be read, before the reader advances
        let line = header_lines + csv_reader.position().line();

        let got = csv_reader
            .read_record(&mut record)
            .map_err(|e| Error::csv_parsing(file, e.to_string(), Some(e)))?;
        if !got {
            break;
        }

        stats.total_rows += 1;

        let expected = schema.column_count();
        if record.len() != expected {
            return Err(Error::row(
                file,
                line,
                format!("expected {} columns, found {}", expected, record.len()),
            ));
        }

        match parse_row(schema, &record) {
            Ok(RowOutcome::Row(data)) => {
                stats.rows_parsed += 1;
                on_row(data, line)?;
            }
            Ok(RowOutcome::Discarded(reason)) => {
                match reason {
                    DiscardReason::MissingCoordinates => {
                        stats.discarded_missing_coordinates += 1;
                    }
                    DiscardReason::MissingForeignKey => {
                        stats.discarded_missing_key += 1;
                    }
                }
                debug!("Discarded row at '{}' line {}: {:?}", file, line, reason);
            }
            Err(failure) => {
                return Err(match failure.column {
                    Some(column) => Error::cell(file, line, column, failure.message),
                    None => Error::row(file, line, failure.message),
                });
            }
        }
    }

    debug!(
        "Parsed '{}': {} rows, {} kept, {} discarded",
        file,
        stats.total_rows,
        stats.rows_parsed,
        stats.discarded_total()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Coverage;
    use std::io::Cursor;

    fn collect_rows(
        schema: Schema,
        content: &str,
        header_lines: u64,
    ) -> Result<(Vec<(RowData, u64)>, ParseStats)> {
        let mut rows = Vec::new();
        let stats = parse_rows(
            schema,
            Cursor::new(content),
            "test.csv",
            header_lines,
            |data, line| {
                rows.push((data, line));
                Ok(())
            },
        )?;
        Ok((rows, stats))
    }

    #[test]
    fn test_parses_rows_with_line_numbers() {
        let content = "167772160,167772161,1\n167772162,167772163,2\n";
        let (rows, stats) = collect_rows(Schema::LegacyBlocks, content, 1).unwrap();

        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.rows_parsed, 2);
        // One header line consumed before the data section
        assert_eq!(rows[0].1, 2);
        assert_eq!(rows[1].1, 3);
    }

    #[test]
    fn test_column_count_invariant() {
        let err = collect_rows(Schema::LegacyBlocks, "167772160,167772161\n", 1).unwrap_err();
        match err {
            Error::Row { line, message, .. } => {
                assert_eq!(line, 2);
                assert_eq!(message, "expected 3 columns, found 2");
            }
            other => panic!("expected a row error, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_column_is_fatal() {
        let err =
            collect_rows(Schema::LegacyBlocks, "167772160,167772161,1,trailing\n", 1).unwrap_err();
        match err {
            Error::Row { message, .. } => {
                assert_eq!(message, "expected 3 columns, found 4");
            }
            other => panic!("expected a row error, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_fields_with_delimiters_and_newlines() {
        let content = concat!(
            "10,\"US\",\"KS\",\"Wichita, East\n",
            "Side\",\"67212\",\"37.6\",\"-97.4\",\"678\",\"316\"\n",
            "11,\"US\",\"KS\",\"Topeka\",\"66601\",\"39.0\",\"-95.7\",\"605\",\"785\"\n",
        );
        let (rows, stats) = collect_rows(Schema::LegacyLocations, content, 2).unwrap();

        assert_eq!(stats.rows_parsed, 2);
        match &rows[0].0 {
            RowData::Location(row) => {
                assert_eq!(row.record.city.as_deref(), Some("Wichita, East\nSide"));
            }
            other => panic!("expected a location row, got {:?}", other),
        }
        // Quoted newline: first row starts at line 3, second at line 5
        assert_eq!(rows[0].1, 3);
        assert_eq!(rows[1].1, 5);
    }

    #[test]
    fn test_final_unterminated_row_is_delivered() {
        let content = "167772160,167772161,1";
        let (rows, stats) = collect_rows(Schema::LegacyBlocks, content, 1).unwrap();
        assert_eq!(stats.rows_parsed, 1);
        match &rows[0].0 {
            RowData::Block(block) => assert!(matches!(block.coverage, Coverage::Range(_))),
            other => panic!("expected a block row, got {:?}", other),
        }
    }

    #[test]
    fn test_cell_error_carries_position() {
        let content = "167772160,notanumber,1\n";
        let err = collect_rows(Schema::LegacyBlocks, content, 4).unwrap_err();
        match err {
            Error::Cell {
                line,
                column,
                message,
                ..
            } => {
                assert_eq!(line, 5);
                assert_eq!(column, 2);
                assert!(message.contains("notanumber"));
            }
            other => panic!("expected a cell error, got {:?}", other),
        }
    }

    #[test]
    fn test_discards_are_counted_not_fatal() {
        let content = "\
1,US,,,,,\n\
2,US,,,,37.6,-97.4\n";
        // Build legacy-shaped rows with 9 columns
        let content = content.replace('\n', ",0,0\n");
        let (rows, stats) = collect_rows(Schema::LegacyLocations, &content, 1).unwrap();

        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.rows_parsed, 1);
        assert_eq!(stats.discarded_missing_coordinates, 1);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_handler_error_aborts_parse() {
        let content = "167772160,167772161,1\n167772162,167772163,2\n";
        let mut seen = 0;
        let result = parse_rows(
            Schema::LegacyBlocks,
            Cursor::new(content),
            "test.csv",
            1,
            |_, line| {
                seen += 1;
                Err(Error::join_key_not_found("test.csv", line, 1))
            },
        );

        assert!(matches!(result, Err(Error::JoinKeyNotFound { .. })));
        assert_eq!(seen, 1);
    }
}
