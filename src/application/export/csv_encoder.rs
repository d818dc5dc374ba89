//! CSV encoding of export rows.
//!
//! Output is a pure function of the row sequence: the header line, then one
//! line per row, comma-delimited, `\n`-terminated. Fields are quoted only when
//! they contain a comma, a double quote or a line break; embedded quotes are
//! doubled.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::entities::ExportRow;
use crate::error::ExportError;

/// Column labels, in output order.
pub const HEADER: [&str; 5] = ["ID", "Original URL", "Short URL", "Access Count", "Created at"];

/// Incremental CSV encoder for [`ExportRow`]s.
///
/// The only state carried between calls is whether the header has been
/// written, so equal row sequences always encode to identical bytes.
pub struct CsvEncoder {
    builder: WriterBuilder,
    header_written: bool,
}

impl CsvEncoder {
    pub fn new() -> Self {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(b',')
            .quote(b'"')
            .double_quote(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false);

        Self {
            builder,
            header_written: false,
        }
    }

    /// Encodes the header line.
    ///
    /// Returns an empty chunk if the header was already written.
    pub fn header(&mut self) -> Result<Bytes, ExportError> {
        self.write(None)
    }

    /// Encodes one row, preceded by the header if it has not been written yet.
    pub fn encode(&mut self, row: &ExportRow) -> Result<Bytes, ExportError> {
        self.write(Some(row))
    }

    fn write(&mut self, row: Option<&ExportRow>) -> Result<Bytes, ExportError> {
        let mut buffer = Vec::with_capacity(128);
        {
            let mut wtr = self.builder.from_writer(&mut buffer);

            if !self.header_written {
                wtr.write_record(HEADER).map_err(encode_error)?;
            }

            if let Some(row) = row {
                wtr.write_record([
                    row.id.to_string().as_str(),
                    row.original_url.as_str(),
                    row.short_url.as_str(),
                    row.access_count.to_string().as_str(),
                    format_timestamp(&row.created_at).as_str(),
                ])
                .map_err(encode_error)?;
            }

            wtr.flush()
                .map_err(|e| ExportError::Encode(e.to_string()))?;
        }

        self.header_written = true;
        Ok(Bytes::from(buffer))
    }
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn encode_error(e: csv::Error) -> ExportError {
    ExportError::Encode(e.to_string())
}
