//! Header normalization for Snowfakery CSV output
//!
//! SFDMU matches records on `Id`, while Snowfakery writes a lowercase `id`
//! column. Every data file is rewritten in place with its id-like header cell
//! renamed; everything after the header is copied back byte for byte.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use miette::Diagnostic;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header name SFDMU expects for the record key
pub const ID_COLUMN: &str = "Id";

/// Result of rewriting one data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFile {
    /// Header row after normalization
    pub header: Vec<String>,
    /// Data rows written back (header excluded)
    pub data_rows: usize,
    /// Whether any header cell was renamed
    pub renamed: bool,
}

/// Per-file failures; the run skips the file and carries on
#[derive(Debug, Error, Diagnostic)]
pub enum FileError {
    #[error("file {file} not found in {}", folder.display())]
    #[diagnostic(code(sfdmu_export::data::not_found))]
    NotFound { file: String, folder: PathBuf },

    #[error("file {file} is empty")]
    #[diagnostic(code(sfdmu_export::data::empty))]
    Empty { file: String },

    #[error("failed to read {file}: {source}")]
    #[diagnostic(code(sfdmu_export::data::read))]
    Read {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("error writing to file {file}: {source}")]
    #[diagnostic(code(sfdmu_export::data::write))]
    Write {
        file: String,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Name of the data file the error is about
    pub fn file(&self) -> &str {
        match self {
            FileError::NotFound { file, .. }
            | FileError::Empty { file }
            | FileError::Read { file, .. }
            | FileError::Write { file, .. } => file,
        }
    }
}

/// Rename a single header cell if it is a case-insensitive `id`
pub fn normalize_cell(cell: &str) -> &str {
    if cell.to_lowercase() == "id" {
        ID_COLUMN
    } else {
        cell
    }
}

/// Rename every id-like cell of a header row, keeping order and all other cells
pub fn normalize_header(header: &StringRecord) -> StringRecord {
    header.iter().map(normalize_cell).collect()
}

/// UTF-8 byte order mark some spreadsheet tools put in front of CSV files
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Read `<folder>/<file>`, normalize its header and write it back in place
///
/// Only the header record is re-encoded. A leading BOM, blank lines, the
/// header's own line terminator and every byte after the header are written
/// back exactly as read. A header with nothing to rename is left
/// byte-identical. There is no rollback: once the write starts the file on
/// disk reflects the new content.
pub fn normalize_file(folder: &Path, file: &str) -> Result<NormalizedFile, FileError> {
    let path = folder.join(file);

    let bytes = std::fs::read(&path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            FileError::NotFound {
                file: file.to_string(),
                folder: folder.to_path_buf(),
            }
        } else {
            FileError::Read {
                file: file.to_string(),
                source: e,
            }
        }
    })?;

    let (bom, body) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (UTF8_BOM, rest),
        None => (&b""[..], &bytes[..]),
    };

    let split = split_header(body).map_err(|e| FileError::Read {
        file: file.to_string(),
        source: e.into(),
    })?;

    let Some(split) = split else {
        return Err(FileError::Empty {
            file: file.to_string(),
        });
    };

    let header = normalize_header(&split.header);
    let renamed = header != split.header;

    let (raw_header, rest) = body.split_at(split.header_end);
    let header_bytes = if renamed {
        encode_header(&header, raw_header).map_err(|e| FileError::Write {
            file: file.to_string(),
            source: e,
        })?
    } else {
        raw_header.to_vec()
    };

    write_parts(&path, &[bom, &header_bytes, rest]).map_err(|e| FileError::Write {
        file: file.to_string(),
        source: e,
    })?;

    Ok(NormalizedFile {
        header: header.iter().map(str::to_string).collect(),
        data_rows: split.data_rows,
        renamed,
    })
}

/// First record of a CSV body and where its raw bytes end
struct HeaderSplit {
    header: StringRecord,
    /// Byte offset just past the header's line terminator
    header_end: usize,
    /// Non-blank records after the header
    data_rows: usize,
}

/// `Ok(None)` when the body holds no record at all
fn split_header(body: &[u8]) -> csv::Result<Option<HeaderSplit>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut header = StringRecord::new();
    if !reader.read_record(&mut header)? {
        return Ok(None);
    }

    // The reader may stop between the '\r' and '\n' of a CRLF terminator
    let mut header_end = reader.position().byte() as usize;
    if header_end > 0
        && body.get(header_end - 1) == Some(&b'\r')
        && body.get(header_end) == Some(&b'\n')
    {
        header_end += 1;
    }

    let data_rows = reader.byte_records().filter(Result::is_ok).count();

    Ok(Some(HeaderSplit {
        header,
        header_end,
        data_rows,
    }))
}

/// Re-encode a header in place of `raw`, keeping the blank lines before it
/// and the terminator after it
fn encode_header(header: &StringRecord, raw: &[u8]) -> io::Result<Vec<u8>> {
    let leading = raw
        .iter()
        .take_while(|&&b| b == b'\r' || b == b'\n')
        .count();
    let trailing = raw[leading..]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\r' || b == b'\n')
        .count();

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    let mut encoded = writer.into_inner().map_err(|e| e.into_error())?;
    encoded.pop();

    let mut out = raw[..leading].to_vec();
    out.extend_from_slice(&encoded);
    out.extend_from_slice(&raw[raw.len() - trailing..]);
    Ok(out)
}

fn write_parts(path: &Path, parts: &[&[u8]]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for part in parts {
        writer.write_all(part)?;
    }
    writer.flush()
}
