use seq_io::fasta::{Reader, Record};
use std::collections::HashMap;
use std::io::{BufReader, Read};

use crate::constants::{COL_ALLELE_ALT, COL_ALLELE_REF, COL_COORDINATE, COL_ID, COL_SEQUENCE};
use crate::error::ProbeError;
use crate::probe::ProbeRecord;

/// Sequences keyed by FASTA id, uppercased.
pub type SequenceSource = HashMap<String, String>;

pub fn read_fasta<R: Read>(src: R) -> Result<SequenceSource, ProbeError> {
    let mut reader = Reader::new(BufReader::new(src));
    let mut sequences = HashMap::new();

    while let Some(result) = reader.next() {
        let record = result?;
        let name = String::from_utf8_lossy(record.id_bytes()).to_string();
        let sequence = String::from_utf8_lossy(&record.full_seq()).to_uppercase();
        sequences.insert(name, sequence);
    }
    Ok(sequences)
}

struct Columns {
    id: Option<usize>,
    sequence: Option<usize>,
    coordinate: Option<usize>,
    allele_ref: Option<usize>,
    allele_alt: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Columns {
            id: find(COL_ID),
            sequence: find(COL_SEQUENCE),
            coordinate: find(COL_COORDINATE),
            allele_ref: find(COL_ALLELE_REF),
            allele_alt: find(COL_ALLELE_ALT),
        }
    }
}

fn cell(row: &csv::StringRecord, column: Option<usize>) -> &str {
    column.and_then(|idx| row.get(idx)).map(str::trim).unwrap_or("")
}

fn parse_coordinate(label: &str, raw: &str) -> Result<i64, ProbeError> {
    if raw.is_empty() {
        return Err(ProbeError::MissingField {
            record: label.to_string(),
            field: COL_COORDINATE,
        });
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }
    // spreadsheets export integer columns as "10.0"
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(ProbeError::InvalidCoordinate {
            record: label.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_allele(label: &str, field: &'static str, raw: &str) -> Result<char, ProbeError> {
    let normalized = raw.to_uppercase();
    let mut chars = normalized.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(ProbeError::MissingField {
            record: label.to_string(),
            field,
        }),
        (Some(base), None) => Ok(base),
        _ => Err(ProbeError::InvalidAllele {
            record: label.to_string(),
            field,
            value: raw.to_string(),
        }),
    }
}

/// Undecodable bytes fail only their own row, named by its ID when readable.
fn decode_row(
    row_no: usize,
    row: csv::ByteRecord,
    columns: &Columns,
) -> Result<csv::StringRecord, ProbeError> {
    let label = columns
        .id
        .and_then(|idx| row.get(idx))
        .and_then(|id| std::str::from_utf8(id).ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("row {}", row_no));
    csv::StringRecord::from_byte_record(row).map_err(|e| ProbeError::InvalidUtf8 {
        record: label,
        field: e.utf8_error().field(),
    })
}

fn parse_row(
    row_no: usize,
    row: &csv::StringRecord,
    columns: &Columns,
    fasta: Option<&SequenceSource>,
) -> Result<ProbeRecord, ProbeError> {
    let id = cell(row, columns.id);
    if id.is_empty() {
        return Err(ProbeError::MissingField {
            record: format!("row {}", row_no),
            field: COL_ID,
        });
    }

    let mut sequence: String = cell(row, columns.sequence)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if sequence.is_empty() {
        sequence = match fasta {
            Some(source) => source
                .get(id)
                .cloned()
                .ok_or_else(|| ProbeError::SequenceNotFound {
                    record: id.to_string(),
                })?,
            None => {
                return Err(ProbeError::MissingField {
                    record: id.to_string(),
                    field: COL_SEQUENCE,
                });
            }
        };
    }

    let coordinate = parse_coordinate(id, cell(row, columns.coordinate))?;
    let allele_ref = parse_allele(id, COL_ALLELE_REF, cell(row, columns.allele_ref))?;
    let allele_alt = parse_allele(id, COL_ALLELE_ALT, cell(row, columns.allele_alt))?;

    Ok(ProbeRecord::new(id, &sequence, coordinate, allele_ref, allele_alt))
}

/// Parse a delimited probe table. Problems confined to one row come back as
/// that row's error; only an unreadable table fails the whole call.
pub fn read_probe_records<R: Read>(
    src: R,
    delimiter: u8,
    fasta: Option<&SequenceSource>,
) -> Result<Vec<Result<ProbeRecord, ProbeError>>, ProbeError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(src);
    let columns = Columns::from_headers(reader.headers()?);

    let mut records = Vec::new();
    for (idx, row) in reader.byte_records().enumerate() {
        let row = row?;
        // header is row 1
        let row_no = idx + 2;
        let record = decode_row(row_no, row, &columns)
            .and_then(|row| parse_row(row_no, &row, &columns, fasta));
        records.push(record);
    }
    log::debug!("read {} probe rows", records.len());
    Ok(records)
}
