use crate::config::InputFormat;
use crate::domain::model::{FieldValue, Record};
use crate::utils::error::{ImportError, Result};
use std::io::Read;

/// Records in input order. Consumes the underlying reader exactly once.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

pub fn read_records<'a, R: Read + 'a>(format: InputFormat, input: R) -> Result<RecordStream<'a>> {
    match format {
        InputFormat::Csv => csv_records(input),
        InputFormat::Json => json_records(input),
    }
}

/// Header row names the fields; rows are parsed lazily, so a malformed row
/// surfaces only when the stream reaches it.
fn csv_records<'a, R: Read + 'a>(input: R) -> Result<RecordStream<'a>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .quote(b'"')
        .from_reader(input);
    let headers = reader.headers()?.clone();
    tracing::debug!("CSV headers: {:?}", headers);

    Ok(Box::new(reader.into_records().map(move |row| -> Result<Record> {
        let row = row?;
        Ok(headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.to_string(), FieldValue::from(value)))
            .collect())
    })))
}

/// The whole input must be one array of objects; it is checked before any record is yielded.
fn json_records<'a, R: Read + 'a>(input: R) -> Result<RecordStream<'a>> {
    let records: Vec<Record> = serde_json::from_reader(input)?;
    tracing::debug!("Parsed {} JSON records", records.len());
    Ok(Box::new(records.into_iter().map(Ok::<Record, ImportError>)))
}
