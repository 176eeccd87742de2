use crate::Result;
use crate::records::FlatRecord;
use indexmap::IndexSet;
use ohno::IntoAppError;
use std::io::Write;

/// Write records as CSV.
///
/// The header holds every column seen in any record, in the order the columns are first
/// seen. Records lacking a column get an empty cell for it. Nothing is written for an
/// empty record set.
pub fn generate<W: Write>(records: &[FlatRecord], writer: W) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut columns = IndexSet::new();
    for record in records {
        columns.extend(record.columns());
    }

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&columns).into_app_err("writing CSV header")?;

    for record in records {
        writer
            .write_record(columns.iter().map(|column| record.get(column).map(ToString::to_string).unwrap_or_default()))
            .into_app_err("writing CSV row")?;
    }

    writer.flush().into_app_err("flushing CSV output")
}
