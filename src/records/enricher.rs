use super::{Cell, FlatRecord};
use crate::Result;
use crate::diagnostics::{Event, Observer};
use crate::metadata::{Field, FieldError, flatten};
use ohno::bail;
use serde_json::Value;
use std::sync::Arc;

pub const DOWNLOAD_COUNT_COLUMN: &str = "downloadCount";
pub const CONTENT_SIZE_COLUMN: &str = "contentSize (MB)";
pub const DATAVERSE_COLUMN: &str = "dataverse";

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

const DATA: &str = "data";
const LATEST_VERSION: &str = "latestVersion";
const METADATA_BLOCKS: &str = "metadataBlocks";
const FILES: &str = "files";

/// Builds a [`FlatRecord`] from a raw dataset document.
pub struct RecordEnricher {
    observer: Arc<dyn Observer>,
}

impl core::fmt::Debug for RecordEnricher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordEnricher")
            .field("observer", &"<dyn Observer>")
            .finish()
    }
}

impl RecordEnricher {
    #[must_use]
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    /// Flatten a raw dataset document into a record.
    ///
    /// The attributes of the document's `data` payload are copied as they are, except
    /// for `latestVersion`: its own attributes are lifted next to them (without replacing
    /// any) and every field of every metadata block becomes one column named after the
    /// field's `typeName`. When two blocks define the same `typeName` the later block wins.
    /// Finally the download count, the total content size in binary megabytes and the
    /// alias of the owning dataverse are added.
    ///
    /// Returns `Ok(None)` when the document has no `data` payload.
    ///
    /// # Errors
    ///
    /// Fails when a metadata field has a malformed shape. A field with an unrecognized
    /// `typeClass` does not fail the record: it is reported to the observer and stored as
    /// an empty value.
    pub fn enrich(
        &self,
        raw_member: &Value,
        container_alias: &str,
        download_count: u64,
        file_sizes: &[u64],
    ) -> Result<Option<FlatRecord>, FieldError> {
        let Some(data) = raw_member.get(DATA).and_then(Value::as_object) else {
            return Ok(None);
        };

        let mut record = FlatRecord::default();
        for (key, value) in data {
            if key != LATEST_VERSION {
                record.insert(key.as_str(), Cell::from(value));
            }
        }

        if let Some(latest_version) = data.get(LATEST_VERSION).and_then(Value::as_object) {
            for (key, value) in latest_version {
                if key != METADATA_BLOCKS && key != FILES {
                    record.insert_if_absent(key.as_str(), Cell::from(value));
                }
            }

            let member_id = data.get("id").map(Cell::from).unwrap_or(Cell::Empty).to_string();
            let fields = latest_version
                .get(METADATA_BLOCKS)
                .and_then(Value::as_object)
                .into_iter()
                .flat_map(|blocks| blocks.values())
                .filter_map(|block| block.get("fields").and_then(Value::as_array))
                .flatten();

            for raw_field in fields {
                match Field::from_json(raw_field) {
                    Ok(field) => record.insert(field.type_name(), Cell::Text(flatten(&field))),
                    Err(FieldError::UnrecognizedTypeClass { type_name, type_class }) => {
                        self.observer.on_event(&Event::FieldUnrecognized {
                            member: &member_id,
                            type_name: &type_name,
                            type_class: &type_class,
                        });
                        record.insert(type_name, Cell::Text(String::new()));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        record.insert(DOWNLOAD_COUNT_COLUMN, Cell::Unsigned(download_count));
        record.insert(CONTENT_SIZE_COLUMN, Cell::Float(content_size_mb(file_sizes)));
        record.insert(DATAVERSE_COLUMN, Cell::from(container_alias));

        Ok(Some(record))
    }
}

#[expect(clippy::cast_precision_loss, reason = "content sizes are reported as approximate megabytes")]
fn content_size_mb(file_sizes: &[u64]) -> f64 {
    file_sizes.iter().fold(0_u64, |total, size| total.saturating_add(*size)) as f64 / BYTES_PER_MEGABYTE
}

/// Extract the byte size of every file of a raw dataset document.
///
/// Files are read from `data.latestVersion.files`, or from `data.files` when the
/// version block has none. Entries without a `dataFile.filesize` are ignored.
///
/// # Errors
///
/// Fails when a `filesize` is neither a non-negative integer nor a string holding one.
pub fn file_sizes(raw_member: &Value) -> Result<Vec<u64>> {
    let Some(data) = raw_member.get(DATA) else {
        return Ok(Vec::new());
    };

    let files = data
        .get(LATEST_VERSION)
        .and_then(|latest_version| latest_version.get(FILES))
        .or_else(|| data.get(FILES))
        .and_then(Value::as_array);

    let mut sizes = Vec::new();
    for file in files.into_iter().flatten() {
        let Some(filesize) = file.get("dataFile").and_then(|data_file| data_file.get("filesize")) else {
            continue;
        };

        let size = match filesize {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };

        match size {
            Some(size) => sizes.push(size),
            None => bail!("invalid file size '{filesize}'"),
        }
    }

    Ok(sizes)
}
