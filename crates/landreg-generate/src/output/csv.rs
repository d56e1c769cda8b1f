use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use landreg_core::{Application, TypeCatalog};

use crate::errors::GenerationError;

pub const CSV_HEADER: [&str; 13] = [
    "reference",
    "application_type_id",
    "application_type",
    "property_address",
    "applicants",
    "submission_date",
    "expected_completion_date",
    "status",
    "priority",
    "form_used",
    "lender",
    "loan_amount",
    "reason_for_correction",
];

/// Write a batch as CSV with a fixed header. Returns bytes written.
///
/// Applicants are joined with `"; "`; absent optional fields are empty cells.
pub fn write_batch_csv(
    path: &Path,
    catalog: &TypeCatalog,
    applications: &[Application],
) -> Result<u64, GenerationError> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(CSV_HEADER)?;
    for application in applications {
        let type_name = catalog
            .lookup_by_id(application.application_type_id)
            .map(|definition| definition.name.clone())?;
        writer.write_record([
            application.reference.clone(),
            application.application_type_id.to_string(),
            type_name,
            application.property_address.clone(),
            application.applicants.join("; "),
            application.submission_date.to_string(),
            application.expected_completion_date.to_string(),
            application.status.as_str().to_string(),
            application.priority.to_string(),
            application.form_used.clone(),
            application.lender.clone().unwrap_or_default(),
            application
                .loan_amount
                .map(|amount| amount.to_string())
                .unwrap_or_default(),
            application.reason_for_correction.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    let counting = writer
        .into_inner()
        .map_err(|err| GenerationError::Io(err.into_error()))?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
