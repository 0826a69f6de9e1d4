use crate::wizard::StoredSubmission;

const HEADER: [&str; 6] = [
    "id",
    "vendor_name",
    "vendor_email",
    "service_name",
    "status",
    "submitted_at",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render submissions as CSV for the download endpoint. Form payloads are left out.
pub fn submissions_csv(records: &[StoredSubmission]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for record in records {
        let submission = &record.submission;
        let submitted_at = submission.submitted_at.to_rfc3339();
        writer.write_record([
            record.id.0.as_str(),
            submission.vendor_name.as_str(),
            submission.vendor_email.as_str(),
            submission.service_name.as_str(),
            submission.status.label(),
            submitted_at.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
