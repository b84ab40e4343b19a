//! CSV export of report listings.

use aquawatch_report_models::Report;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 11] = [
    "id",
    "createdAt",
    "updatedAt",
    "status",
    "lat",
    "lng",
    "notes",
    "photos",
    "reporterId",
    "assignee",
    "resolutionNotes",
];

/// Errors that can occur while writing CSV.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Record serialization failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Flushing the buffer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Renders `reports` as CSV with a header row. Photos are joined with `;`.
///
/// # Errors
///
/// Returns [`ExportError`] if the writer fails.
pub fn reports_to_csv(reports: &[Report]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for report in reports {
        writer.write_record([
            report.id.to_string(),
            report.created_at.to_rfc3339(),
            report.updated_at.to_rfc3339(),
            report.status.to_string(),
            report.location.latitude.to_string(),
            report.location.longitude.to_string(),
            report.notes.clone(),
            report.photos.join(";"),
            report.reporter_id.clone().unwrap_or_default(),
            report.assignee.clone().unwrap_or_default(),
            report.resolution_notes.clone().unwrap_or_default(),
        ])?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
