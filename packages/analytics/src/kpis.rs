//! Status totals for dashboard KPIs.

use aquawatch_analytics_models::StatusCounts;
use aquawatch_report_models::ReportSummary;

/// Tallies `reports` by status.
#[must_use]
pub fn status_counts<'a>(reports: impl IntoIterator<Item = &'a ReportSummary>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for report in reports {
        counts.record(report.status);
    }
    counts
}
