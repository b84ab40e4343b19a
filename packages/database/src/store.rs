//! Storage interface for reports.

use aquawatch_database_models::{NewComment, NewReport, ReportFilter, ReportQuery};
use aquawatch_report_models::{Comment, Report, ReportId, ReportStatus};
use async_trait::async_trait;

use crate::DbError;

/// Report persistence as seen by request handlers.
///
/// Read methods return reports newest first. Mutations and comment
/// methods return `Ok(None)` when no report has the given id.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Returns one page of reports matching `query.filter`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn find(&self, query: &ReportQuery) -> Result<Vec<Report>, DbError>;

    /// Returns up to `max` reports matching `filter`, unpaged.
    ///
    /// Used to fetch the working set for analytics.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn find_all(&self, filter: &ReportFilter, max: usize) -> Result<Vec<Report>, DbError>;

    /// Counts reports matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn count(&self, filter: &ReportFilter) -> Result<u64, DbError>;

    /// Looks up a single report.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn get(&self, id: &ReportId) -> Result<Option<Report>, DbError>;

    /// Stores a new `pending` report and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidLocation`] for out-of-range coordinates, or
    /// another [`DbError`] if the backend fails.
    async fn insert(&self, report: NewReport) -> Result<Report, DbError>;

    /// Sets a report's status.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn update_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<Option<Report>, DbError>;

    /// Assigns a report to a reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if `assignee` is blank, or another
    /// [`DbError`] if the backend fails.
    async fn assign(&self, id: &ReportId, assignee: &str) -> Result<Option<Report>, DbError>;

    /// Closes out a report with a final status and resolution notes.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn resolve(
        &self,
        id: &ReportId,
        status: ReportStatus,
        resolution_notes: &str,
    ) -> Result<Option<Report>, DbError>;

    /// Adds a comment to a report.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the content is blank, or another
    /// [`DbError`] if the backend fails.
    async fn add_comment(
        &self,
        report_id: &ReportId,
        comment: NewComment,
    ) -> Result<Option<Comment>, DbError>;

    /// Returns a report's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    async fn list_comments(&self, report_id: &ReportId) -> Result<Option<Vec<Comment>>, DbError>;
}
