//! In-process report storage.
//!
//! Holds reports and comments in `Vec`s behind `tokio` read/write locks.
//! A lock is held only for the duration of a single call, never across an
//! await in the caller. The two locks are never held at the same time.

use aquawatch_database_models::{NewComment, NewReport, ReportFilter, ReportQuery};
use aquawatch_report_models::{Comment, Report, ReportId, ReportStatus};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::DbError;
use crate::store::ReportStore;

/// [`ReportStore`] backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    /// Insertion order.
    reports: RwLock<Vec<Report>>,
    /// Posting order.
    comments: RwLock<Vec<Comment>>,
}

impl MemoryReportStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `reports`.
    #[must_use]
    pub const fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            reports: RwLock::const_new(reports),
            comments: RwLock::const_new(Vec::new()),
        }
    }

    async fn modify(
        &self,
        id: &ReportId,
        apply: impl FnOnce(&mut Report) + Send,
    ) -> Option<Report> {
        let mut reports = self.reports.write().await;
        let report = reports.iter_mut().find(|r| &r.id == id)?;
        apply(report);
        report.updated_at = Utc::now();
        Some(report.clone())
    }

    async fn exists(&self, id: &ReportId) -> bool {
        self.reports.read().await.iter().any(|r| &r.id == id)
    }
}

/// Matching reports, newest first. Ties keep the most recently inserted
/// report first.
fn newest_first<'a>(reports: &'a [Report], filter: &ReportFilter) -> Vec<&'a Report> {
    let mut matching: Vec<&Report> = reports
        .iter()
        .rev()
        .filter(|r| filter.matches_report(r))
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn find(&self, query: &ReportQuery) -> Result<Vec<Report>, DbError> {
        let reports = self.reports.read().await;
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        Ok(newest_first(&reports, &query.filter)
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_all(&self, filter: &ReportFilter, max: usize) -> Result<Vec<Report>, DbError> {
        let reports = self.reports.read().await;
        let matching = newest_first(&reports, filter);
        if matching.len() > max {
            log::warn!(
                "Working set truncated to {max} of {} matching reports",
                matching.len()
            );
        }
        Ok(matching.into_iter().take(max).cloned().collect())
    }

    async fn count(&self, filter: &ReportFilter) -> Result<u64, DbError> {
        let reports = self.reports.read().await;
        Ok(reports.iter().filter(|r| filter.matches_report(r)).count() as u64)
    }

    async fn get(&self, id: &ReportId) -> Result<Option<Report>, DbError> {
        let reports = self.reports.read().await;
        Ok(reports.iter().find(|r| &r.id == id).cloned())
    }

    async fn insert(&self, report: NewReport) -> Result<Report, DbError> {
        report.validate()?;

        let now = Utc::now();
        let stored = Report {
            id: ReportId::new(uuid::Uuid::new_v4().to_string()),
            location: report.location,
            notes: report.notes,
            photos: report.photos,
            status: ReportStatus::Pending,
            reporter_id: report.reporter_id,
            assignee: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
        };

        self.reports.write().await.push(stored.clone());
        log::info!("Stored report {}", stored.id);

        Ok(stored)
    }

    async fn update_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<Option<Report>, DbError> {
        let updated = self.modify(id, |r| r.status = status).await;
        if updated.is_some() {
            log::info!("Report {id} status set to {status}");
        }
        Ok(updated)
    }

    async fn assign(&self, id: &ReportId, assignee: &str) -> Result<Option<Report>, DbError> {
        let assignee = assignee.trim();
        if assignee.is_empty() {
            return Err(DbError::Validation {
                message: "assignee must not be empty".to_string(),
            });
        }
        let assignee = assignee.to_string();
        Ok(self.modify(id, |r| r.assignee = Some(assignee)).await)
    }

    async fn resolve(
        &self,
        id: &ReportId,
        status: ReportStatus,
        resolution_notes: &str,
    ) -> Result<Option<Report>, DbError> {
        let notes = resolution_notes.to_string();
        let resolved = self
            .modify(id, |r| {
                r.status = status;
                r.resolution_notes = Some(notes);
            })
            .await;
        if resolved.is_some() {
            log::info!("Report {id} resolved as {status}");
        }
        Ok(resolved)
    }

    async fn add_comment(
        &self,
        report_id: &ReportId,
        comment: NewComment,
    ) -> Result<Option<Comment>, DbError> {
        let content = comment.content.trim();
        if content.is_empty() {
            return Err(DbError::Validation {
                message: "comment content must not be empty".to_string(),
            });
        }
        if !self.exists(report_id).await {
            return Ok(None);
        }

        let stored = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            report_id: report_id.clone(),
            author_id: comment.author_id.filter(|a| !a.trim().is_empty()),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.comments.write().await.push(stored.clone());
        log::info!("Stored comment {} on report {report_id}", stored.id);

        Ok(Some(stored))
    }

    async fn list_comments(&self, report_id: &ReportId) -> Result<Option<Vec<Comment>>, DbError> {
        if !self.exists(report_id).await {
            return Ok(None);
        }
        let comments = self.comments.read().await;
        Ok(Some(
            comments
                .iter()
                .filter(|c| &c.report_id == report_id)
                .cloned()
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use aquawatch_database_models::{PageCap, ReportFilterParams};
    use aquawatch_geography_models::GeoPoint;
    use chrono::{DateTime, TimeZone as _};

    use super::*;
    use crate::query::{build_report_filter, build_report_query};

    fn stored(id: &str, lng: f64, lat: f64, at: DateTime<Utc>, status: ReportStatus) -> Report {
        Report {
            id: ReportId::new(id),
            location: GeoPoint::new(lng, lat),
            notes: format!("note {id}"),
            photos: Vec::new(),
            status,
            reporter_id: None,
            assignee: None,
            resolution_notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, 10, 0, 0).unwrap()
    }

    fn seeded() -> MemoryReportStore {
        MemoryReportStore::with_reports(vec![
            stored("a", 36.80, -1.30, day(1), ReportStatus::Pending),
            stored("b", 36.81, -1.31, day(3), ReportStatus::Verified),
            stored("c", 30.00, 0.50, day(2), ReportStatus::Pending),
            stored("d", 36.82, -1.32, day(4), ReportStatus::Flagged),
        ])
    }

    fn ids(reports: &[Report]) -> Vec<&str> {
        reports.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn finds_pages_newest_first() {
        let store = seeded();
        let first = build_report_query(
            &ReportFilterParams {
                limit: Some(2),
                ..ReportFilterParams::default()
            },
            PageCap::Listing,
        )
        .unwrap();
        assert_eq!(ids(&store.find(&first).await.unwrap()), vec!["d", "b"]);

        let second = build_report_query(
            &ReportFilterParams {
                limit: Some(2),
                page: Some(2),
                ..ReportFilterParams::default()
            },
            PageCap::Listing,
        )
        .unwrap();
        assert_eq!(ids(&store.find(&second).await.unwrap()), vec!["c", "a"]);
    }

    #[tokio::test]
    async fn filters_and_counts() {
        let store = seeded();
        let filter = build_report_filter(&ReportFilterParams {
            bbox: Some("36.7,-1.4,36.9,-1.2".to_string()),
            ..ReportFilterParams::default()
        })
        .unwrap();
        assert_eq!(store.count(&filter).await.unwrap(), 3);

        let pending = build_report_filter(&ReportFilterParams {
            status: Some("pending".to_string()),
            ..ReportFilterParams::default()
        })
        .unwrap();
        let all_pending = store.find_all(&pending, 100).await.unwrap();
        assert_eq!(ids(&all_pending), vec!["c", "a"]);
    }

    #[tokio::test]
    async fn find_all_respects_max() {
        let store = seeded();
        let everything = store.find_all(&ReportFilter::default(), 3).await.unwrap();
        assert_eq!(ids(&everything), vec!["d", "b", "c"]);
    }

    #[tokio::test]
    async fn inserts_pending_reports() {
        let store = MemoryReportStore::new();
        let report = store
            .insert(NewReport {
                location: GeoPoint::new(36.8, -1.3),
                notes: "oily sheen".to_string(),
                photos: vec!["img-1".to_string()],
                reporter_id: Some("user-9".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert!(!report.id.as_str().is_empty());
        assert_eq!(store.get(&report.id).await.unwrap(), Some(report.clone()));
        assert_eq!(store.count(&ReportFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_location() {
        let store = MemoryReportStore::new();
        let result = store
            .insert(NewReport {
                location: GeoPoint::new(200.0, 0.0),
                notes: String::new(),
                photos: Vec::new(),
                reporter_id: None,
            })
            .await;
        assert!(matches!(result, Err(DbError::InvalidLocation(_))));
        assert_eq!(store.count(&ReportFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn updates_status_assignee_and_resolution() {
        let store = seeded();
        let id = ReportId::new("a");

        let updated = store
            .update_status(&id, ReportStatus::Flagged)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ReportStatus::Flagged);

        let assigned = store.assign(&id, "  lab-3 ").await.unwrap().unwrap();
        assert_eq!(assigned.assignee.as_deref(), Some("lab-3"));

        let resolved = store
            .resolve(&id, ReportStatus::Verified, "E. coli confirmed")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.status, ReportStatus::Verified);
        assert_eq!(resolved.resolution_notes.as_deref(), Some("E. coli confirmed"));
        assert!(resolved.updated_at > resolved.created_at);
    }

    #[tokio::test]
    async fn missing_ids_and_blank_assignee() {
        let store = seeded();
        let missing = ReportId::new("nope");
        assert!(store.get(&missing).await.unwrap().is_none());
        assert!(
            store
                .update_status(&missing, ReportStatus::Rejected)
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            store.assign(&ReportId::new("a"), "   ").await,
            Err(DbError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn comments_belong_to_existing_reports() {
        let store = seeded();
        let id = ReportId::new("b");

        let first = store
            .add_comment(
                &id,
                NewComment {
                    author_id: Some("lab-1".to_string()),
                    content: " sampled at the outlet ".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.content, "sampled at the outlet");
        assert_eq!(first.report_id, id);

        store
            .add_comment(
                &id,
                NewComment {
                    author_id: None,
                    content: "same smell upstream".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        let thread = store.list_comments(&id).await.unwrap().unwrap();
        let contents: Vec<&str> = thread.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["sampled at the outlet", "same smell upstream"]);
        assert!(
            store
                .list_comments(&ReportId::new("a"))
                .await
                .unwrap()
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn comments_on_missing_report_or_blank_content() {
        let store = seeded();
        let missing = ReportId::new("nope");
        let comment = NewComment {
            author_id: None,
            content: "hello".to_string(),
        };
        assert!(store.add_comment(&missing, comment).await.unwrap().is_none());
        assert!(store.list_comments(&missing).await.unwrap().is_none());

        let blank = NewComment {
            author_id: None,
            content: "   ".to_string(),
        };
        assert!(matches!(
            store.add_comment(&ReportId::new("a"), blank).await,
            Err(DbError::Validation { .. })
        ));
    }
}
