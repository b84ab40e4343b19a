//! Translation of raw filter input into validated report queries.
//!
//! Pure validation, no I/O. An unknown status is the only hard failure.
//! A bad bounding box is dropped (the query runs without a spatial filter)
//! and out-of-range paging values are clamped.

use aquawatch_database_models::{PageCap, ReportFilter, ReportFilterParams, ReportQuery};
use aquawatch_geography_models::parse_bbox;
use aquawatch_report_models::{InvalidStatusError, ReportStatus};

/// Errors that reject a query outright.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The status filter is not a known status.
    #[error("{0}")]
    InvalidStatusFilter(#[from] InvalidStatusError),
}

/// Validates the filter part of `params`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidStatusFilter`] if `status` is present and
/// not a known status.
pub fn build_report_filter(params: &ReportFilterParams) -> Result<ReportFilter, QueryError> {
    let status = params
        .status
        .as_deref()
        .map(ReportStatus::from_name)
        .transpose()?;

    let bbox = params.bbox.as_deref().and_then(|raw| {
        parse_bbox(raw)
            .inspect_err(|e| log::debug!("Ignoring bbox filter {raw:?}: {e}"))
            .ok()
    });

    Ok(ReportFilter {
        status,
        from: params.from,
        to: params.to,
        bbox,
    })
}

/// Validates `params` into a paged [`ReportQuery`] using the page size
/// policy `cap`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidStatusFilter`] if `status` is present and
/// not a known status.
pub fn build_report_query(
    params: &ReportFilterParams,
    cap: PageCap,
) -> Result<ReportQuery, QueryError> {
    let filter = build_report_filter(params)?;
    let limit = clamp_limit(params.limit, cap);
    let page = clamp_page(params.page);

    Ok(ReportQuery {
        filter,
        skip: (page - 1).saturating_mul(limit),
        limit,
        page,
    })
}

/// Clamps a requested page size into `1..=cap.max_limit()`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn clamp_limit(limit: Option<i64>, cap: PageCap) -> u64 {
    limit
        .unwrap_or_else(|| cap.default_limit())
        .clamp(1, cap.max_limit()) as u64
}

/// Clamps a requested page number to at least 1.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn clamp_page(page: Option<i64>) -> u64 {
    page.unwrap_or(1).max(1) as u64
}
