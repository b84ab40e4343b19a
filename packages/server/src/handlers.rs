//! HTTP handler functions for the aquawatch API.

use actix_web::{HttpResponse, http::header, web};
use aquawatch_analytics::{
    DayWindow, clamp_cell_size, compute_hotspots, find_duplicate_groups, status_counts,
};
use aquawatch_database::{DbError, build_report_filter, build_report_query};
use aquawatch_database_models::{NewComment, NewReport, PageCap, ReportFilter, ReportFilterParams};
use aquawatch_report_models::{ReportId, ReportStatus, ReportSummary};
use aquawatch_server_models::{
    ApiHealth, AssignRequest, ClusterQueryParams, ClustersResponse, CommentListResponse,
    CreateCommentRequest, CreateReportRequest, DuplicateQueryParams, DuplicatesResponse,
    FilterQueryParams, HotspotQueryParams, HotspotsResponse, ReportListResponse, ReportQueryParams,
    ResolveRequest, StatusUpdateRequest,
};
use aquawatch_spatial::{cluster_markers_for_zoom, singles};

use crate::AppState;
use crate::export::reports_to_csv;

/// Zoom assumed when the clusters request omits one.
pub const DEFAULT_ZOOM: f64 = 13.0;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/reports`
///
/// Paged listing, newest first.
pub async fn list_reports(
    state: web::Data<AppState>,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    let query = match build_report_query(&ReportFilterParams::from(&*params), PageCap::Listing) {
        Ok(query) => query,
        Err(e) => return bad_request(e),
    };

    let items = match state.store.find(&query).await {
        Ok(items) => items,
        Err(e) => return internal_error("Failed to query reports", &e),
    };
    let total = match state.store.count(&query.filter).await {
        Ok(total) => total,
        Err(e) => return internal_error("Failed to count reports", &e),
    };

    HttpResponse::Ok().json(ReportListResponse::new(
        items,
        query.page,
        total,
        query.limit,
    ))
}

/// `POST /api/reports`
pub async fn create_report(
    state: web::Data<AppState>,
    body: web::Json<CreateReportRequest>,
) -> HttpResponse {
    let new_report = match NewReport::try_from(body.into_inner()) {
        Ok(report) => report,
        Err(e) => return bad_request(e),
    };

    match state.store.insert(new_report).await {
        Ok(report) => HttpResponse::Created().json(report),
        Err(e) => store_error("Failed to create report", &e),
    }
}

/// `GET /api/reports/{id}`
pub async fn get_report(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = ReportId::new(path.into_inner());
    match state.store.get(&id).await {
        Ok(Some(report)) => HttpResponse::Ok().json(report),
        Ok(None) => not_found(&id),
        Err(e) => internal_error("Failed to load report", &e),
    }
}

/// `PATCH /api/reports/{id}/status`
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    let status = match ReportStatus::from_name(&body.status) {
        Ok(status) => status,
        Err(e) => return bad_request(e),
    };
    let id = ReportId::new(path.into_inner());

    match state.store.update_status(&id, status).await {
        Ok(Some(report)) => HttpResponse::Ok().json(report),
        Ok(None) => not_found(&id),
        Err(e) => store_error("Failed to update status", &e),
    }
}

/// `PATCH /api/reports/{id}/assign`
pub async fn assign_report(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AssignRequest>,
) -> HttpResponse {
    let id = ReportId::new(path.into_inner());

    match state.store.assign(&id, &body.assignee).await {
        Ok(Some(report)) => HttpResponse::Ok().json(report),
        Ok(None) => not_found(&id),
        Err(e) => store_error("Failed to assign report", &e),
    }
}

/// `PATCH /api/reports/{id}/resolve`
///
/// Status defaults to `verified` when the body omits it.
pub async fn resolve_report(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ResolveRequest>,
) -> HttpResponse {
    let status = match body.status.as_deref().map(ReportStatus::from_name) {
        None => ReportStatus::Verified,
        Some(Ok(status)) => status,
        Some(Err(e)) => return bad_request(e),
    };
    let id = ReportId::new(path.into_inner());

    match state
        .store
        .resolve(&id, status, &body.resolution_notes)
        .await
    {
        Ok(Some(report)) => HttpResponse::Ok().json(report),
        Ok(None) => not_found(&id),
        Err(e) => store_error("Failed to resolve report", &e),
    }
}

/// `GET /api/reports/clusters`
///
/// Map markers for the requested zoom. Cell size follows the configured
/// zoom policy; `cluster=false` skips grouping.
pub async fn clusters(
    state: web::Data<AppState>,
    params: web::Query<ClusterQueryParams>,
) -> HttpResponse {
    let reports = match working_set(&state, &ReportFilterParams::from(&*params)).await {
        Ok(reports) => reports,
        Err(response) => return response,
    };

    let zoom = params.zoom.unwrap_or(DEFAULT_ZOOM);
    let (items, cell_size) = if params.cluster == Some(false) {
        (singles(&reports), state.zoom_policy.cell_size_for(zoom))
    } else {
        cluster_markers_for_zoom(&reports, &state.zoom_policy, zoom)
    };

    HttpResponse::Ok().json(ClustersResponse { cell_size, items })
}

/// `GET /api/reports/duplicates`
///
/// Groups likely re-reports. With a `day`, the store query is narrowed to
/// that day before the working set is capped. Reports are seeded oldest
/// first so the earliest report of an incident heads its group.
pub async fn duplicates(
    state: web::Data<AppState>,
    params: web::Query<DuplicateQueryParams>,
) -> HttpResponse {
    let mut filter = match build_report_filter(&ReportFilterParams::from(&*params)) {
        Ok(filter) => filter,
        Err(e) => return bad_request(e),
    };
    if let Some(day) = params.day {
        let window = DayWindow::new(day, state.duplicates.offset());
        filter = filter.within(window.start, window.last);
    }

    let mut reports = match fetch_working_set(&state, &filter).await {
        Ok(reports) => reports,
        Err(response) => return response,
    };
    reports.sort_by_key(|r| r.created_at);

    let groups = find_duplicate_groups(&reports, params.day, &state.duplicates);

    HttpResponse::Ok().json(DuplicatesResponse {
        day: params.day,
        radius_meters: state.duplicates.radius_meters(),
        groups,
    })
}

/// `GET /api/reports/{id}/comments`
pub async fn list_comments(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = ReportId::new(path.into_inner());
    match state.store.list_comments(&id).await {
        Ok(Some(items)) => HttpResponse::Ok().json(CommentListResponse { items }),
        Ok(None) => not_found(&id),
        Err(e) => internal_error("Failed to load comments", &e),
    }
}

/// `POST /api/reports/{id}/comments`
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> HttpResponse {
    let id = ReportId::new(path.into_inner());

    match state
        .store
        .add_comment(&id, NewComment::from(body.into_inner()))
        .await
    {
        Ok(Some(comment)) => HttpResponse::Created().json(comment),
        Ok(None) => not_found(&id),
        Err(e) => store_error("Failed to add comment", &e),
    }
}

/// `GET /api/reports.csv`
pub async fn export_csv(
    state: web::Data<AppState>,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    let query = match build_report_query(&ReportFilterParams::from(&*params), PageCap::Export) {
        Ok(query) => query,
        Err(e) => return bad_request(e),
    };

    let reports = match state.store.find(&query).await {
        Ok(reports) => reports,
        Err(e) => return internal_error("Failed to query reports", &e),
    };

    match reports_to_csv(&reports) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reports.csv\"",
            ))
            .body(body),
        Err(e) => {
            log::error!("Failed to write CSV export: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to export reports"
            }))
        }
    }
}

/// `GET /api/analytics/hotspots`
pub async fn hotspots(
    state: web::Data<AppState>,
    params: web::Query<HotspotQueryParams>,
) -> HttpResponse {
    let reports = match working_set(&state, &ReportFilterParams::from(&*params)).await {
        Ok(reports) => reports,
        Err(response) => return response,
    };

    let cell_size = clamp_cell_size(
        params
            .cell_size
            .unwrap_or(state.analytics.default_cell_size),
    );
    let cells = compute_hotspots(&reports, cell_size);

    HttpResponse::Ok().json(HotspotsResponse { cell_size, cells })
}

/// `GET /api/analytics/kpis`
pub async fn kpis(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    match working_set(&state, &ReportFilterParams::from(&*params)).await {
        Ok(reports) => HttpResponse::Ok().json(status_counts(&reports)),
        Err(response) => response,
    }
}

/// Fetches the capped analytics working set for `params`.
async fn working_set(
    state: &AppState,
    params: &ReportFilterParams,
) -> Result<Vec<ReportSummary>, HttpResponse> {
    let filter = build_report_filter(params).map_err(bad_request)?;
    fetch_working_set(state, &filter).await
}

async fn fetch_working_set(
    state: &AppState,
    filter: &ReportFilter,
) -> Result<Vec<ReportSummary>, HttpResponse> {
    state
        .store
        .find_all(filter, state.analytics.max_working_set)
        .await
        .map(|reports| reports.iter().map(ReportSummary::from).collect())
        .map_err(|e| internal_error("Failed to query reports", &e))
}

/// Rejects undecodable query strings and JSON bodies with the same
/// `{ "error": ... }` shape as every other 400.
pub fn extractor_error(err: impl Into<actix_web::Error> + std::fmt::Display) -> actix_web::Error {
    let response = bad_request(&err);
    actix_web::error::InternalError::from_response(err.into(), response).into()
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": e.to_string()
    }))
}

fn not_found(id: &ReportId) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Report {id} not found")
    }))
}

fn internal_error(context: &str, e: &DbError) -> HttpResponse {
    log::error!("{context}: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": context
    }))
}

/// Validation failures are the caller's fault; anything else is ours.
fn store_error(context: &str, e: &DbError) -> HttpResponse {
    match e {
        DbError::InvalidLocation(_) | DbError::Validation { .. } => bad_request(e),
        _ => internal_error(context, e),
    }
}
