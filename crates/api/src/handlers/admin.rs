//! Staff-only endpoints: run scheduled jobs on demand and queue event
//! update/cancellation notices.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cityevents_core::catalog::EventStatus;
use cityevents_core::error::CoreError;
use cityevents_core::types::DbId;
use cityevents_db::repositories::EventRepo;
use cityevents_notify::Job;
use cityevents_worker::JobSummary;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `POST /admin/jobs/import`.
#[derive(Debug, Deserialize)]
pub struct ImportParams {
    /// KudaGo city code; defaults to `IMPORT_CITY`.
    pub city: Option<String>,
    pub limit: Option<usize>,
}

/// A job accepted onto the queue.
#[derive(Debug, Serialize)]
pub struct QueuedJob {
    pub job_type: String,
    pub event_id: DbId,
}

/// POST /api/v1/admin/jobs/reminders
pub async fn run_reminders(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<JobSummary>>> {
    tracing::info!(user_id = user.user_id, "Reminder run requested");
    let summary = state.runner.run_reminders().await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/admin/jobs/digest
pub async fn run_digest(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<JobSummary>>> {
    tracing::info!(user_id = user.user_id, "Digest run requested");
    let summary = state.runner.run_digest().await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/admin/jobs/import?city=spb&limit=20
pub async fn run_import(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
) -> AppResult<Json<DataResponse<JobSummary>>> {
    tracing::info!(user_id = user.user_id, city = ?params.city, "Import requested");
    let summary = state
        .runner
        .run_import(params.city.as_deref(), params.limit)
        .await;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/admin/events/{id}/notify-update
///
/// Queues an update notice for everyone who interacted with the event.
pub async fn notify_update(
    RequireStaff(_): RequireStaff,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<QueuedJob>>)> {
    EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    enqueue(&state, Job::NotifyEventUpdate { event_id }, event_id).await
}

/// POST /api/v1/admin/events/{id}/notify-cancelled
///
/// Marks the event cancelled and queues a cancellation notice.
pub async fn notify_cancelled(
    RequireStaff(_): RequireStaff,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<QueuedJob>>)> {
    EventRepo::set_status(&state.pool, event_id, EventStatus::Cancelled)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    enqueue(&state, Job::NotifyEventCancelled { event_id }, event_id).await
}

async fn enqueue(
    state: &AppState,
    job: Job,
    event_id: DbId,
) -> AppResult<(StatusCode, Json<DataResponse<QueuedJob>>)> {
    let (job_type, _) = job.to_parts()?;
    state.queue.enqueue(job).await?;

    tracing::info!(event_id, job_type = %job_type, "Event notice queued");
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: QueuedJob { job_type, event_id },
        }),
    ))
}
