use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::filters::JobFilter;
use crate::jobs::repository::{self, JobStats};
use crate::models::job::JobRow;
use crate::state::AppState;

const RELATED_LIMIT: i64 = 6;

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Serialize)]
pub struct JobDetailResponse {
    pub job: JobRow,
    pub related: Vec<JobRow>,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct SaveJobRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
}

#[derive(Serialize)]
pub struct SaveJobResponse {
    pub job_id: Uuid,
    pub saved: bool,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<JobListResponse>, AppError> {
    filter.validate()?;
    let (jobs, total) = repository::list_jobs(&state.db, &filter).await?;
    Ok(Json(JobListResponse {
        jobs,
        total,
        page: filter.page(),
        per_page: filter.per_page(),
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = repository::get_job(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    let related = repository::related_jobs(&state.db, &job, RELATED_LIMIT).await?;
    Ok(Json(JobDetailResponse { job, related }))
}

/// GET /api/v1/jobs/stats
pub async fn handle_job_stats(
    State(state): State<AppState>,
) -> Result<Json<JobStats>, AppError> {
    Ok(Json(repository::job_stats(&state.db).await?))
}

/// GET /api/v1/saved-jobs
pub async fn handle_list_saved_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = repository::list_saved_jobs(&state.db, params.user_id).await?;
    Ok(Json(jobs))
}

/// POST /api/v1/saved-jobs
pub async fn handle_save_job(
    State(state): State<AppState>,
    Json(req): Json<SaveJobRequest>,
) -> Result<(StatusCode, Json<SaveJobResponse>), AppError> {
    if repository::get_job(&state.db, req.job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", req.job_id)));
    }

    let created = repository::save_job(&state.db, req.user_id, req.job_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(SaveJobResponse {
            job_id: req.job_id,
            saved: true,
        }),
    ))
}

/// DELETE /api/v1/saved-jobs/:job_id
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if repository::unsave_job(&state.db, params.user_id, job_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Job {job_id} is not saved")))
    }
}
