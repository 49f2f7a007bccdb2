use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::jobs::repository;
use crate::models::job::JobRow;
use crate::seo::cache::{cache_get, cache_set, landing_key, PAGE_TTL_SECS, SITEMAP_KEY};
use crate::seo::landing::{all_landing_pages, resolve_landing};
use crate::seo::sitemap::build_sitemap;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct LandingResponse {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub jobs: Vec<JobRow>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// GET /api/v1/landing/:dimension/:value
pub async fn handle_landing(
    State(state): State<AppState>,
    Path((dimension, value)): Path<(String, String)>,
    Query(params): Query<PageQuery>,
) -> Result<Json<LandingResponse>, AppError> {
    let landing = resolve_landing(&dimension, &value).ok_or_else(|| {
        AppError::NotFound(format!("No landing page for {dimension}/{value}"))
    })?;

    let mut filter = landing.filter.clone();
    filter.page = params.page;
    let key = landing_key(&landing.slug, filter.page());

    if let Some(key) = &key {
        if let Some(cached) = cache_get(&state.redis, key).await {
            if let Ok(response) = serde_json::from_str::<LandingResponse>(&cached) {
                debug!("Landing cache hit: {key}");
                return Ok(Json(response));
            }
        }
    }

    let (jobs, total) = repository::list_jobs(&state.db, &filter).await?;
    let response = LandingResponse {
        slug: landing.slug,
        title: landing.title,
        description: landing.description,
        jobs,
        total,
        page: filter.page(),
        per_page: filter.per_page(),
    };

    if let (Some(key), Ok(serialized)) = (&key, serde_json::to_string(&response)) {
        cache_set(&state.redis, key, &serialized, PAGE_TTL_SECS).await;
    }
    Ok(Json(response))
}

/// GET /sitemap.xml
pub async fn handle_sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let xml = match cache_get(&state.redis, SITEMAP_KEY).await {
        Some(xml) => xml,
        None => {
            let xml = build_sitemap(&state.db, &state.config.site_url, &all_landing_pages()).await?;
            cache_set(&state.redis, SITEMAP_KEY, &xml, PAGE_TTL_SECS).await;
            xml
        }
    };

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}
