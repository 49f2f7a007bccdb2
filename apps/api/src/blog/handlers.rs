use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::filters::MAX_PAGE;
use crate::models::blog::{BlogPostRow, BlogPostSummary};
use crate::state::AppState;

const POSTS_PER_PAGE: i64 = 12;

#[derive(Deserialize)]
pub struct BlogListQuery {
    pub page: Option<i64>,
}

#[derive(Serialize)]
pub struct BlogListResponse {
    pub posts: Vec<BlogPostSummary>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// GET /api/v1/blog
pub async fn handle_list_posts(
    State(state): State<AppState>,
    Query(params): Query<BlogListQuery>,
) -> Result<Json<BlogListResponse>, AppError> {
    let page = params.page.unwrap_or(1).clamp(1, MAX_PAGE);

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts")
        .fetch_one(&state.db)
        .await?;
    let posts = sqlx::query_as::<_, BlogPostSummary>(
        r#"
        SELECT slug, title, excerpt, tags, reading_minutes, published_at
        FROM blog_posts
        ORDER BY published_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(POSTS_PER_PAGE)
    .bind((page - 1) * POSTS_PER_PAGE)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(BlogListResponse {
        posts,
        total,
        page,
        per_page: POSTS_PER_PAGE,
    }))
}

/// GET /api/v1/blog/:slug
pub async fn handle_get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostRow>, AppError> {
    let post = sqlx::query_as::<_, BlogPostRow>("SELECT * FROM blog_posts WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))?;
    Ok(Json(post))
}
