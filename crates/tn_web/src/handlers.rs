use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tn_core::{IngestReport, NewRecord, NewsFilter, NewsRecord};

use crate::{ApiError, AppState};

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "News Aggregator is running" }))
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<NewsFilter>,
) -> Result<Json<Vec<NewsRecord>>, ApiError> {
    Ok(Json(state.store.list(filter).await?))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<NewsRecord>, ApiError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[derive(Debug, Deserialize)]
pub struct CreateNews {
    pub title: String,
    pub content: String,
    pub source: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateNews>,
) -> Result<(StatusCode, Json<NewsRecord>), ApiError> {
    url::Url::parse(&body.url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

    if state.store.find_by_url(&body.url).await?.is_some() {
        return Err(ApiError::DuplicateUrl);
    }

    let record = state
        .store
        .insert(NewRecord {
            title: body.title,
            content: body.content,
            source: body.source,
            url: body.url,
            published_at: body.published_at.unwrap_or_else(Utc::now),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// On-demand trigger; runs the exact same pipeline the scheduler does.
pub async fn run_ingest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IngestReport>, ApiError> {
    Ok(Json(state.pipeline.run().await?))
}
