//! Agriculture news route.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::news::{Article, DEFAULT_QUERY};
use crate::state::AppState;

/// Query parameters for the news feed.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Search query; defaults to agriculture news.
    pub q: Option<String>,
    /// One-based page number.
    pub page: Option<u32>,
}

/// One page of articles.
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub page: u32,
}

/// Fetch agriculture news, proxied and cached.
///
/// GET /api/news?q=&page=
///
/// # Errors
///
/// Returns 502 if the provider is unavailable.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsResponse>> {
    let q = query.q.as_deref().unwrap_or(DEFAULT_QUERY);
    let page = query.page.unwrap_or(1).max(1);

    let news = state.news().fetch(q, page).await?;

    Ok(Json(NewsResponse {
        articles: news.articles.clone(),
        total_results: news.total_results,
        page,
    }))
}
