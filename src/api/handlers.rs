use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::debug;

use crate::api::AppState;
use crate::article::{ArticleDetail, ArticleSummary};
use crate::error::RestError;
use crate::session::ClientSession;

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Listing is not metered.
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleSummary>>, RestError> {
    let articles = state.articles.list().await?;

    Ok(Json(articles.iter().map(ArticleSummary::from).collect()))
}

pub async fn show_article(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    session: ClientSession,
) -> Result<Json<ArticleDetail>, RestError> {
    let (decision, remaining) = {
        let mut session_state = session.handle.lock().await;
        let decision = state.quota.consume(&mut session_state);
        (decision, session_state.pageviews_remaining)
    };

    debug!(
        "Session {} requested article {}: {:?}, {:?} left",
        session.id, id, decision, remaining
    );
    decision.into_result()?;

    let article = state.articles.get(id).await?;

    Ok(Json(article.into()))
}
