pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::article::ArticleStore;
use crate::quota::PageviewQuota;
use crate::session::{session_layer, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<dyn ArticleStore>,
    pub quota: PageviewQuota,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        quota: PageviewQuota,
        sessions: SessionStore,
    ) -> Self {
        Self {
            articles,
            quota,
            sessions,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let articles = Router::new()
        .route("/articles", get(handlers::list_articles))
        .route("/articles/{id}", get(handlers::show_article))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session_layer,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(articles)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
