use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::presentation::handlers;
use crate::services::repository::RepositoryService;

/// 应用状态
pub struct AppContext {
    pub repository_service: Arc<RepositoryService>,
}

/// 创建应用路由
pub fn create_app_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// API 路由
fn api_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route(
            "/repos",
            get(handlers::repository::api_list_repositories)
                .post(handlers::repository::api_create_repository),
        )
        .route(
            "/repos/{host}/{owner}/{name}",
            get(handlers::repository::api_get_repository)
                .patch(handlers::repository::api_update_repository)
                .delete(handlers::repository::api_delete_repository),
        )
        .route(
            "/repos/{host}/{owner}/{name}/key",
            get(handlers::repository::api_get_public_key),
        )
}
