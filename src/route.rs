use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(get_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/auth/auth", post(create_user))
        .route("/auth/token", post(login_for_access_token))
        .route("/", get(health_checker_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
