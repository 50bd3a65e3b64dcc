use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Form, Json,
};
use validator::Validate;

use crate::{
    credential_store,
    error::AppError,
    model::CurrentUser,
    schema::{CreateUserSchema, LoginSchema, TodoSchema, TokenResponse, UserResponse},
    todo_store, AppState,
};

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Todo API with Rust, SQLX, SQLite, and Axum";

    let json_response = serde_json::json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

// Handler for registering a new user
pub async fn create_user(
    State(data): State<Arc<AppState>>,
    Json(body): Json<CreateUserSchema>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()?;

    let mut tx = data.db.begin().await?;
    let user = credential_store::create(&mut tx, &data.hasher, &body).await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %user.username, "registered user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// Handler exchanging form-encoded credentials for a bearer token
pub async fn login_for_access_token(
    State(data): State<Arc<AppState>>,
    Form(body): Form<LoginSchema>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = data.db.begin().await?;
    let user =
        credential_store::authenticate(&mut tx, &data.hasher, &body.username, &body.password).await?;
    tx.commit().await?;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::info!(username = %body.username, "rejected login");
            return Err(AppError::Unauthenticated);
        }
    };

    let access_token = data.tokens.issue(&user.username, user.id)?;
    tracing::debug!(user_id = user.id, "issued access token");

    Ok(Json(TokenResponse::bearer(access_token)))
}

// Handler for getting the caller's Todo items
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = data.db.begin().await?;
    let todos = todo_store::list_for_owner(&mut tx, user.user_id).await?;
    tx.commit().await?;

    Ok(Json(todos))
}

// Handler for getting one of the caller's Todo items
pub async fn get_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let id = positive_id(id)?;

    let mut tx = data.db.begin().await?;
    let todo = todo_store::get_for_owner(&mut tx, id, user.user_id).await?;
    tx.commit().await?;

    Ok(Json(todo))
}

// Handler for creating a new Todo owned by the caller
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<TodoSchema>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = data.db.begin().await?;
    let todo = todo_store::create(&mut tx, &body, user.user_id).await?;
    tx.commit().await?;

    tracing::info!(todo_id = todo.id, owner_id = todo.owner_id, "created todo");

    Ok((StatusCode::CREATED, Json(todo)))
}

// Handler for updating a Todo by ID; the caller is authenticated but not matched to the owner
pub async fn update_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<TodoSchema>,
) -> Result<impl IntoResponse, AppError> {
    let id = positive_id(id)?;

    let mut tx = data.db.begin().await?;
    let todo = todo_store::update(&mut tx, id, &body).await?;
    tx.commit().await?;

    tracing::info!(todo_id = todo.id, caller_id = user.user_id, "updated todo");

    Ok(Json(todo))
}

// Handler for deleting a Todo by ID; ownership is not checked
pub async fn delete_todo(
    Path(id): Path<i64>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let id = positive_id(id)?;

    let mut tx = data.db.begin().await?;
    todo_store::delete(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(todo_id = id, caller_id = user.user_id, "deleted todo");

    Ok(StatusCode::NO_CONTENT)
}

fn positive_id(id: i64) -> Result<i64, AppError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(AppError::Validation(format!(
            "todo id must be greater than 0, got {}",
            id
        )))
    }
}
