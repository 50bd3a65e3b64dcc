use sqlx::{query, query_as, SqliteConnection};
use validator::Validate;

use crate::{error::AppError, model::Todo, schema::TodoSchema};

/// All todos owned by `owner_id`; empty when there are none.
pub async fn list_for_owner(
    conn: &mut SqliteConnection,
    owner_id: i64,
) -> Result<Vec<Todo>, AppError> {
    let todos = query_as::<_, Todo>(
        "SELECT id, title, description, priority, complete, phone_number, owner_id \
         FROM todos WHERE owner_id = ? ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(conn)
    .await?;
    Ok(todos)
}

/// A todo owned by someone else is reported exactly like a missing one.
pub async fn get_for_owner(
    conn: &mut SqliteConnection,
    todo_id: i64,
    owner_id: i64,
) -> Result<Todo, AppError> {
    query_as::<_, Todo>(
        "SELECT id, title, description, priority, complete, phone_number, owner_id \
         FROM todos WHERE id = ? AND owner_id = ?",
    )
    .bind(todo_id)
    .bind(owner_id)
    .fetch_optional(conn)
    .await?
    .ok_or(AppError::NotFound("Todo"))
}

pub async fn create(
    conn: &mut SqliteConnection,
    fields: &TodoSchema,
    owner_id: i64,
) -> Result<Todo, AppError> {
    fields.validate()?;

    let todo = query_as::<_, Todo>(
        "INSERT INTO todos (title, description, priority, complete, phone_number, owner_id) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, title, description, priority, complete, phone_number, owner_id",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.priority)
    .bind(fields.complete)
    .bind(&fields.phone_number)
    .bind(owner_id)
    .fetch_one(conn)
    .await?;
    Ok(todo)
}

/// Replace the fields of todo `todo_id` that differ from `fields`.
///
/// The lookup is by id alone: the caller's identity is not consulted here.
pub async fn update(
    conn: &mut SqliteConnection,
    todo_id: i64,
    fields: &TodoSchema,
) -> Result<Todo, AppError> {
    fields.validate()?;

    let mut todo = find_by_id(&mut *conn, todo_id)
        .await?
        .ok_or(AppError::NotFound("Todo"))?;

    if !apply_changes(&mut todo, fields) {
        return Ok(todo);
    }

    let todo = query_as::<_, Todo>(
        "UPDATE todos SET title = ?, description = ?, priority = ?, complete = ?, phone_number = ? \
         WHERE id = ? \
         RETURNING id, title, description, priority, complete, phone_number, owner_id",
    )
    .bind(todo.title)
    .bind(todo.description)
    .bind(todo.priority)
    .bind(todo.complete)
    .bind(todo.phone_number)
    .bind(todo.id)
    .fetch_one(conn)
    .await?;
    Ok(todo)
}

/// Delete todo `todo_id`. Like `update`, ownership is not checked.
pub async fn delete(conn: &mut SqliteConnection, todo_id: i64) -> Result<(), AppError> {
    if find_by_id(&mut *conn, todo_id).await?.is_none() {
        return Err(AppError::NotFound("Todo"));
    }

    query("DELETE FROM todos WHERE id = ?")
        .bind(todo_id)
        .execute(conn)
        .await?;
    Ok(())
}

async fn find_by_id(conn: &mut SqliteConnection, todo_id: i64) -> Result<Option<Todo>, AppError> {
    let todo = query_as::<_, Todo>(
        "SELECT id, title, description, priority, complete, phone_number, owner_id \
         FROM todos WHERE id = ?",
    )
    .bind(todo_id)
    .fetch_optional(conn)
    .await?;
    Ok(todo)
}

// Returns whether anything changed.
fn apply_changes(todo: &mut Todo, fields: &TodoSchema) -> bool {
    let mut changed = false;

    if todo.title != fields.title {
        todo.title = fields.title.clone();
        changed = true;
    }
    if todo.description != fields.description {
        todo.description = fields.description.clone();
        changed = true;
    }
    if todo.priority != fields.priority {
        todo.priority = fields.priority;
        changed = true;
    }
    if todo.complete != fields.complete {
        todo.complete = fields.complete;
        changed = true;
    }
    if todo.phone_number != fields.phone_number {
        todo.phone_number = fields.phone_number.clone();
        changed = true;
    }

    changed
}
