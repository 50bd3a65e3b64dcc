//! Persistence for registered users.
//!
//! Every function runs on a caller-supplied connection so it joins the
//! request's transaction.

use sqlx::{query_as, SqliteConnection};

use crate::{error::AppError, model::User, password::PasswordHasher, schema::CreateUserSchema};

/// Insert a new user with a freshly computed digest.
///
/// Uniqueness of `username` is left to the table constraint, so two racing
/// registrations cannot both succeed.
pub async fn create(
    conn: &mut SqliteConnection,
    hasher: &PasswordHasher,
    fields: &CreateUserSchema,
) -> Result<User, AppError> {
    let hashed_password = hasher.hash(&fields.password).await?;

    let result = query_as::<_, User>(
        "INSERT INTO users (username, email, first_name, last_name, hashed_password, role, phone_number) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, username, email, first_name, last_name, hashed_password, role, phone_number",
    )
    .bind(&fields.username)
    .bind(&fields.email)
    .bind(&fields.first_name)
    .bind(&fields.last_name)
    .bind(hashed_password)
    .bind(&fields.role)
    .bind(&fields.phone_number)
    .fetch_one(conn)
    .await;

    match result {
        Ok(user) => Ok(user),
        Err(err) if is_unique_violation(&err) => Err(AppError::DuplicateUsername),
        Err(err) => Err(err.into()),
    }
}

/// Exact-match lookup; no case folding.
pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = query_as::<_, User>(
        "SELECT id, username, email, first_name, last_name, hashed_password, role, phone_number \
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(conn)
    .await?;
    Ok(user)
}

/// Resolve a user from credentials. Unknown user and wrong password are both
/// `None`, and both cost one bcrypt verification.
pub async fn authenticate(
    conn: &mut SqliteConnection,
    hasher: &PasswordHasher,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = match find_by_username(conn, username).await? {
        Some(user) => user,
        None => {
            hasher.verify_absent(password).await?;
            return Ok(None);
        }
    };

    if hasher.verify(password, &user.hashed_password).await? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
