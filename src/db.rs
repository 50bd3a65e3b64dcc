use sqlx::{
    migrate::{MigrateDatabase, MigrateError, Migrator},
    sqlite::SqlitePoolOptions,
    Sqlite, SqlitePool,
};

// Reversible migrations under ./migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a pool for `database_url`, creating the database file when missing.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        tracing::info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    } else {
        tracing::debug!("Database {} already exists", database_url);
    }

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
