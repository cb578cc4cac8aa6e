//! Schema creation for the `todo` table

use sqlx::PgPool;

use super::DbError;

/// Create the `todo` table and its content index.
///
/// Safe to run against an already initialized database.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Ensuring todo schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todo (
            id SERIAL PRIMARY KEY,
            content VARCHAR(54) NOT NULL,
            is_completed BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_todo_content ON todo (content)")
        .execute(pool)
        .await?;

    tracing::info!("Todo schema ready");
    Ok(())
}
