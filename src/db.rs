use anyhow::{Context, Result};
use sqlx::MySqlPool;

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Creates the tables the leave service reads and writes, if missing.
/// `employees` is normally owned by the HR directory; it is created here only
/// so a fresh database is usable.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            department_id BIGINT UNSIGNED NULL,
            manager_id BIGINT UNSIGNED NULL,
            INDEX idx_employees_manager (manager_id)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create employees table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leave_requests (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            employee_id BIGINT UNSIGNED NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            reason TEXT NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'PENDING',
            manager_id BIGINT UNSIGNED NULL,
            INDEX idx_leave_employee_status (employee_id, status)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create leave_requests table")?;

    Ok(())
}
