use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

/// Check database connectivity with a lightweight `SELECT 1`.
///
/// Intended for readiness probes; returns the underlying error message so the
/// caller can surface it in the readiness response.
pub async fn check_database(db: &DatabaseConnection) -> Result<(), String> {
    db.execute_raw(Statement::from_string(
        db.get_database_backend(),
        "SELECT 1",
    ))
    .await
    .map(|_| ())
    .map_err(|e| e.to_string())
}
