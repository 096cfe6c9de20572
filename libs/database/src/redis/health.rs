use redis::aio::ConnectionManager;

/// Check Redis connectivity with a PING.
///
/// Intended for readiness probes; returns the underlying error message so the
/// caller can surface it in the readiness response.
pub async fn check_redis(manager: &ConnectionManager) -> Result<(), String> {
    let mut conn = manager.clone();
    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}
