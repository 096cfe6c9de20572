//! Redis test infrastructure
//!
//! Provides a [`TestRedis`] helper that starts a Redis container.

use redis::aio::ConnectionManager;
use redis::Client;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::redis::Redis;

/// Test Redis wrapper that ensures proper cleanup.
///
/// The container is stopped and removed when this struct is dropped.
pub struct TestRedis {
    #[allow(dead_code)]
    container: ContainerAsync<Redis>,
    connection: ConnectionManager,
    pub connection_string: String,
}

impl TestRedis {
    /// Create a new test Redis instance.
    ///
    /// ```ignore
    /// use test_utils::TestRedis;
    ///
    /// let redis = TestRedis::new().await;
    /// let conn = redis.connection();
    /// ```
    pub async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");

        let host_port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get host port");

        let connection_string = format!("redis://127.0.0.1:{}", host_port);

        let client = Client::open(connection_string.as_str())
            .expect("Failed to create Redis client");
        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to test Redis");

        Self {
            container,
            connection,
            connection_string,
        }
    }

    /// A cloned connection manager for the test container.
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}
