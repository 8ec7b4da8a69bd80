use super::routes::{self, WriteTarget};
use crate::api::{ApiResponse, DataSource, HttpMethod, QueryParams};
use crate::fixtures::FixtureStore;
use crate::mode::DataMode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default artificial latency of a mock read
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(300);

/// Mock layer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Delay before a read resolves; zero disables it
    pub latency: Duration,
    /// Fixed clock for time-relative views; `None` uses the system clock
    pub now: Option<DateTime<Utc>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_MOCK_LATENCY,
            now: None,
        }
    }
}

impl MockConfig {
    /// No latency, system clock
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            now: None,
        }
    }

    /// Set the read latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Pin the clock
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

/// [`DataSource`] backed by an immutable [`FixtureStore`]
#[derive(Debug, Clone)]
pub struct MockDataSource {
    store: Arc<FixtureStore>,
    config: MockConfig,
}

impl MockDataSource {
    /// Serve `store` with `config`
    pub fn new(store: FixtureStore, config: MockConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Serve the built-in fixtures
    pub fn seeded(config: MockConfig) -> Self {
        Self::new(FixtureStore::seed(), config)
    }

    /// The fixtures being served
    pub fn store(&self) -> &FixtureStore {
        &self.store
    }

    /// Settings in use
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Current time as the mock sees it
    pub fn now(&self) -> DateTime<Utc> {
        self.config.now.unwrap_or_else(Utc::now)
    }

    /// Answer a read immediately, without the artificial delay
    pub fn read_now(&self, path: &str, params: &QueryParams) -> ApiResponse<Value> {
        routes::read(&self.store, path, params, self.now())
    }

    async fn delay(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::seeded(MockConfig::default())
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    fn mode(&self) -> DataMode {
        DataMode::Mock
    }

    async fn get(&self, path: &str, params: &QueryParams) -> ApiResponse<Value> {
        tracing::debug!("mock GET {} {:?}", path, params);
        let response = self.read_now(path, params);
        self.delay().await;
        response
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<Value> {
        if method == HttpMethod::Get {
            return self.get(path, &QueryParams::new()).await;
        }

        if let Some(response) = routes::auth_write(self.store(), path) {
            tracing::info!(method = %method, "{}", response.message.as_deref().unwrap_or_default());
            return response;
        }

        match WriteTarget::parse(path) {
            Some(target) => {
                tracing::info!(
                    method = %method,
                    id = target.id.as_deref().unwrap_or("-"),
                    "{}",
                    target.describe(method)
                );
                routes::write(method, &target, body)
            }
            None => {
                tracing::warn!("mock {} to unknown route {}", method, path);
                ApiResponse::failure(
                    routes::STATUS_NOT_FOUND,
                    format!("Route '{}' not found", path),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Modem;
    use serde_json::json;
    use std::time::Instant;

    #[tokio::test]
    async fn test_reads_are_delayed() {
        let source = MockDataSource::seeded(MockConfig::default().with_latency(Duration::from_millis(50)));
        let started = Instant::now();
        let response = source.get("/modems", &QueryParams::new()).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_mutations_leave_store_untouched() {
        let source = MockDataSource::seeded(MockConfig::instant());
        let before = source.store().clone();

        let created = source
            .send(HttpMethod::Post, "/modems", Some(json!({"imei": "1"})))
            .await;
        assert!(created.is_success());
        assert_eq!(created.message.as_deref(), Some("Mock: Creating modem"));

        let deleted = source.send(HttpMethod::Delete, "/modems/modem-1", None).await;
        assert!(deleted.is_success());

        assert_eq!(source.store(), &before);
        let modems: Vec<Modem> = source
            .get("/modems", &QueryParams::new())
            .await
            .decode()
            .into_result("")
            .unwrap();
        assert_eq!(modems.len(), before.modems.len());
    }

    #[tokio::test]
    async fn test_unknown_write_route() {
        let source = MockDataSource::seeded(MockConfig::instant());
        let response = source.send(HttpMethod::Post, "/nowhere", None).await;
        assert_eq!(response.status_code, Some(routes::STATUS_NOT_FOUND));
    }
}
