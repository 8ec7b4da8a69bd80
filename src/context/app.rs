use crate::api::endpoints::{self, Resource};
use crate::api::{ApiClient, ApiConfig, DataSource, QueryParams};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::fixtures::*;
use crate::mock::{MockConfig, MockDataSource};
use crate::mode::{DataMode, ModeSwitch};
use crate::notify::{LogNotifier, Notifier};
use crate::query::{Mutation, Query, QueryKey, SourceResolver};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// Shared handles for every read and write
#[derive(Clone)]
pub struct AppContext {
    mode: Arc<ModeSwitch>,
    mock: Arc<dyn DataSource>,
    live: Arc<dyn DataSource>,
    notifier: Arc<dyn Notifier>,
    client: Option<Arc<ApiClient>>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("mode", &self.mode.mode())
            .field("has_client", &self.client.is_some())
            .finish()
    }
}

impl AppContext {
    /// Assemble a context from its parts
    pub fn new(
        mode: Arc<ModeSwitch>,
        mock: Arc<dyn DataSource>,
        live: Arc<dyn DataSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            mode,
            mock,
            live,
            notifier,
            client: None,
        }
    }

    /// Build the standard context: file-backed state, seeded mock layer and
    /// the reqwest client
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let path = config
            .state_file
            .clone()
            .unwrap_or_else(FileStore::default_path);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(path)?);
        Self::with_store(config, store, notifier)
    }

    /// Like [`AppContext::from_config`], persisting to `store`
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let build_default = config.enable_mock_data.map(DataMode::from_mock_flag);
        let mode = Arc::new(ModeSwitch::load(Arc::clone(&store), build_default));
        let client = Arc::new(ApiClient::new(config.api.clone(), store)?);
        let mock = Arc::new(MockDataSource::seeded(config.mock.clone()));

        Ok(Self {
            mode,
            mock,
            live: client.clone(),
            notifier,
            client: Some(client),
        })
    }

    /// In-memory state, seeded mock layer, default live settings
    pub fn in_memory(mock: MockConfig) -> Result<Self> {
        let config = ClientConfig {
            api: ApiConfig::default(),
            mock,
            ..Default::default()
        };
        Self::with_store(&config, Arc::new(MemoryStore::new()), Arc::new(LogNotifier))
    }

    /// Replace the notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// The mode switch
    pub fn mode_switch(&self) -> &ModeSwitch {
        &self.mode
    }

    /// Current data mode
    pub fn mode(&self) -> DataMode {
        self.mode.mode()
    }

    /// Select a data mode; affects requests issued from now on
    pub fn set_mode(&self, mode: DataMode) -> Result<()> {
        self.mode.set_mode(mode)
    }

    /// Flip the data mode
    pub fn toggle_mode(&self) -> Result<DataMode> {
        self.mode.toggle_mode()
    }

    /// Notifier used by queries and mutations
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    /// The live REST client, when this context built one
    pub fn api_client(&self) -> Option<&Arc<ApiClient>> {
        self.client.as_ref()
    }

    /// Source serving `mode`
    pub fn source_for(&self, mode: DataMode) -> Arc<dyn DataSource> {
        match mode {
            DataMode::Mock => Arc::clone(&self.mock),
            DataMode::Live => Arc::clone(&self.live),
        }
    }

    /// Source for the current mode
    pub fn source(&self) -> Arc<dyn DataSource> {
        self.source_for(self.mode())
    }

    /// Resolver handing out the current source on each call
    pub fn resolver(&self) -> SourceResolver {
        let ctx = self.clone();
        Arc::new(move || ctx.source())
    }

    /// Generic read of `key`, decoded into `T`
    pub fn query<T>(&self, key: QueryKey) -> Query<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let ctx = self.clone();
        Query::new(
            key,
            move |key: QueryKey| {
                let source = ctx.source();
                async move {
                    source
                        .get(&key.endpoint, &key.params)
                        .await
                        .decode::<T>()
                }
                .boxed()
            },
            self.notifier(),
        )
    }

    /// Generic write of `method` to `endpoint`
    pub fn mutation<R: DeserializeOwned>(
        &self,
        method: &str,
        endpoint: impl Into<String>,
    ) -> Mutation<R> {
        Mutation::new(method, endpoint, self.resolver(), self.notifier())
    }

    /// List a resource with raw query parameters
    pub fn list<T>(&self, resource: Resource, params: QueryParams) -> Query<Vec<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.query(QueryKey::new(resource.list()).with_params(params))
    }

    /// One record of a resource
    pub fn record<T>(&self, resource: Resource, id: &str) -> Query<T>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.query(QueryKey::new(resource.get(id)).with_dependencies([id]))
    }

    pub fn companies(&self) -> Query<Vec<Company>> {
        self.list(Resource::Companies, QueryParams::new())
    }

    pub fn locations(&self) -> Query<Vec<Location>> {
        self.list(Resource::Locations, QueryParams::new())
    }

    /// Modems matching `filters`
    pub fn modems(&self, filters: &ModemFilters) -> Query<Vec<Modem>> {
        self.list(Resource::Modems, filters.to_params())
    }

    pub fn modem(&self, id: &str) -> Query<Modem> {
        self.record(Resource::Modems, id)
    }

    /// Free-text modem search
    pub fn search_modems(&self, query: &str) -> Query<Vec<Modem>> {
        let mut params = QueryParams::new();
        params.insert("q".to_string(), query.to_string());
        self.query(
            QueryKey::new(endpoints::MODEMS_SEARCH)
                .with_params(params)
                .with_dependencies([query]),
        )
    }

    pub fn sim_cards(&self) -> Query<Vec<SimCard>> {
        self.list(Resource::SimCards, QueryParams::new())
    }

    /// Work orders matching `filters`
    pub fn work_orders(&self, filters: &WorkOrderFilters) -> Query<Vec<WorkOrder>> {
        self.list(Resource::WorkOrders, filters.to_params())
    }

    pub fn work_order(&self, id: &str) -> Query<WorkOrder> {
        self.record(Resource::WorkOrders, id)
    }

    /// In-progress work orders close to or past their SLA deadline
    pub fn sla_alerts(&self) -> Query<Vec<WorkOrder>> {
        self.query(QueryKey::new(endpoints::WORK_ORDERS_SLA_ALERTS))
    }

    pub fn test_scenarios(&self) -> Query<Vec<TestScenario>> {
        self.list(Resource::TestScenarios, QueryParams::new())
    }

    /// Test sessions matching `filters`
    pub fn test_sessions(&self, filters: &TestSessionFilters) -> Query<Vec<TestSession>> {
        self.list(Resource::TestSessions, filters.to_params())
    }

    /// Scrap requests matching `filters`
    pub fn scrap_requests(&self, filters: &ScrapRequestFilters) -> Query<Vec<ScrapRequest>> {
        self.list(Resource::ScrapRequests, filters.to_params())
    }

    pub fn alerts(&self) -> Query<Vec<Alert>> {
        self.list(Resource::Alerts, QueryParams::new())
    }

    pub fn dashboard_stats(&self) -> Query<DashboardStats> {
        self.query(QueryKey::new(endpoints::DASHBOARD_STATS))
    }

    pub fn recent_activities(&self) -> Query<Vec<ActivityLog>> {
        self.query(QueryKey::new(endpoints::DASHBOARD_RECENT_ACTIVITIES))
    }

    /// Unread alerts for the dashboard
    pub fn dashboard_alerts(&self) -> Query<Vec<Alert>> {
        self.query(QueryKey::new(endpoints::DASHBOARD_ALERTS))
    }

    /// The signed-in user
    pub fn profile(&self) -> Query<User> {
        self.query(QueryKey::new(endpoints::AUTH_PROFILE))
    }

    /// Search across modems, work orders and SIM cards
    pub fn global_search(&self, query: &str) -> Query<SearchResults> {
        let mut params = QueryParams::new();
        params.insert("q".to_string(), query.to_string());
        self.query(
            QueryKey::new(endpoints::SEARCH_GLOBAL)
                .with_params(params)
                .with_dependencies([query]),
        )
    }

    /// POST a new record
    pub fn create<R: DeserializeOwned>(&self, resource: Resource) -> Mutation<R> {
        self.mutation("POST", resource.create())
    }

    /// PUT an updated record
    pub fn update<R: DeserializeOwned>(&self, resource: Resource, id: &str) -> Mutation<R> {
        self.mutation("PUT", resource.update(id))
    }

    /// DELETE a record
    pub fn delete<R: DeserializeOwned>(&self, resource: Resource, id: &str) -> Mutation<R> {
        self.mutation("DELETE", resource.delete(id))
    }

    /// PATCH an alert as read
    pub fn mark_alert_read<R: DeserializeOwned>(&self, id: &str) -> Mutation<R> {
        self.mutation("PATCH", endpoints::alert_mark_read(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, HttpMethod};
    use crate::notify::RecordingNotifier;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::time::Duration;

    /// Live stand-in answering every read with one fixed modem list
    struct FixedLive(Value);

    #[async_trait]
    impl DataSource for FixedLive {
        fn mode(&self) -> DataMode {
            DataMode::Live
        }

        async fn get(&self, _path: &str, _params: &QueryParams) -> ApiResponse<Value> {
            ApiResponse::ok(self.0.clone())
        }

        async fn send(
            &self,
            _method: HttpMethod,
            _path: &str,
            body: Option<Value>,
        ) -> ApiResponse<Value> {
            ApiResponse::ok(body.unwrap_or(Value::Null)).with_message("saved")
        }
    }

    fn context(latency: Duration) -> (AppContext, Arc<RecordingNotifier>) {
        let live_modem = serde_json::to_value(&FixtureStore::seed().modems[3]).unwrap();
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = AppContext::new(
            Arc::new(ModeSwitch::load(Arc::new(MemoryStore::new()), None)),
            Arc::new(MockDataSource::seeded(
                MockConfig::instant().with_latency(latency),
            )),
            Arc::new(FixedLive(json!([live_modem]))),
            notifier.clone(),
        );
        (ctx, notifier)
    }

    #[tokio::test]
    async fn test_toggle_only_affects_later_issues() {
        let (ctx, _) = context(Duration::ZERO);
        assert_eq!(ctx.mode(), DataMode::Mock);

        let query = ctx.modems(&ModemFilters::default());
        let mock_rows = query.settled().await.data.unwrap();
        assert_eq!(mock_rows.len(), 5);

        ctx.toggle_mode().unwrap();
        assert_eq!(query.data().unwrap(), mock_rows);

        query.refetch();
        let live_rows = query.settled().await.data.unwrap();
        assert_eq!(live_rows.len(), 1);
        assert_eq!(live_rows[0].id, "modem-4");
    }

    #[tokio::test]
    async fn test_in_flight_read_keeps_its_mode() {
        let (ctx, _) = context(Duration::from_millis(30));
        let query = ctx.modems(&ModemFilters::default());
        ctx.set_mode(DataMode::Live).unwrap();

        let rows = query.settled().await.data.unwrap();
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn test_typed_reads_in_mock_mode() {
        let (ctx, notifier) = context(Duration::ZERO);

        let depot = ctx.modems(&ModemFilters {
            status: Some("depot".into()),
            ..Default::default()
        });
        let rows = depot.settled().await.data.unwrap();
        assert!(rows.iter().all(|m| m.status == ModemStatus::Depot));

        let missing = ctx.modem("modem-404");
        let state = missing.settled().await;
        assert!(state.data.is_none());
        assert!(state.error.unwrap().contains("not found"));
        assert_eq!(notifier.destructive_count(), 1);

        let search = ctx.global_search("huawei");
        assert_eq!(search.settled().await.data.unwrap().modems.len(), 2);

        let profile = ctx.profile().settled().await.data.unwrap();
        assert_eq!(profile.display_name(), "Admin User");
    }

    #[tokio::test]
    async fn test_mutation_follows_mode() {
        let (ctx, notifier) = context(Duration::ZERO);
        let create = ctx.create::<Value>(Resource::Modems);

        create.invoke(Some(json!({"imei": "1"}))).await.unwrap();
        ctx.set_mode(DataMode::Live).unwrap();
        create.invoke(Some(json!({"imei": "2"}))).await.unwrap();

        let descriptions: Vec<_> = notifier
            .take()
            .into_iter()
            .map(|n| n.description)
            .collect();
        assert_eq!(descriptions, ["Mock: Creating modem", "saved"]);
    }
}
