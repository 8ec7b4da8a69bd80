//! Path routing for the mock layer
//!
//! Maps an endpoint path onto a synchronous computation over the fixture
//! store. Nothing here sleeps or mutates; [`super::MockDataSource`] adds the
//! latency and the logging.

use crate::api::{ApiResponse, HttpMethod, Pagination, QueryParams, Resource, STATUS_INTERNAL};
use crate::fixtures::*;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

/// Status of every "no such route or record" envelope
pub const STATUS_NOT_FOUND: u16 = 404;

/// Page size used when only `page` is given
pub const DEFAULT_PAGE_LIMIT: usize = 20;

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn to_envelope<T: Serialize>(value: &T) -> ApiResponse<Value> {
    match serde_json::to_value(value) {
        Ok(value) => ApiResponse::ok(value),
        Err(e) => ApiResponse::failure(STATUS_INTERNAL, e.to_string()),
    }
}

fn not_found(what: impl std::fmt::Display) -> ApiResponse<Value> {
    ApiResponse::failure(STATUS_NOT_FOUND, format!("{} not found", what))
}

fn parse_positive(params: &QueryParams, key: &str) -> Option<usize> {
    params
        .get(key)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// Serialize a list, paginating it when `page` or `limit` is present
pub fn paged<T: Serialize>(items: Vec<T>, params: &QueryParams) -> ApiResponse<Value> {
    let page = parse_positive(params, "page");
    let limit = parse_positive(params, "limit");
    if page.is_none() && limit.is_none() {
        return to_envelope(&items);
    }

    let pagination = Pagination::new(
        page.unwrap_or(1),
        limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        items.len(),
    );
    to_envelope(&pagination.slice(items)).with_pagination(pagination)
}

fn find<T: Record + Serialize>(items: &[T], resource: Resource, id: &str) -> ApiResponse<Value> {
    match items.iter().find(|r| r.id() == id) {
        Some(record) => to_envelope(record),
        None => not_found(format!("{} '{}'", resource.noun(), id)),
    }
}

fn list(store: &FixtureStore, resource: Resource, params: &QueryParams) -> ApiResponse<Value> {
    match resource {
        Resource::Companies => paged(store.companies.clone(), params),
        Resource::Locations => paged(store.locations.clone(), params),
        Resource::Modems => paged(ModemFilters::from_params(params).apply(&store.modems), params),
        Resource::SimCards => paged(store.sim_cards.clone(), params),
        Resource::WorkOrders => paged(
            WorkOrderFilters::from_params(params).apply(&store.work_orders),
            params,
        ),
        Resource::TestScenarios => paged(store.test_scenarios.clone(), params),
        Resource::TestSessions => paged(
            TestSessionFilters::from_params(params).apply(&store.test_sessions),
            params,
        ),
        Resource::ScrapRequests => paged(
            ScrapRequestFilters::from_params(params).apply(&store.scrap_requests),
            params,
        ),
        Resource::Alerts => paged(store.alerts.clone(), params),
    }
}

fn get_one(store: &FixtureStore, resource: Resource, id: &str) -> ApiResponse<Value> {
    match resource {
        Resource::Companies => find(&store.companies, resource, id),
        Resource::Locations => find(&store.locations, resource, id),
        Resource::Modems => find(&store.modems, resource, id),
        Resource::SimCards => find(&store.sim_cards, resource, id),
        Resource::WorkOrders => find(&store.work_orders, resource, id),
        Resource::TestScenarios => find(&store.test_scenarios, resource, id),
        Resource::TestSessions => find(&store.test_sessions, resource, id),
        Resource::ScrapRequests => find(&store.scrap_requests, resource, id),
        Resource::Alerts => find(&store.alerts, resource, id),
    }
}

/// Answer a read of `path` from the fixture store as of `now`
pub fn read(
    store: &FixtureStore,
    path: &str,
    params: &QueryParams,
    now: DateTime<Utc>,
) -> ApiResponse<Value> {
    let query = params.get("q").map(String::as_str).unwrap_or_default();

    match segments(path).as_slice() {
        ["modems", "search"] => {
            let needle = query.to_lowercase();
            let hits: Vec<Modem> = if needle.is_empty() {
                Vec::new()
            } else {
                store
                    .modems
                    .iter()
                    .filter(|m| modem_matches_text(m, &needle))
                    .cloned()
                    .collect()
            };
            paged(hits, params)
        }
        ["modems", "export"] => to_envelope(&store.modems),
        ["work-orders", "sla-alerts"] => to_envelope(&store.sla_alerts(now)),
        ["dashboard", "stats"] => to_envelope(&store.dashboard_stats()),
        ["dashboard", "recent-activities"] => {
            to_envelope(&store.recent_activities(RECENT_ACTIVITY_LIMIT))
        }
        ["dashboard", "alerts"] => to_envelope(&store.unread_alerts()),
        ["search"] => to_envelope(&store.search(query)),
        ["auth", "profile"] => match store.current_user() {
            Some(user) => to_envelope(user),
            None => not_found("Signed-in user"),
        },
        [segment] => match Resource::from_segment(segment) {
            Some(resource) => list(store, resource, params),
            None => not_found(format!("Route '{}'", path)),
        },
        [segment, id] => match Resource::from_segment(segment) {
            Some(resource) => get_one(store, resource, id),
            None => not_found(format!("Route '{}'", path)),
        },
        _ => not_found(format!("Route '{}'", path)),
    }
}

/// What a write addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTarget {
    pub resource: Resource,
    pub id: Option<String>,
    /// Set for `/alerts/{id}/mark-read`
    pub mark_read: bool,
}

impl WriteTarget {
    /// Parse a write path, `None` when it names no resource
    pub fn parse(path: &str) -> Option<Self> {
        match segments(path).as_slice() {
            [segment] => Some(Self {
                resource: Resource::from_segment(segment)?,
                id: None,
                mark_read: false,
            }),
            [segment, id] => Some(Self {
                resource: Resource::from_segment(segment)?,
                id: Some(id.to_string()),
                mark_read: false,
            }),
            ["alerts", id, "mark-read"] => Some(Self {
                resource: Resource::Alerts,
                id: Some(id.to_string()),
                mark_read: true,
            }),
            _ => None,
        }
    }

    /// Log line describing the simulated write
    pub fn describe(&self, method: HttpMethod) -> String {
        if self.mark_read {
            return "Mock: Marking alert as read".to_string();
        }
        let verb = match method {
            HttpMethod::Post => "Creating",
            HttpMethod::Put | HttpMethod::Patch => "Updating",
            HttpMethod::Delete => "Deleting",
            HttpMethod::Get => "Reading",
        };
        format!("Mock: {} {}", verb, self.resource.noun())
    }
}

/// Envelope for a simulated write. The store is never touched.
pub fn write(method: HttpMethod, target: &WriteTarget, body: Option<Value>) -> ApiResponse<Value> {
    let data = match (method, &target.id) {
        (HttpMethod::Delete, id) => json!({ "id": id, "deleted": true }),
        (_, id) => {
            let mut data = body.unwrap_or_else(|| json!({}));
            if let (Value::Object(map), Some(id)) = (&mut data, id) {
                map.entry("id").or_insert_with(|| json!(id));
            }
            if target.mark_read {
                if let Value::Object(map) = &mut data {
                    map.insert("isRead".to_string(), json!(true));
                }
            }
            data
        }
    };
    ApiResponse::ok(data).with_message(target.describe(method))
}

/// Envelope for a mock login, refresh or logout, `None` for any other path.
/// Sign-in and refresh answer with the signed-in user; nothing is stored.
pub fn auth_write(store: &FixtureStore, path: &str) -> Option<ApiResponse<Value>> {
    let message = match segments(path).as_slice() {
        ["auth", "login"] => "Mock: Signing in",
        ["auth", "refresh"] => "Mock: Refreshing session",
        ["auth", "logout"] => {
            let response = ApiResponse::ok(json!({ "loggedOut": true }));
            return Some(response.with_message("Mock: Signing out"));
        }
        _ => return None,
    };
    let response = match store.current_user() {
        Some(user) => to_envelope(user),
        None => not_found("Signed-in user"),
    };
    Some(response.with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 30, 11, 0, 0).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_list_applies_filters() {
        let store = FixtureStore::seed();
        let response = read(&store, "/modems", &params(&[("status", "depot")]), now());
        let modems: Vec<Modem> = response.decode().into_result("").unwrap();
        assert_eq!(modems.len(), 1);
        assert_eq!(modems[0].id, "modem-2");
    }

    #[test]
    fn test_unknown_params_are_ignored() {
        let store = FixtureStore::seed();
        let response = read(&store, "/modems", &params(&[("colour", "red")]), now());
        let modems: Vec<Modem> = response.decode().into_result("").unwrap();
        assert_eq!(modems.len(), store.modems.len());
    }

    #[test]
    fn test_pagination() {
        let store = FixtureStore::seed();
        let response = read(
            &store,
            "/modems",
            &params(&[("page", "2"), ("limit", "2")]),
            now(),
        );
        assert_eq!(response.pagination, Some(Pagination::new(2, 2, 5)));
        assert_eq!(response.pagination.unwrap().total_pages, 3);
        let modems: Vec<Modem> = response.decode().into_result("").unwrap();
        let ids: Vec<_> = modems.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["modem-3", "modem-4"]);
    }

    #[test]
    fn test_get_by_id_and_not_found() {
        let store = FixtureStore::seed();
        let found = read(&store, "/sim-cards/sim-2", &QueryParams::new(), now());
        assert!(found.is_success());

        let missing = read(&store, "/sim-cards/sim-404", &QueryParams::new(), now());
        assert!(!missing.success);
        assert_eq!(missing.status_code, Some(STATUS_NOT_FOUND));

        let unknown = read(&store, "/warehouses", &QueryParams::new(), now());
        assert_eq!(unknown.status_code, Some(STATUS_NOT_FOUND));
    }

    #[test]
    fn test_derived_routes() {
        let store = FixtureStore::seed();
        let empty = QueryParams::new();

        let stats: DashboardStats = read(&store, "/dashboard/stats", &empty, now())
            .decode()
            .into_result("")
            .unwrap();
        assert_eq!(stats.stats.total, 5);

        let sla: Vec<WorkOrder> = read(&store, "/work-orders/sla-alerts", &empty, now())
            .decode()
            .into_result("")
            .unwrap();
        assert_eq!(sla.len(), 1);

        let hits: SearchResults = read(&store, "/search", &params(&[("q", "zte")]), now())
            .decode()
            .into_result("")
            .unwrap();
        assert_eq!(hits.modems.len(), 1);

        let nothing: SearchResults = read(&store, "/search", &empty, now())
            .decode()
            .into_result("")
            .unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_write_targets() {
        let target = WriteTarget::parse("/alerts/alert-1/mark-read").unwrap();
        assert!(target.mark_read);
        assert_eq!(target.describe(HttpMethod::Patch), "Mock: Marking alert as read");

        let target = WriteTarget::parse("/work-orders").unwrap();
        assert_eq!(target.resource, Resource::WorkOrders);
        assert_eq!(target.id, None);
        assert_eq!(target.describe(HttpMethod::Post), "Mock: Creating work order");

        assert!(WriteTarget::parse("/dashboard/stats").is_none());
    }

    #[test]
    fn test_auth_routes_use_seeded_user() {
        let store = FixtureStore::seed();
        let before = store.clone();

        let profile: User = read(&store, "/auth/profile", &QueryParams::new(), now())
            .decode()
            .into_result("")
            .unwrap();
        assert_eq!(profile.id, "user-1");
        assert_eq!(profile.email, "admin@telecomims.com");
        assert_eq!(profile.role, "admin");

        let login = auth_write(&store, "/auth/login").unwrap();
        assert_eq!(login.message.as_deref(), Some("Mock: Signing in"));
        assert_eq!(login.data.unwrap()["id"], "user-1");

        let refresh = auth_write(&store, "/auth/refresh").unwrap();
        assert_eq!(refresh.data.unwrap()["email"], "admin@telecomims.com");

        let logout = auth_write(&store, "/auth/logout").unwrap();
        assert_eq!(logout.data, Some(json!({"loggedOut": true})));

        assert!(auth_write(&store, "/auth/profile").is_none());
        assert!(auth_write(&store, "/modems").is_none());
        assert_eq!(store, before);

        let empty = FixtureStore::default();
        assert_eq!(
            read(&empty, "/auth/profile", &QueryParams::new(), now()).status_code,
            Some(STATUS_NOT_FOUND)
        );
    }

    #[test]
    fn test_write_echoes_payload() {
        let target = WriteTarget::parse("/modems/modem-1").unwrap();
        let response = write(HttpMethod::Put, &target, Some(json!({"notes": "swap"})));
        assert!(response.is_success());
        assert_eq!(response.data, Some(json!({"notes": "swap", "id": "modem-1"})));

        let response = write(HttpMethod::Delete, &target, None);
        assert_eq!(response.data, Some(json!({"id": "modem-1", "deleted": true})));
    }
}
