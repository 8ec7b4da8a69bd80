//! List filters
//!
//! Each filter is a set of optional parameters combined with AND. A missing
//! or empty parameter places no restriction. Equality parameters must match
//! the field exactly; `search` is a case-insensitive substring match over a
//! fixed set of fields.

use super::records::*;
use crate::api::QueryParams;
use serde::{Deserialize, Serialize};

/// A filter that can travel as query parameters
pub trait RecordFilter<T>: Default {
    /// Whether `record` passes the filter
    fn matches(&self, record: &T) -> bool;

    /// Read the filter out of query parameters, ignoring unknown keys
    fn from_params(params: &QueryParams) -> Self;

    /// Encode the filter, skipping empty parameters
    fn to_params(&self) -> QueryParams;

    /// Matching records, in their original order
    fn apply(&self, records: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

fn active(param: &Option<String>) -> Option<&str> {
    param.as_deref().filter(|p| !p.is_empty())
}

fn equals(param: &Option<String>, value: &str) -> bool {
    active(param).map_or(true, |p| p == value)
}

fn equals_opt(param: &Option<String>, value: Option<&str>) -> bool {
    match active(param) {
        None => true,
        Some(p) => value == Some(p),
    }
}

fn take(params: &QueryParams, key: &str) -> Option<String> {
    params.get(key).filter(|v| !v.is_empty()).cloned()
}

fn put(params: &mut QueryParams, key: &str, value: &Option<String>) {
    if let Some(value) = active(value) {
        params.insert(key.to_string(), value.to_string());
    }
}

/// Case-insensitive substring test; `needle` must already be lower-case
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Modem list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModemFilters {
    pub status: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<String>,
    pub company_id: Option<String>,
    /// Matches IMEI, model or brand
    pub search: Option<String>,
}

/// Free-text match used by modem filters and global search
pub fn modem_matches_text(modem: &Modem, needle: &str) -> bool {
    contains_ci(&modem.imei, needle)
        || contains_ci(&modem.model, needle)
        || contains_ci(&modem.brand, needle)
}

impl RecordFilter<Modem> for ModemFilters {
    fn matches(&self, modem: &Modem) -> bool {
        equals(&self.status, modem.status.as_str())
            && equals(&self.brand, &modem.brand)
            && equals(&self.model, &modem.model)
            && equals_opt(&self.location_id, modem.location_id.as_deref())
            && equals_opt(&self.company_id, modem.company_id.as_deref())
            && active(&self.search)
                .map_or(true, |term| modem_matches_text(modem, &term.to_lowercase()))
    }

    fn from_params(params: &QueryParams) -> Self {
        Self {
            status: take(params, "status"),
            brand: take(params, "brand"),
            model: take(params, "model"),
            location_id: take(params, "locationId"),
            company_id: take(params, "companyId"),
            search: take(params, "search"),
        }
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        put(&mut params, "status", &self.status);
        put(&mut params, "brand", &self.brand);
        put(&mut params, "model", &self.model);
        put(&mut params, "locationId", &self.location_id);
        put(&mut params, "companyId", &self.company_id);
        put(&mut params, "search", &self.search);
        params
    }
}

/// Work order list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderFilters {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_user_id: Option<String>,
}

impl RecordFilter<WorkOrder> for WorkOrderFilters {
    fn matches(&self, order: &WorkOrder) -> bool {
        equals(&self.status, order.status.as_str())
            && equals(&self.priority, order.priority.as_str())
            && equals_opt(&self.assigned_user_id, order.assigned_user_id.as_deref())
    }

    fn from_params(params: &QueryParams) -> Self {
        Self {
            status: take(params, "status"),
            priority: take(params, "priority"),
            assigned_user_id: take(params, "assignedUserId"),
        }
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        put(&mut params, "status", &self.status);
        put(&mut params, "priority", &self.priority);
        put(&mut params, "assignedUserId", &self.assigned_user_id);
        params
    }
}

/// Test session list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSessionFilters {
    pub status: Option<String>,
    pub modem_id: Option<String>,
    pub technician_id: Option<String>,
}

impl RecordFilter<TestSession> for TestSessionFilters {
    fn matches(&self, session: &TestSession) -> bool {
        equals(&self.status, session.status.as_str())
            && equals(&self.modem_id, &session.modem_id)
            && equals_opt(&self.technician_id, session.technician_id.as_deref())
    }

    fn from_params(params: &QueryParams) -> Self {
        Self {
            status: take(params, "status"),
            modem_id: take(params, "modemId"),
            technician_id: take(params, "technicianId"),
        }
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        put(&mut params, "status", &self.status);
        put(&mut params, "modemId", &self.modem_id);
        put(&mut params, "technicianId", &self.technician_id);
        params
    }
}

/// Scrap request list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapRequestFilters {
    pub status: Option<String>,
}

impl RecordFilter<ScrapRequest> for ScrapRequestFilters {
    fn matches(&self, request: &ScrapRequest) -> bool {
        equals(&self.status, request.status.as_str())
    }

    fn from_params(params: &QueryParams) -> Self {
        Self {
            status: take(params, "status"),
        }
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        put(&mut params, "status", &self.status);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureStore;
    use proptest::prelude::*;

    fn modem_filter(status: &str) -> ModemFilters {
        ModemFilters {
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_filter_is_exact() {
        let store = FixtureStore::seed();
        let depot = modem_filter("depot").apply(&store.modems);
        let expected = store
            .modems
            .iter()
            .filter(|m| m.status == ModemStatus::Depot)
            .count();

        assert_eq!(depot.len(), expected);
        assert!(depot.iter().all(|m| m.status == ModemStatus::Depot));
        assert!(store.modems.iter().any(|m| m.status == ModemStatus::FieldActive));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = FixtureStore::seed();
        let filter = ModemFilters {
            search: Some("HuAwEi".into()),
            ..Default::default()
        };
        let hits = filter.apply(&store.modems);

        assert_eq!(hits.len(), 2);
        for modem in &store.modems {
            let expected = modem.brand.to_lowercase().contains("huawei")
                || modem.model.to_lowercase().contains("huawei");
            assert_eq!(hits.iter().any(|h| h.id == modem.id), expected);
        }
    }

    #[test]
    fn test_search_matches_imei() {
        let store = FixtureStore::seed();
        let filter = ModemFilters {
            search: Some("654324".into()),
            ..Default::default()
        };
        let hits = filter.apply(&store.modems);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "modem-4");
    }

    #[test]
    fn test_empty_params_do_not_restrict() {
        let store = FixtureStore::seed();
        let filter = ModemFilters {
            status: Some(String::new()),
            brand: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&store.modems).len(), store.modems.len());
        assert!(filter.to_params().is_empty());
    }

    #[test]
    fn test_filters_compose_with_and() {
        let store = FixtureStore::seed();
        let filter = ModemFilters {
            brand: Some("Huawei".into()),
            location_id: Some("loc-2".into()),
            ..Default::default()
        };
        let hits = filter.apply(&store.modems);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "modem-5");
    }

    #[test]
    fn test_missing_reference_fails_equality() {
        let store = FixtureStore::seed();
        let filter = WorkOrderFilters {
            assigned_user_id: Some("user-404".into()),
            ..Default::default()
        };
        assert!(filter.apply(&store.work_orders).is_empty());
    }

    #[test]
    fn test_params_round_trip() {
        let filter = TestSessionFilters {
            status: Some("running".into()),
            modem_id: Some("modem-3".into()),
            technician_id: None,
        };
        let params = filter.to_params();
        assert_eq!(params.get("modemId").map(String::as_str), Some("modem-3"));
        assert_eq!(TestSessionFilters::from_params(&params), filter);
    }

    #[test]
    fn test_scrap_and_work_order_filters() {
        let store = FixtureStore::seed();
        let approved = ScrapRequestFilters {
            status: Some("approved".into()),
        };
        assert_eq!(approved.apply(&store.scrap_requests).len(), 1);

        let critical = WorkOrderFilters {
            priority: Some("critical".into()),
            status: Some("in_progress".into()),
            ..Default::default()
        };
        let hits = critical.apply(&store.work_orders);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].order_number, "WO-2024-002");
    }

    proptest! {
        #[test]
        fn prop_filtered_is_subset_of_matches(
            status in prop::sample::select(vec!["", "depot", "field_active", "testing", "repair", "scrap", "unknown"]),
            search in "[a-zA-Z0-9 ]{0,6}",
        ) {
            let store = FixtureStore::seed();
            let filter = ModemFilters {
                status: Some(status.to_string()),
                search: Some(search.clone()),
                ..Default::default()
            };
            let hits = filter.apply(&store.modems);
            let needle = search.to_lowercase();
            let expected = store.modems.iter().filter(|m| {
                (status.is_empty() || m.status.as_str() == status)
                    && (needle.is_empty() || modem_matches_text(m, &needle))
            }).count();
            prop_assert_eq!(hits.len(), expected);
        }
    }
}
