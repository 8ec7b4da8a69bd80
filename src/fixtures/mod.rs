//! Fixture store
//!
//! In-memory records for every inventory entity, the filters applied to
//! them and the aggregate views derived from them. The store is plain data;
//! the mock layer decides how it is served.

mod derived;
mod filters;
pub mod records;
mod seed;

pub use derived::*;
pub use filters::*;
pub use records::*;

/// Every entity collection served in mock mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureStore {
    pub companies: Vec<Company>,
    pub locations: Vec<Location>,
    pub modems: Vec<Modem>,
    pub sim_cards: Vec<SimCard>,
    pub work_orders: Vec<WorkOrder>,
    pub test_scenarios: Vec<TestScenario>,
    pub test_sessions: Vec<TestSession>,
    pub scrap_requests: Vec<ScrapRequest>,
    pub alerts: Vec<Alert>,
    pub activity_logs: Vec<ActivityLog>,
    /// The first entry is the signed-in user
    pub users: Vec<User>,
}

impl FixtureStore {
    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<&User> {
        self.users.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let store = FixtureStore::seed();
        let mut ids = HashSet::new();
        let all = store
            .companies
            .iter()
            .map(|r| &r.id)
            .chain(store.locations.iter().map(|r| &r.id))
            .chain(store.modems.iter().map(|r| &r.id))
            .chain(store.sim_cards.iter().map(|r| &r.id))
            .chain(store.work_orders.iter().map(|r| &r.id))
            .chain(store.test_scenarios.iter().map(|r| &r.id))
            .chain(store.test_sessions.iter().map(|r| &r.id))
            .chain(store.scrap_requests.iter().map(|r| &r.id))
            .chain(store.alerts.iter().map(|r| &r.id))
            .chain(store.activity_logs.iter().map(|r| &r.id))
            .chain(store.users.iter().map(|r| &r.id));
        for id in all {
            assert!(ids.insert(id.clone()), "duplicate id {}", id);
        }
    }

    #[test]
    fn test_seed_shape() {
        let store = FixtureStore::seed();
        assert_eq!(store.modems.len(), 5);
        assert_eq!(store.companies.len(), 3);
        assert_eq!(store.locations.len(), 4);
        assert!(store.test_scenarios.iter().all(|s| s.steps.len() == 3));
        assert_eq!(store.current_user().map(|u| u.id.as_str()), Some("user-1"));
    }
}
