//! Endpoint registry
//!
//! Maps resources and logical operation names (`"modems.update"`) to REST
//! paths relative to the API base URL.

use crate::error::{ImsError, Result};
use std::fmt;
use std::str::FromStr;

/// Login path
pub const AUTH_LOGIN: &str = "/auth/login";
/// Logout path
pub const AUTH_LOGOUT: &str = "/auth/logout";
/// Token refresh path
pub const AUTH_REFRESH: &str = "/auth/refresh";
/// Current profile path
pub const AUTH_PROFILE: &str = "/auth/profile";

/// Modem free-text search
pub const MODEMS_SEARCH: &str = "/modems/search";
/// Modem export
pub const MODEMS_EXPORT: &str = "/modems/export";
/// Work orders close to (or past) their SLA deadline
pub const WORK_ORDERS_SLA_ALERTS: &str = "/work-orders/sla-alerts";
/// Dashboard aggregate statistics
pub const DASHBOARD_STATS: &str = "/dashboard/stats";
/// Dashboard recent activity feed
pub const DASHBOARD_RECENT_ACTIVITIES: &str = "/dashboard/recent-activities";
/// Dashboard unread alerts
pub const DASHBOARD_ALERTS: &str = "/dashboard/alerts";
/// Global search
pub const SEARCH_GLOBAL: &str = "/search";

/// CRUD resource groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Companies,
    Locations,
    Modems,
    SimCards,
    WorkOrders,
    TestScenarios,
    TestSessions,
    ScrapRequests,
    Alerts,
}

impl Resource {
    /// Every resource, in registry order
    pub const ALL: [Resource; 9] = [
        Resource::Companies,
        Resource::Locations,
        Resource::Modems,
        Resource::SimCards,
        Resource::WorkOrders,
        Resource::TestScenarios,
        Resource::TestSessions,
        Resource::ScrapRequests,
        Resource::Alerts,
    ];

    /// Path segment, e.g. `sim-cards`
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::Locations => "locations",
            Resource::Modems => "modems",
            Resource::SimCards => "sim-cards",
            Resource::WorkOrders => "work-orders",
            Resource::TestScenarios => "test-scenarios",
            Resource::TestSessions => "test-sessions",
            Resource::ScrapRequests => "scrap-requests",
            Resource::Alerts => "alerts",
        }
    }

    /// Human-readable singular noun, used in log and notification text
    pub fn noun(&self) -> &'static str {
        match self {
            Resource::Companies => "company",
            Resource::Locations => "location",
            Resource::Modems => "modem",
            Resource::SimCards => "SIM card",
            Resource::WorkOrders => "work order",
            Resource::TestScenarios => "test scenario",
            Resource::TestSessions => "test session",
            Resource::ScrapRequests => "scrap request",
            Resource::Alerts => "alert",
        }
    }

    /// `LIST` path
    pub fn list(&self) -> String {
        format!("/{}", self.segment())
    }

    /// `CREATE` path
    pub fn create(&self) -> String {
        self.list()
    }

    /// `GET(id)` path
    pub fn get(&self, id: &str) -> String {
        format!("/{}/{}", self.segment(), id)
    }

    /// `UPDATE(id)` path
    pub fn update(&self, id: &str) -> String {
        self.get(id)
    }

    /// `DELETE(id)` path
    pub fn delete(&self, id: &str) -> String {
        self.get(id)
    }

    /// Find the resource owning a path segment
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.segment() == segment)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for Resource {
    type Err = ImsError;

    /// Accepts the path segment (`sim-cards`) or its snake/camel variants
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = match normalized.as_str() {
            "simcards" => "sim-cards".to_string(),
            "workorders" => "work-orders".to_string(),
            "testscenarios" => "test-scenarios".to_string(),
            "testsessions" => "test-sessions".to_string(),
            "scraprequests" => "scrap-requests".to_string(),
            _ => normalized,
        };
        Self::from_segment(&normalized).ok_or_else(|| ImsError::unknown("resource", s))
    }
}

/// Alert mark-as-read path
pub fn alert_mark_read(id: &str) -> String {
    format!("/alerts/{}/mark-read", id)
}

/// Resolve a logical operation name to a concrete path.
///
/// Parameterized operations (`get`, `update`, `delete`, `mark-read`) need
/// `id`; asking for one without it is a configuration error.
pub fn resolve(operation: &str, id: Option<&str>) -> Result<String> {
    let (group, action) = operation
        .split_once('.')
        .ok_or_else(|| ImsError::unknown("endpoint", operation))?;
    let require_id =
        || id.ok_or_else(|| ImsError::config(format!("endpoint '{}' needs an id", operation)));

    let fixed = match (group, action) {
        ("auth", "login") => Some(AUTH_LOGIN),
        ("auth", "logout") => Some(AUTH_LOGOUT),
        ("auth", "refresh") => Some(AUTH_REFRESH),
        ("auth", "profile") => Some(AUTH_PROFILE),
        ("modems", "search") => Some(MODEMS_SEARCH),
        ("modems", "export") => Some(MODEMS_EXPORT),
        ("work-orders" | "workOrders", "sla-alerts" | "slaAlerts") => Some(WORK_ORDERS_SLA_ALERTS),
        ("dashboard", "stats") => Some(DASHBOARD_STATS),
        ("dashboard", "recent-activities" | "recentActivities") => {
            Some(DASHBOARD_RECENT_ACTIVITIES)
        }
        ("dashboard", "alerts") => Some(DASHBOARD_ALERTS),
        ("search", "global") => Some(SEARCH_GLOBAL),
        _ => None,
    };
    if let Some(path) = fixed {
        return Ok(path.to_string());
    }

    if (group, action) == ("alerts", "mark-read") || (group, action) == ("alerts", "markRead") {
        return Ok(alert_mark_read(require_id()?));
    }

    let resource: Resource = group.parse()?;
    match action {
        "list" => Ok(resource.list()),
        "create" => Ok(resource.create()),
        "get" => Ok(resource.get(require_id()?)),
        "update" => Ok(resource.update(require_id()?)),
        "delete" => Ok(resource.delete(require_id()?)),
        _ => Err(ImsError::unknown("endpoint", operation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crud_pattern() {
        for resource in Resource::ALL {
            let base = format!("/{}", resource.segment());
            assert_eq!(resource.list(), base);
            assert_eq!(resource.create(), base);
            assert_eq!(resource.get("x1"), format!("{}/x1", base));
            assert_eq!(resource.update("x1"), resource.delete("x1"));
        }
    }

    #[test]
    fn test_resolve_logical_names() {
        assert_eq!(resolve("modems.update", Some("modem-1")).unwrap(), "/modems/modem-1");
        assert_eq!(resolve("sim-cards.list", None).unwrap(), "/sim-cards");
        assert_eq!(
            resolve("alerts.mark-read", Some("alert-2")).unwrap(),
            "/alerts/alert-2/mark-read"
        );
        assert_eq!(
            resolve("workOrders.slaAlerts", None).unwrap(),
            WORK_ORDERS_SLA_ALERTS
        );
        assert!(resolve("modems.get", None).is_err());
        assert!(resolve("gadgets.list", None).is_err());
        assert!(resolve("modems", None).is_err());
    }

    #[test]
    fn test_resource_parse() {
        assert_eq!("sim_cards".parse::<Resource>().unwrap(), Resource::SimCards);
        assert_eq!("workOrders".parse::<Resource>().unwrap(), Resource::WorkOrders);
        assert_eq!("alerts".parse::<Resource>().unwrap(), Resource::Alerts);
        assert!("routers".parse::<Resource>().is_err());
    }
}
