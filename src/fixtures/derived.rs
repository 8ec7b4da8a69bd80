//! Views computed from the fixture records
//!
//! Nothing here is cached: every call reads the current records.

use super::filters::{contains_ci, modem_matches_text};
use super::records::*;
use super::FixtureStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Work orders closer than this many hours to their SLA deadline raise an alert
pub const SLA_WARNING_HOURS: i64 = 2;

/// How many entries the recent-activity feed carries
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Label rendered for a reference that points at no record
pub const UNKNOWN_REFERENCE: &str = "Unknown";

/// Modem counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModemStats {
    pub total: usize,
    pub field_active: usize,
    pub depot: usize,
    pub testing: usize,
    pub repair: usize,
    pub scrap: usize,
}

impl ModemStats {
    /// Count `modems` by status
    pub fn from_modems(modems: &[Modem]) -> Self {
        modems.iter().fold(
            Self {
                total: modems.len(),
                ..Default::default()
            },
            |mut stats, modem| {
                match modem.status {
                    ModemStatus::FieldActive => stats.field_active += 1,
                    ModemStatus::Depot => stats.depot += 1,
                    ModemStatus::Testing => stats.testing += 1,
                    ModemStatus::Repair => stats.repair += 1,
                    ModemStatus::Scrap => stats.scrap += 1,
                }
                stats
            },
        )
    }
}

/// Dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stats: ModemStats,
    /// Unread alerts
    pub alert_count: usize,
    pub recent_activities: Vec<ActivityLog>,
}

/// Global search hits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub modems: Vec<Modem>,
    pub work_orders: Vec<WorkOrder>,
    pub sim_cards: Vec<SimCard>,
}

impl SearchResults {
    /// Total hits across all groups
    pub fn len(&self) -> usize {
        self.modems.len() + self.work_orders.len() + self.sim_cards.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The SLA warning window as a duration
pub fn sla_warning_window() -> Duration {
    Duration::hours(SLA_WARNING_HOURS)
}

/// Whether `order` is in progress with a deadline inside the warning window
/// at `now`. Overdue orders qualify.
pub fn needs_sla_attention(order: &WorkOrder, now: DateTime<Utc>) -> bool {
    order.status == WorkOrderStatus::InProgress
        && order
            .sla_remaining(now)
            .is_some_and(|left| left < sla_warning_window())
}

impl FixtureStore {
    /// Modem counts by status
    pub fn modem_stats(&self) -> ModemStats {
        ModemStats::from_modems(&self.modems)
    }

    /// Alerts not yet read
    pub fn unread_alerts(&self) -> Vec<Alert> {
        self.alerts.iter().filter(|a| !a.is_read).cloned().collect()
    }

    /// Newest activity entries first
    pub fn recent_activities(&self, limit: usize) -> Vec<ActivityLog> {
        let mut logs = self.activity_logs.clone();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        logs.truncate(limit);
        logs
    }

    /// Dashboard summary
    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            stats: self.modem_stats(),
            alert_count: self.alerts.iter().filter(|a| !a.is_read).count(),
            recent_activities: self.recent_activities(RECENT_ACTIVITY_LIMIT),
        }
    }

    /// Work orders needing SLA attention at `now`
    pub fn sla_alerts(&self, now: DateTime<Utc>) -> Vec<WorkOrder> {
        self.work_orders
            .iter()
            .filter(|wo| needs_sla_attention(wo, now))
            .cloned()
            .collect()
    }

    /// Case-insensitive search over modems, work orders and SIM cards.
    /// An empty query matches nothing; whitespace is matched literally.
    pub fn search(&self, query: &str) -> SearchResults {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }

        SearchResults {
            modems: self
                .modems
                .iter()
                .filter(|m| modem_matches_text(m, &needle))
                .cloned()
                .collect(),
            work_orders: self
                .work_orders
                .iter()
                .filter(|wo| {
                    contains_ci(&wo.order_number, &needle) || contains_ci(&wo.description, &needle)
                })
                .cloned()
                .collect(),
            sim_cards: self
                .sim_cards
                .iter()
                .filter(|sim| {
                    contains_ci(&sim.iccid, &needle)
                        || sim
                            .phone_number
                            .as_deref()
                            .is_some_and(|phone| phone.contains(&needle))
                })
                .cloned()
                .collect(),
        }
    }

    /// Company name for a reference, or [`UNKNOWN_REFERENCE`]
    pub fn company_name(&self, id: Option<&str>) -> &str {
        id.and_then(|id| self.companies.iter().find(|c| c.id == id))
            .map_or(UNKNOWN_REFERENCE, |c| c.name.as_str())
    }

    /// Location name for a reference, or [`UNKNOWN_REFERENCE`]
    pub fn location_name(&self, id: Option<&str>) -> &str {
        id.and_then(|id| self.locations.iter().find(|l| l.id == id))
            .map_or(UNKNOWN_REFERENCE, |l| l.name.as_str())
    }
}
