//! Inventory record types
//!
//! Wire shapes for every entity, shared by fixtures and live responses.
//! Cross-record references are plain id strings and are not checked.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operator company owning devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Depot,
    Field,
    Headquarters,
}

/// Depot, field office or lab site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub address: Option<String>,
    /// `"lat,lon"`
    pub coordinates: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Modem lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModemStatus {
    FieldActive,
    Depot,
    Testing,
    Repair,
    Scrap,
}

impl ModemStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModemStatus::FieldActive => "field_active",
            ModemStatus::Depot => "depot",
            ModemStatus::Testing => "testing",
            ModemStatus::Repair => "repair",
            ModemStatus::Scrap => "scrap",
        }
    }
}

/// Field modem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modem {
    pub id: String,
    pub imei: String,
    pub model: String,
    pub brand: String,
    pub status: ModemStatus,
    pub location_id: Option<String>,
    pub company_id: Option<String>,
    pub warranty_end_date: Option<DateTime<Utc>>,
    pub repair_count: u32,
    /// dBm
    pub last_signal_strength: Option<i32>,
    /// Percent
    pub battery_level: Option<u8>,
    pub firmware_version: Option<String>,
    pub is_online: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Modem {
    /// Whether the warranty has run out at `now`
    pub fn warranty_expired(&self, now: DateTime<Utc>) -> bool {
        self.warranty_end_date.is_some_and(|end| end < now)
    }
}

/// SIM card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimCard {
    pub id: String,
    pub iccid: String,
    pub phone_number: Option<String>,
    pub operator: String,
    pub modem_id: Option<String>,
    pub pool_id: Option<String>,
    pub is_active: bool,
    /// MB
    pub data_allowance: u64,
    /// MB
    pub data_used: u64,
    pub billing_status: String,
    pub region_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SimCard {
    /// Share of the allowance consumed, 0-100
    pub fn usage_percent(&self) -> f64 {
        if self.data_allowance == 0 {
            return 0.0;
        }
        (self.data_used as f64 / self.data_allowance as f64 * 100.0).min(100.0)
    }
}

/// Work order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderType {
    Installation,
    Repair,
    Replacement,
    Maintenance,
}

/// Work order priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderPriority {
    Low,
    Normal,
    High,
    Critical,
}

impl WorkOrderPriority {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderPriority::Low => "low",
            WorkOrderPriority::Normal => "normal",
            WorkOrderPriority::High => "high",
            WorkOrderPriority::Critical => "critical",
        }
    }
}

/// Work order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Pending => "pending",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Completed => "completed",
            WorkOrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Field service work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub order_number: String,
    pub modem_id: Option<String>,
    pub assigned_user_id: Option<String>,
    #[serde(rename = "type")]
    pub order_type: WorkOrderType,
    pub priority: WorkOrderPriority,
    pub status: WorkOrderStatus,
    pub description: String,
    pub sla_deadline: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkOrder {
    /// Time left until the SLA deadline; negative once overdue
    pub fn sla_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.sla_deadline.map(|deadline| deadline - now)
    }

    /// Whether the SLA deadline has passed at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.sla_remaining(now).is_some_and(|left| left < Duration::zero())
    }
}

/// One step of a test scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    pub step: u32,
    pub action: String,
    pub expected: String,
}

/// Lab test scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestScenario {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<TestStep>,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Test session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestSessionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TestSessionStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TestSessionStatus::Pending => "pending",
            TestSessionStatus::Running => "running",
            TestSessionStatus::Completed => "completed",
            TestSessionStatus::Failed => "failed",
            TestSessionStatus::Cancelled => "cancelled",
        }
    }
}

/// Test verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestResult {
    Pass,
    Fail,
}

/// Bench log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// A scenario run on a lab bench
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSession {
    pub id: String,
    pub modem_id: String,
    pub scenario_id: String,
    pub technician_id: Option<String>,
    pub bench_number: Option<String>,
    pub status: TestSessionStatus,
    pub result: Option<TestResult>,
    pub logs: Vec<SessionLog>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Scrap review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapStatus {
    Pending,
    Approved,
    Rejected,
}

impl ScrapStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapStatus::Pending => "pending",
            ScrapStatus::Approved => "approved",
            ScrapStatus::Rejected => "rejected",
        }
    }
}

/// Request to retire a modem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapRequest {
    pub id: String,
    pub modem_id: String,
    pub requested_by: String,
    pub reason: String,
    pub status: ScrapStatus,
    pub reviewed_by: Option<String>,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Operational alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    /// e.g. `sla_warning`, `device_offline`, `low_battery`
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub is_read: bool,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Audit trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// e.g. `admin`, `technician`
    pub role: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last", falling back to the email address
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// A record with a stable identifier
pub trait Record {
    /// Unique id
    fn id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_record!(
    Company,
    Location,
    Modem,
    SimCard,
    WorkOrder,
    TestScenario,
    TestSession,
    ScrapRequest,
    Alert,
    ActivityLog,
    User,
);
