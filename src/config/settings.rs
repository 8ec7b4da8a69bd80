//! Configuration settings for Telecom IMS
//!
//! Defines the command-line interface, its environment fallbacks and the
//! [`ClientConfig`] the application context is built from.

use crate::api::{ApiConfig, Resource, DEFAULT_BASE_URL};
use crate::fixtures::*;
use crate::mock::MockConfig;
use crate::mode::DataMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Telecom IMS - inventory data access in mock or live mode
#[derive(Parser, Debug, Clone)]
#[command(name = "telecom-ims")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and update telecom inventory through mock fixtures or the live API")]
#[command(long_about = r#"
Telecom IMS reads and writes modem, SIM card, work order, test and scrap
records. In mock mode every request is answered from built-in fixtures;
in live mode requests go to the REST API.

Examples:
  telecom-ims mode show                         # Current data mode
  telecom-ims list modems --status depot        # Filtered list
  telecom-ims --mock-latency-ms 0 stats         # Dashboard numbers, no delay
  telecom-ims mode set live && telecom-ims sla-alerts
"#)]
pub struct CliArgs {
    /// Base URL of the REST API
    #[arg(long, env = "IMS_API_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub api_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "IMS_API_TIMEOUT_MS", default_value = "10000", value_name = "MS")]
    pub timeout_ms: u64,

    /// Start in mock mode when no mode has been saved yet
    #[arg(long, env = "IMS_ENABLE_MOCK_DATA", value_name = "BOOL")]
    pub enable_mock_data: Option<bool>,

    /// File holding the saved mode and auth token
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Artificial delay of mock reads in milliseconds (0 disables it)
    #[arg(long, default_value = "300", value_name = "MS")]
    pub mock_latency_ms: u64,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show or change the data mode
    #[command(name = "mode")]
    Mode {
        #[command(subcommand)]
        action: ModeAction,
    },

    /// List records of a resource
    #[command(name = "list")]
    List {
        /// Resource name, e.g. modems or work-orders
        resource: Resource,
        #[command(flatten)]
        filters: ListFilters,
    },

    /// Show one record
    #[command(name = "get")]
    Get {
        /// Resource name
        resource: Resource,
        /// Record id
        id: String,
    },

    /// Dashboard statistics
    #[command(name = "stats")]
    Stats,

    /// Most recent activity entries
    #[command(name = "activities")]
    Activities,

    /// Unread dashboard alerts
    #[command(name = "alerts")]
    Alerts,

    /// Work orders at risk of missing their SLA
    #[command(name = "sla-alerts")]
    SlaAlerts,

    /// Search modems, work orders and SIM cards
    #[command(name = "search")]
    Search {
        /// Search text
        query: String,
    },

    /// Export modems to a dated file
    #[command(name = "export")]
    Export {
        /// Output directory
        #[arg(long, default_value = ".", value_name = "DIR")]
        dir: PathBuf,
    },

    /// Create a record
    #[command(name = "create")]
    Create {
        resource: Resource,
        /// JSON payload
        #[arg(long, value_name = "JSON")]
        data: Option<String>,
    },

    /// Update a record
    #[command(name = "update")]
    Update {
        resource: Resource,
        id: String,
        /// JSON payload
        #[arg(long, value_name = "JSON")]
        data: Option<String>,
    },

    /// Delete a record
    #[command(name = "delete")]
    Delete { resource: Resource, id: String },

    /// Mark an alert as read
    #[command(name = "mark-read")]
    MarkRead { id: String },

    /// Save a bearer token for live requests
    #[command(name = "login")]
    Login {
        #[arg(long, env = "IMS_AUTH_TOKEN", value_name = "TOKEN")]
        token: String,
    },

    /// Forget the saved bearer token
    #[command(name = "logout")]
    Logout,
}

/// `mode` actions
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ModeAction {
    /// Print the current mode
    Show,
    /// Select a mode
    Set {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Flip between mock and live
    Toggle,
}

/// Mode names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Mock,
    Live,
}

impl From<ModeArg> for DataMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Mock => DataMode::Mock,
            ModeArg::Live => DataMode::Live,
        }
    }
}

/// Filter and paging flags of `list`; each applies to the resources that
/// know the parameter
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    /// Location id
    #[arg(long)]
    pub location: Option<String>,
    /// Company id
    #[arg(long)]
    pub company: Option<String>,
    /// Free text over IMEI, model and brand
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Assigned user id
    #[arg(long)]
    pub assigned_user: Option<String>,
    /// Modem id
    #[arg(long)]
    pub modem: Option<String>,
    /// Technician id
    #[arg(long)]
    pub technician: Option<String>,
    #[arg(long)]
    pub page: Option<usize>,
    #[arg(long)]
    pub limit: Option<usize>,
}

impl ListFilters {
    /// Query parameters for `resource`
    pub fn to_params(&self, resource: Resource) -> crate::api::QueryParams {
        let mut params = match resource {
            Resource::Modems => ModemFilters {
                status: self.status.clone(),
                brand: self.brand.clone(),
                model: self.model.clone(),
                location_id: self.location.clone(),
                company_id: self.company.clone(),
                search: self.search.clone(),
            }
            .to_params(),
            Resource::WorkOrders => WorkOrderFilters {
                status: self.status.clone(),
                priority: self.priority.clone(),
                assigned_user_id: self.assigned_user.clone(),
            }
            .to_params(),
            Resource::TestSessions => TestSessionFilters {
                status: self.status.clone(),
                modem_id: self.modem.clone(),
                technician_id: self.technician.clone(),
            }
            .to_params(),
            Resource::ScrapRequests => ScrapRequestFilters {
                status: self.status.clone(),
            }
            .to_params(),
            _ => Default::default(),
        };
        if let Some(page) = self.page {
            params.insert("page".to_string(), page.to_string());
        }
        if let Some(limit) = self.limit {
            params.insert("limit".to_string(), limit.to_string());
        }
        params
    }
}

/// Everything needed to build an [`AppContext`](crate::context::AppContext)
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Live API settings
    pub api: ApiConfig,
    /// Mode used when none has been saved; `None` falls back to mock
    pub enable_mock_data: Option<bool>,
    /// Mock layer settings
    pub mock: MockConfig,
    /// State file; `None` uses the platform data directory
    pub state_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Build from parsed command-line arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            api: ApiConfig {
                base_url: args.api_url.clone(),
                timeout: Duration::from_millis(args.timeout_ms),
                ..Default::default()
            },
            enable_mock_data: args.enable_mock_data,
            mock: MockConfig {
                latency: Duration::from_millis(args.mock_latency_ms),
                now: None,
            },
            state_file: args.state_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["telecom-ims", "stats"]).unwrap();
        let config = ClientConfig::from_cli(&args);
        assert_eq!(config.api.timeout, Duration::from_millis(10_000));
        assert_eq!(config.mock.latency, Duration::from_millis(300));
        assert!(matches!(args.command, Commands::Stats));
    }

    #[test]
    fn test_list_flags_map_per_resource() {
        let args = CliArgs::try_parse_from([
            "telecom-ims",
            "list",
            "work_orders",
            "--status",
            "in_progress",
            "--brand",
            "ZTE",
            "--page",
            "2",
        ])
        .unwrap();
        let Commands::List { resource, filters } = args.command else {
            panic!("expected list");
        };
        assert_eq!(resource, Resource::WorkOrders);

        let params = filters.to_params(resource);
        assert_eq!(params.get("status").map(String::as_str), Some("in_progress"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        // brand is not a work-order parameter
        assert!(!params.contains_key("brand"));
    }

    #[test]
    fn test_mode_set() {
        let args = CliArgs::try_parse_from(["telecom-ims", "mode", "set", "live"]).unwrap();
        match args.command {
            Commands::Mode {
                action: ModeAction::Set { mode },
            } => assert_eq!(DataMode::from(mode), DataMode::Live),
            other => panic!("unexpected {:?}", other),
        }
    }
}
