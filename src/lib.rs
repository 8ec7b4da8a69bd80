//! # Telecom IMS - Inventory Data Access
//!
//! Data-access core for a telecom field-device inventory (modems, SIM cards,
//! work orders, test sessions, scrap requests). Every read and write can be
//! served by a built-in fixture store ("mock" mode) or by the REST API
//! ("live" mode); the switch between them is persisted and can be flipped at
//! any time without touching reads that already resolved.
//!
//! ## Features
//!
//! - **Data-Mode Switch**: persisted mock/live selector with indicator labels
//! - **Observable Queries**: last-issued-wins reads with stale-on-error data
//! - **Mutations**: verb-checked writes with success and failure notifications
//! - **REST Client**: timeouts, bearer tokens and uniform response envelopes
//! - **Mock Layer**: filtered, paginated fixtures with simulated latency
//! - **Dashboard Views**: modem statistics, SLA alerts, global search
//!
//! ## Quick Start
//!
//! ```no_run
//! use telecom_ims::prelude::*;
//!
//! # async fn run() -> telecom_ims::Result<()> {
//! let ctx = AppContext::in_memory(MockConfig::default())?;
//!
//! let depot = ctx.modems(&ModemFilters {
//!     status: Some("depot".into()),
//!     ..Default::default()
//! });
//! let state = depot.settled().await;
//! println!("{} modems in depot", state.data.unwrap_or_default().len());
//!
//! ctx.toggle_mode()?;
//! depot.refetch();
//! # Ok(())
//! # }
//! ```
//!
//! ## Writes
//!
//! ```no_run
//! use telecom_ims::prelude::*;
//! use serde_json::{json, Value};
//!
//! # async fn run(ctx: AppContext) -> telecom_ims::Result<()> {
//! let update = ctx.update::<Value>(Resource::Modems, "modem-1");
//! update.invoke(Some(json!({"notes": "antenna replaced"}))).await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod mock;
pub mod mode;
pub mod notify;
pub mod query;
pub mod storage;

// Re-export commonly used types
pub use context::AppContext;
pub use error::{ImsError, Result};
pub use mode::DataMode;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use telecom_ims::prelude::*;
    //! ```

    pub use crate::api::{ApiClient, ApiConfig, ApiResponse, DataSource, HttpMethod, Resource};
    pub use crate::config::ClientConfig;
    pub use crate::context::AppContext;
    pub use crate::error::{ImsError, Result};
    pub use crate::export::{export_modems, ExportFormat};
    pub use crate::fixtures::{
        FixtureStore, ModemFilters, RecordFilter, ScrapRequestFilters, TestSessionFilters,
        WorkOrderFilters,
    };
    pub use crate::mock::{MockConfig, MockDataSource};
    pub use crate::mode::{DataMode, ModeSwitch};
    pub use crate::notify::{LogNotifier, Notification, Notifier};
    pub use crate::query::{Mutation, Query, QueryKey, QueryState};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
}
