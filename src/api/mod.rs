//! Live data-access layer
//!
//! REST client, endpoint registry and the response envelope shared with the
//! mock layer.
//!
//! ## Endpoints
//!
//! | Group | Paths |
//! |-------|-------|
//! | CRUD | `/{resource}`, `/{resource}/{id}` for companies, locations, modems, sim-cards, work-orders, test-scenarios, test-sessions, scrap-requests, alerts |
//! | Modems | `/modems/search`, `/modems/export` |
//! | Work orders | `/work-orders/sla-alerts` |
//! | Alerts | `/alerts/{id}/mark-read` |
//! | Dashboard | `/dashboard/stats`, `/dashboard/recent-activities`, `/dashboard/alerts` |
//! | Search | `/search` |
//! | Auth | `/auth/login`, `/auth/logout`, `/auth/refresh`, `/auth/profile` |

mod client;
pub mod endpoints;
mod models;
mod source;

pub use client::*;
pub use endpoints::Resource;
pub use models::*;
pub use source::*;
