//! Personal time-tracking core.
//!
//! Users check in and out of work sessions, optionally take paid or unpaid
//! breaks, and review aggregated reports with AI-generated insights. This
//! crate is the session/break state machine and the report engine behind
//! that: it reconstructs current status and net worked hours from a flat log
//! of records, keeps an audit trail for deletions, and formats requests for
//! a text-completion collaborator.
//!
//! Storage goes through the [`LogStore`] trait; [`PgLogStore`] persists to
//! PostgreSQL and [`MemoryLogStore`] keeps everything in process. There is
//! no HTTP surface here; embedders wire [`SessionService`],
//! [`ReportService`], and [`InsightService`] into whatever frontend they
//! have.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::Error;
pub use models::{
    AuditRecord, Break, BreakStatus, Report, ReportEntry, ReportSummary, TimeLog,
    TimeLogWithBreaks,
};
pub use repositories::{LogStore, MemoryLogStore, PgLogStore};
pub use services::{
    advise, run_advisor, summarize, ChatMessage, CheckoutPolicy, CompletionClient,
    HttpCompletionClient, InsightService, ReportService, SessionService, SessionState,
};
pub use utils::time::TimeRange;
