pub mod audit;
pub mod breaks;
pub mod report;
pub mod time_log;

pub use audit::AuditRecord;
pub use breaks::{Break, BreakStatus};
pub use report::{Report, ReportEntry, ReportSummary};
pub use time_log::{TimeLog, TimeLogWithBreaks};
