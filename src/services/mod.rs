pub mod advisor;
pub mod insight;
pub mod report;
pub mod session;

pub use advisor::{advise, run_advisor};
pub use insight::{ChatMessage, CompletionClient, HttpCompletionClient, InsightService};
pub use report::{summarize, ReportService};
pub use session::{CheckoutPolicy, SessionService, SessionState};
