use thiserror::Error;

/// Errors surfaced by the tracking core.
///
/// State-machine violations carry no payload and propagate to the caller
/// unchanged. `StoreUnavailable` and `InsightUnavailable` wrap the failure of
/// the respective collaborator; an insight failure never affects tracked
/// state.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a session is already checked in")]
    AlreadyCheckedIn,

    #[error("no session is currently active")]
    NoActiveSession,

    #[error("a break is already active")]
    BreakAlreadyActive,

    #[error("no break is currently active")]
    NoActiveBreak,

    #[error("a break is still open; end it before checking out")]
    BreakStillOpen,

    #[error("check-out must be later than check-in")]
    InvalidTimeRange,

    #[error("time log not found: {0}")]
    LogNotFound(String),

    #[error("log store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("insight collaborator unavailable: {0}")]
    InsightUnavailable(#[source] anyhow::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::LogNotFound("record not found".to_string()),
            _ => {
                tracing::error!("store error: {:?}", err);
                Error::StoreUnavailable(err.into())
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::InsightUnavailable(err.into())
    }
}
