//! Advisory break suggestions.
//!
//! Purely advisory: nothing here mutates tracked state, and a skipped or
//! repeated evaluation changes no outcome.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::error::Error;
use crate::repositories::log_store::LogStore;
use crate::utils::time::minutes_between;

/// How often the advisory loop re-derives the working stretch.
pub const ADVICE_INTERVAL: Duration = Duration::from_secs(5 * 60);

const SHORT_BREAK_MINUTES: f64 = 45.0;
const LONG_BREAK_MINUTES: f64 = 90.0;

const SHORT_BREAK_ADVICE: &str =
    "You've been working for 45 minutes. Consider taking a short break!";
const LONG_BREAK_ADVICE: &str =
    "You've been working for over 90 minutes. Time for a proper break!";

/// Advice for a stretch of `worked_minutes` continuous work, if any.
///
/// Under 45 minutes there is nothing to say; 45 to under 90 suggests a short
/// break; from 90 a proper one.
pub fn advise(worked_minutes: f64) -> Option<&'static str> {
    if worked_minutes >= LONG_BREAK_MINUTES {
        Some(LONG_BREAK_ADVICE)
    } else if worked_minutes >= SHORT_BREAK_MINUTES {
        Some(SHORT_BREAK_ADVICE)
    } else {
        None
    }
}

/// Periodically re-evaluates the working stretch and publishes break advice.
///
/// Every [`ADVICE_INTERVAL`] (first evaluation immediately) the loop looks
/// up the open session and sends the advice for its current stretch over
/// `advice_tx`; while on break or with no open session it sends `None`. The
/// open session counts wherever its check-in fell, so an overnight stretch
/// keeps getting advice. Store failures are logged and the tick skipped. The
/// loop exits when `shutdown` turns true or every advice receiver is gone.
pub async fn run_advisor<S: LogStore>(
    store: S,
    user_id: String,
    advice_tx: watch::Sender<Option<&'static str>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(ADVICE_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let advice = match open_stretch_minutes(&store, &user_id).await {
                    Ok(Some(minutes)) => advise(minutes),
                    Ok(None) => None,
                    Err(err) => {
                        tracing::warn!(user_id = %user_id, "advisor state check failed: {err}");
                        continue;
                    }
                };
                if advice_tx.send(advice).is_err() {
                    break;
                }
            }
            changed = shutdown.changed() => {
                // A dropped shutdown sender counts as shutdown.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

/// Minutes worked in the open session, `None` with no session or on break.
async fn open_stretch_minutes<S: LogStore>(
    store: &S,
    user_id: &str,
) -> Result<Option<f64>, Error> {
    let Some(log) = store.find_open_log(user_id).await? else {
        return Ok(None);
    };
    if store.find_open_break(user_id, &log.id).await?.is_some() {
        return Ok(None);
    }
    Ok(Some(minutes_between(log.check_in, Utc::now())))
}
