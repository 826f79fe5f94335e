#![allow(dead_code)]
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use punchclock::{Break, ChatMessage, CompletionClient, Error, TimeLog};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, Once},
};

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// UTC instant on the given calendar day.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

/// Closed session spanning the given bounds.
pub fn closed_log(user_id: &str, check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> TimeLog {
    TimeLog::manual(user_id.to_string(), check_in, check_out, check_out)
}

/// Completed break attached to the given session.
pub fn closed_break(
    log: &TimeLog,
    is_paid: bool,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Break {
    let mut record = Break::start(
        log.user_id.clone(),
        log.id.clone(),
        is_paid,
        start_time,
        start_time,
    );
    record.finish(end_time, end_time);
    record
}

/// [`CompletionClient`] that replays a fixed script and records every call.
///
/// Clones share the script and the call log.
#[derive(Clone)]
pub struct ScriptedCompletionClient {
    responses: Arc<Mutex<VecDeque<Result<String, Error>>>>,
    calls: Arc<Mutex<Vec<(Vec<ChatMessage>, u32)>>>,
}

impl ScriptedCompletionClient {
    pub fn replying(text: &str) -> Self {
        Self::scripted(VecDeque::from([Ok(text.to_string())]))
    }

    pub fn failing() -> Self {
        Self::scripted(VecDeque::from([Err(Error::InsightUnavailable(
            anyhow::anyhow!("completion endpoint returned 500"),
        ))]))
    }

    fn scripted(responses: VecDeque<Result<String, Error>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, u32)> {
        self.calls.lock().expect("lock calls").clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> Result<String, Error> {
        self.calls
            .lock()
            .expect("lock calls")
            .push((messages, max_tokens));
        self.responses
            .lock()
            .expect("lock responses")
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
