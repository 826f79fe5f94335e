use punchclock::{Error, InsightService, TimeLog, TimeLogWithBreaks};

#[path = "support/mod.rs"]
mod support;

fn entry(log: TimeLog) -> TimeLogWithBreaks {
    TimeLogWithBreaks {
        log,
        breaks: Vec::new(),
    }
}

#[tokio::test]
async fn insight_analyze_sends_rows_under_the_analysis_prompt() {
    support::init_tracing();
    let client = support::ScriptedCompletionClient::replying("You work steady mornings.");
    let service = InsightService::new(client.clone(), chrono_tz::UTC);
    let entries = vec![
        entry(support::closed_log(
            "alice",
            support::at(2024, 3, 4, 9, 0),
            support::at(2024, 3, 4, 17, 0),
        )),
        entry(TimeLog::open(
            "alice".to_string(),
            support::at(2024, 3, 5, 9, 0),
            support::at(2024, 3, 5, 9, 0),
        )),
    ];

    let reply = service.analyze(&entries).await.expect("analyze");
    assert_eq!(reply, "You work steady mornings.");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    let (messages, max_tokens) = &calls[0];
    assert_eq!(*max_tokens, 150);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert!(messages[0].content.contains("time management assistant"));
    assert_eq!(messages[1].role, "user");
    assert!(messages[1]
        .content
        .starts_with("Analyze this time log data"));
    assert!(messages[1].content.contains("\"date\":\"2024-03-04\""));
    assert!(messages[1].content.contains("\"checkIn\":\"09:00\""));
    assert!(messages[1].content.contains("\"checkOut\":\"17:00\""));
    assert!(messages[1].content.contains("\"duration\":\"8.00 hours\""));
    assert!(messages[1].content.contains("\"duration\":\"In progress\""));
}

#[tokio::test]
async fn insight_analyze_renders_times_in_the_service_timezone() {
    let client = support::ScriptedCompletionClient::replying("ok");
    let service = InsightService::new(client.clone(), chrono_tz::Asia::Tokyo);
    let entries = vec![entry(support::closed_log(
        "alice",
        support::at(2024, 3, 4, 0, 0),
        support::at(2024, 3, 4, 8, 0),
    ))];

    service.analyze(&entries).await.expect("analyze");

    let calls = client.calls();
    let content = &calls[0].0[1].content;
    assert!(content.contains("\"date\":\"2024-03-04\""));
    assert!(content.contains("\"checkIn\":\"09:00\""));
    assert!(content.contains("\"checkOut\":\"17:00\""));
}

#[tokio::test]
async fn insight_break_suggestion_reports_worked_minutes() {
    let client = support::ScriptedCompletionClient::replying("Stretch your legs.");
    let service = InsightService::new(client.clone(), chrono_tz::UTC);

    let reply = service.break_suggestion(95).await.expect("suggestion");
    assert_eq!(reply, "Stretch your legs.");

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    let (messages, max_tokens) = &calls[0];
    assert_eq!(*max_tokens, 100);
    assert_eq!(messages.len(), 2);
    assert!(messages[0].content.contains("wellness assistant"));
    assert_eq!(
        messages[1].content,
        "I've been working for 95 minutes. Suggest a quick break activity."
    );
}

#[tokio::test]
async fn insight_client_failures_surface_unchanged() {
    let client = support::ScriptedCompletionClient::failing();
    let service = InsightService::new(client, chrono_tz::UTC);

    let err = service.break_suggestion(30).await.expect_err("suggestion");
    assert!(matches!(err, Error::InsightUnavailable(_)));
}
