//! Materialization, agenda and list-window behavior through the planner
mod common;

use bxg_tools::{ListWindow, RepeatRule, ScheduleEvent, TodoItem, TodoStatus};
use chrono::{Duration, TimeZone, Utc};
use common::{extract_id_from_response, get_test_planner, get_utc_planner};

#[tokio::test]
async fn test_daily_todo_materializes_inside_window() {
    let (planner, _dir) = get_utc_planner();
    planner
        .handle_add(
            "Stretch".into(),
            Some("2024-01-01T00:00:00Z".into()),
            Some("daily".into()),
            None,
            None,
            None,
        )
        .await
        .unwrap();

    let occurrences = planner.materialize_iso("2024-01-03T00:00:00Z", "2024-01-05T00:00:00Z");
    let starts: Vec<_> = occurrences.iter().map(|o| o.start).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
        ]
    );
    assert!(occurrences[0]
        .occurrence_id
        .ends_with(&format!("__{}", starts[0].timestamp_millis())));

    let text = planner
        .handle_materialize("2024-01-03T00:00:00Z".into(), "2024-01-05T00:00:00Z".into())
        .await
        .unwrap();
    assert!(text.starts_with("Found 3 occurrence(s)"));
    assert!(text.contains("- 2024-01-04 00:00:00 Stretch"));
}

#[tokio::test]
async fn test_done_one_shot_never_materializes() {
    let (planner, _dir) = get_utc_planner();
    let id = extract_id_from_response(
        &planner
            .handle_add("Once".into(), Some("2024-01-02".into()), None, None, None, None)
            .await
            .unwrap(),
    );
    planner
        .handle_update(id, None, None, None, Some("done".into()), None, None, None)
        .await
        .unwrap();

    assert!(planner.materialize_iso("2024-01-01T00:00:00Z", "2024-12-31T00:00:00Z").is_empty());
}

#[tokio::test]
async fn test_malformed_window_is_empty_not_error() {
    let (planner, _dir) = get_utc_planner();
    planner
        .handle_add("A".into(), Some("2024-01-02".into()), None, None, None, None)
        .await
        .unwrap();
    assert!(planner.materialize_iso("not a date", "2024-01-03T00:00:00Z").is_empty());
    assert_eq!(
        planner
            .handle_materialize("not a date".into(), "2024-01-03".into())
            .await
            .unwrap(),
        "No occurrences in range"
    );
    assert!(planner
        .handle_materialize("2024-01-01".into(), "2024-01-03".into())
        .await
        .unwrap()
        .starts_with("Found 1 occurrence(s)"));
}

#[tokio::test]
async fn test_monthly_rollover_carries_overflow() {
    let (planner, _dir) = get_utc_planner();
    planner
        .handle_add(
            "Month end report".into(),
            Some("2024-01-31T09:00:00Z".into()),
            Some("monthly".into()),
            None,
            None,
            None,
        )
        .await
        .unwrap();

    let occurrences = planner.materialize_iso("2024-02-01T00:00:00Z", "2024-04-30T00:00:00Z");
    let starts: Vec<_> = occurrences.iter().map(|o| o.start).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_occurrences_merge_sorted_across_todos() {
    let (planner, _dir) = get_utc_planner();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut weekly = TodoItem::new("Weekly", Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap(), now);
    weekly.repeat = RepeatRule::weekly;
    let mut hourly = TodoItem::new("Hourly", Utc.with_ymd_and_hms(2024, 1, 8, 6, 0, 0).unwrap(), now);
    hourly.repeat = RepeatRule::hourly;
    planner.upsert_todo(weekly).unwrap();
    planner.upsert_todo(hourly).unwrap();

    let occurrences = planner.materialize(
        Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap(),
    );
    let titles: Vec<&str> = occurrences.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["Hourly", "Hourly", "Hourly", "Weekly", "Hourly"]);
    assert!(occurrences.windows(2).all(|w| w[0].start <= w[1].start));
}

#[tokio::test]
async fn test_agenda_merges_todos_and_events() {
    let (planner, _dir) = get_utc_planner();
    let now = Utc::now();

    planner
        .handle_add(
            "Dentist".into(),
            Some((now + Duration::hours(2)).to_rfc3339()),
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();
    let done_id = extract_id_from_response(
        &planner
            .handle_add(
                "Finished".into(),
                Some((now + Duration::hours(3)).to_rfc3339()),
                Some("daily".into()),
                None,
                None,
                None,
            )
            .await
            .unwrap(),
    );
    planner.handle_cycle(vec![done_id.clone()]).await.unwrap();
    planner.handle_cycle(vec![done_id]).await.unwrap();

    let response = planner
        .handle_event_add("Team sync".into(), (now + Duration::hours(1)).to_rfc3339(), None)
        .await
        .unwrap();
    assert!(response.starts_with("Event created with ID: event_"));

    let events = planner.upcoming_events(now, 12);
    let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Team sync", "Dentist"]);
    assert!(events[1].id.starts_with("todo__"));
    assert_eq!(events[1].start, events[1].end);

    let text = planner.handle_agenda(Some(12)).await.unwrap();
    assert!(text.starts_with("Found 2 event(s)"));
}

#[tokio::test]
async fn test_agenda_hours_floor_is_one() {
    let (planner, _dir) = get_utc_planner();
    let now = Utc::now();
    planner
        .add_event(ScheduleEvent::manual("Soon", now + Duration::minutes(30), None))
        .unwrap();
    assert_eq!(planner.upcoming_events(now, 0).len(), 1);
}

#[tokio::test]
async fn test_agenda_with_huge_look_ahead() {
    let (planner, _dir) = get_utc_planner();
    planner
        .add_event(ScheduleEvent::manual("Next year", Utc::now() + Duration::days(365), None))
        .unwrap();

    let text = planner.handle_agenda(Some(i64::MAX)).await.unwrap();
    assert!(text.starts_with("Found 1 event(s)"));
    assert!(text.contains("Next year"));
}

#[tokio::test]
async fn test_event_end_before_start_rejected() {
    let (planner, _dir) = get_utc_planner();
    let err = planner
        .handle_event_add(
            "Backwards".into(),
            "2024-05-01 10:00".into(),
            Some("2024-05-01 09:00".into()),
        )
        .await;
    assert!(err.is_err());
    assert!(planner.manual_events().is_empty());
}

#[tokio::test]
async fn test_list_windows() {
    let (planner, _dir) = get_test_planner();
    let now = Utc::now();

    let overdue = TodoItem::new("Overdue", now - Duration::days(1), now);
    let mut done = TodoItem::new("Done", now - Duration::days(2), now);
    done.status = TodoStatus::done;
    let later = TodoItem::new("Later", now + Duration::days(40), now);
    planner.upsert_todo(overdue).unwrap();
    planner.upsert_todo(done).unwrap();
    planner.upsert_todo(later).unwrap();

    let titles = |window| {
        planner
            .visible(window, now)
            .into_iter()
            .map(|row| row.todo.title)
            .collect::<Vec<_>>()
    };
    assert_eq!(titles(ListWindow::expired), vec!["Overdue"]);
    assert_eq!(titles(ListWindow::done), vec!["Done"]);
    assert_eq!(titles(ListWindow::all), vec!["Done", "Overdue", "Later"]);
    assert!(!titles(ListWindow::month).contains(&"Later".to_string()));

    let text = planner
        .handle_list(None, Some("expired".into()), None, None, None, false, false)
        .await
        .unwrap();
    assert!(text.starts_with("Found 1 row(s)"));
    assert!(planner
        .handle_list(None, Some("fortnight".into()), None, None, None, false, false)
        .await
        .is_err());
}

#[tokio::test]
async fn test_day_counts_per_local_day() {
    let (planner, _dir) = get_test_planner();
    // Asia/Shanghai: 2024-05-01T20:00Z is already May 2 locally
    let now = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
    let mut daily = TodoItem::new("Evening", Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap(), now);
    daily.repeat = RepeatRule::daily;
    planner.upsert_todo(daily).unwrap();

    let counts = planner.day_counts(
        Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 4, 15, 59, 59).unwrap(),
    );
    let days: Vec<&str> = counts.keys().map(String::as_str).collect();
    assert_eq!(days, vec!["2024-05-02", "2024-05-03", "2024-05-04"]);
    assert!(counts.values().all(|count| *count == 1));
}
