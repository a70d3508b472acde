//! Countdown, editor documents and settings commands
mod common;

use bxg_tools::storage::keys;
use bxg_tools::{ClockState, Language};
use chrono::{Duration, Utc};
use common::{extract_id_from_response, get_test_planner};

#[tokio::test]
async fn test_countdown_lifecycle() {
    let (planner, _dir) = get_test_planner();
    let target = (Utc::now() + Duration::hours(2)).to_rfc3339();

    let started = planner.handle_countdown_start(target).await.unwrap();
    assert!(started.contains("(running)"));
    assert!(started.starts_with("Countdown 01:59:") || started.starts_with("Countdown 02:00:00"));

    let paused = planner.handle_countdown_pause().await.unwrap();
    assert!(paused.contains("(paused)"));
    assert!(planner.handle_countdown_pause().await.is_err());

    let resumed = planner.handle_countdown_resume().await.unwrap();
    assert!(resumed.contains("(running)"));
    assert!(ClockState::load(planner.storage()).running);

    assert_eq!(planner.handle_countdown_mute().await.unwrap(), "Countdown muted");
    let reset = planner.handle_countdown_reset().await.unwrap();
    assert_eq!(reset, "Countdown 00:00:00 (idle), muted");
    assert!(planner.handle_countdown_resume().await.is_err());
}

#[tokio::test]
async fn test_countdown_rejects_past_target() {
    let (planner, _dir) = get_test_planner();
    let past = (Utc::now() - Duration::minutes(1)).to_rfc3339();
    let err = planner.handle_countdown_start(past).await.unwrap_err();
    assert_eq!(err.to_string(), "Target time must be later than the current time");
}

#[tokio::test]
async fn test_countdown_reports_finish_once() {
    let (planner, _dir) = get_test_planner();
    let now = Utc::now();
    let mut clock = ClockState::default();
    clock.start(now + Duration::milliseconds(1), now - Duration::seconds(1)).unwrap();
    planner.save_clock(&clock).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let status = planner.handle_countdown_status().await.unwrap();
    assert!(status.starts_with("Countdown finished.\nCountdown 00:00:00 (idle)"));
    let again = planner.handle_countdown_status().await.unwrap();
    assert_eq!(again, "Countdown 00:00:00 (idle)");
}

#[tokio::test]
async fn test_docs_commands() {
    let (planner, _dir) = get_test_planner();

    let list = planner.handle_docs_list().await.unwrap();
    assert!(list.starts_with("1 document(s):"));
    assert!(list.contains("[doc_default]"));

    let id = extract_id_from_response(&planner.handle_docs_new().await.unwrap());
    assert!(id.starts_with("doc_"));

    let saved = planner
        .handle_docs_save(id.clone(), "Trip plan".into(), "- pack\n- go".into())
        .await
        .unwrap();
    assert_eq!(saved, format!("Document {} saved (Trip plan)", id));
    assert_eq!(
        planner.handle_docs_show(id.clone()).await.unwrap(),
        "# Trip plan\n\n- pack\n- go"
    );

    planner.handle_docs_remove(id.clone()).await.unwrap();
    planner.handle_docs_remove("doc_default".into()).await.unwrap();
    let docs = planner.editor_docs();
    assert_eq!(docs.docs().len(), 1);
    assert_eq!(docs.docs()[0].id, "doc_default");
    assert!(planner.handle_docs_show(id).await.is_err());
}

#[tokio::test]
async fn test_docs_new_keeps_docs_stored_without_timestamps() {
    let (planner, _dir) = get_test_planner();
    std::fs::write(
        planner.storage().path_for(keys::EDITOR_DOCS),
        r#"[
            {"id": "doc_keep", "title": "Keep me", "content": "body", "updatedAtISO": "2024-05-01T00:00:00Z"},
            {"id": "doc_legacy", "title": "Old", "content": "from an older release"}
        ]"#,
    )
    .unwrap();

    planner.handle_docs_new().await.unwrap();

    let docs = planner.editor_docs();
    assert_eq!(docs.docs().len(), 3);
    assert_eq!(docs.get("doc_keep").unwrap().content, "body");
    assert_eq!(docs.get("doc_legacy").unwrap().title, "Old");
}

#[tokio::test]
async fn test_settings_commands() {
    let (planner, _dir) = get_test_planner();
    assert_eq!(
        planner.handle_settings(None, None, None).await.unwrap(),
        "language: zh\ntimezone: Asia/Shanghai\ntheme: system"
    );

    let updated = planner
        .handle_settings(Some("en".into()), Some("Europe/Berlin".into()), Some("dark".into()))
        .await
        .unwrap();
    assert_eq!(updated, "language: en\ntimezone: Europe/Berlin\ntheme: dark");
    assert_eq!(planner.language(), Language::en);

    let err = planner
        .handle_settings(None, Some("Mars/Olympus".into()), None)
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid timezone 'Mars/Olympus'"));
    assert_eq!(planner.tz(), chrono_tz::Europe::Berlin);
}
