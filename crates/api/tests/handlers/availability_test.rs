use axum::http::StatusCode;
use chrono::Weekday;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tutorsync_core::models::{availability::AvailabilityEntry, user::Role};
use tutorsync_db::Store;

use crate::test_utils::{as_user, t, TestContext};

#[tokio::test]
async fn test_save_availability_replaces_existing_windows() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    // Existing Monday 08:00-10:00 window
    ctx.store
        .replace_availability(
            tutor.id,
            vec![AvailabilityEntry {
                day: Weekday::Mon,
                start_time: t(8, 0),
                end_time: t(10, 0),
            }],
        )
        .await
        .unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/tutor/availability/save")
        .add_header(name, value)
        .form(&[
            ("monday_enabled", "on"),
            ("monday_start_time", "10:00"),
            ("monday_end_time", "12:00"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Exactly one Monday window remains, the new one
    let windows = ctx.store.list_availability(tutor.id).await.unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].day, Weekday::Mon);
    assert_eq!(windows[0].start_time, t(10, 0));
    assert_eq!(windows[0].end_time, t(12, 0));
}

#[tokio::test]
async fn test_save_availability_multiple_days() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/tutor/availability/save")
        .add_header(name, value)
        .form(&[
            ("monday_enabled", "on"),
            ("monday_start_time", "09:00"),
            ("monday_end_time", "11:00"),
            ("tuesday_enabled", "on"),
            ("tuesday_start_time", "14:00"),
            ("tuesday_end_time", "16:00"),
            // Unchecked days are ignored even with times filled in
            ("friday_start_time", "09:00"),
            ("friday_end_time", "10:00"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["day"], "Monday");
    assert_eq!(body[1]["day"], "Tuesday");
    assert_eq!(ctx.store.list_availability(tutor.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_save_availability_with_nothing_enabled_clears() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    ctx.store
        .replace_availability(
            tutor.id,
            vec![AvailabilityEntry {
                day: Weekday::Wed,
                start_time: t(8, 0),
                end_time: t(9, 0),
            }],
        )
        .await
        .unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/tutor/availability/save")
        .add_header(name, value)
        .form(&[("monday_start_time", "09:00")])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(ctx.store.list_availability(tutor.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_availability_rejects_inverted_window() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/tutor/availability/save")
        .add_header(name, value)
        .form(&[
            ("monday_enabled", "on"),
            ("monday_start_time", "12:00"),
            ("monday_end_time", "10:00"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert!(body["fields"]["monday_end_time"].is_array());
    assert!(ctx.store.list_availability(tutor.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_availability_rejects_repeated_day_fields() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    ctx.store
        .replace_availability(
            tutor.id,
            vec![AvailabilityEntry {
                day: Weekday::Fri,
                start_time: t(8, 0),
                end_time: t(9, 0),
            }],
        )
        .await
        .unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/tutor/availability/save")
        .add_header(name, value)
        .form(&[
            ("monday_enabled", "on"),
            ("monday_start_time", "09:00"),
            ("monday_end_time", "10:00"),
            ("monday_start_time", "09:00"),
            ("monday_end_time", "10:00"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert!(body["fields"]["monday_start_time"].is_array());
    assert!(body["fields"]["monday_end_time"].is_array());

    // The previous set is untouched
    let windows = ctx.store.list_availability(tutor.id).await.unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].day, Weekday::Fri);
}

#[tokio::test]
async fn test_availability_is_tutor_only() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;

    let (name, value) = as_user(&student);
    let response = ctx
        .server
        .post("/tutor/availability/save")
        .add_header(name, value)
        .form(&[
            ("monday_enabled", "on"),
            ("monday_start_time", "09:00"),
            ("monday_end_time", "11:00"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert!(ctx.store.list_availability(student.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_availability_lists_in_week_order() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    ctx.store
        .replace_availability(
            tutor.id,
            vec![
                AvailabilityEntry { day: Weekday::Fri, start_time: t(9, 0), end_time: t(10, 0) },
                AvailabilityEntry { day: Weekday::Mon, start_time: t(13, 0), end_time: t(14, 0) },
                AvailabilityEntry { day: Weekday::Mon, start_time: t(8, 0), end_time: t(9, 0) },
            ],
        )
        .await
        .unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx.server.get("/tutor/availability/save").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let order: Vec<(String, String)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| (w["day"].as_str().unwrap().to_string(), w["start_time"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Monday".to_string(), "08:00:00".to_string()),
            ("Monday".to_string(), "13:00:00".to_string()),
            ("Friday".to_string(), "09:00:00".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_json_availability_allows_several_slots_per_day() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/api/tutor/availability")
        .add_header(name, value)
        .json(&json!({
            "monday_enabled": true,
            "monday_slots": [
                { "start_time": "08:00", "end_time": "10:00" },
                { "start_time": "14:00", "end_time": "16:00" }
            ],
            "tuesday_enabled": false,
            "tuesday_slots": [{ "start_time": "08:00", "end_time": "10:00" }]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(ctx.store.list_availability(tutor.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_json_availability_duplicate_rolls_back() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    ctx.store
        .replace_availability(
            tutor.id,
            vec![AvailabilityEntry { day: Weekday::Thu, start_time: t(8, 0), end_time: t(9, 0) }],
        )
        .await
        .unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/api/tutor/availability")
        .add_header(name, value)
        .json(&json!({
            "monday_enabled": true,
            "monday_slots": [
                { "start_time": "08:00", "end_time": "10:00" },
                { "start_time": "08:00", "end_time": "10:00" }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // The previous set survives untouched
    let windows = ctx.store.list_availability(tutor.id).await.unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].day, Weekday::Thu);
}
