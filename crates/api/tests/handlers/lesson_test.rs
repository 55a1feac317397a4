use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tutorsync_core::models::{lesson::LessonDuration, time::TimeOfDay, user::Role};
use tutorsync_db::Store;
use uuid::Uuid;

use crate::test_utils::{as_id, as_user, lesson, t, TestContext};

fn request_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("knowledge_area", "scala"),
        ("term", "sept-dec"),
        ("start_time", "09:30"),
        ("duration", "90"),
        ("days", "mon"),
        ("days", "wed"),
        ("venue_preference", "online"),
        // Derived fields sent by a client are ignored
        ("time_of_day", "evening"),
    ]
}

#[tokio::test]
async fn test_lesson_request_choices() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;

    let (name, value) = as_user(&student);
    let response = ctx.server.get("/dashboard/lesson-request/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["durations"], json!([30, 60, 90, 120]));
    assert_eq!(body["venues"], json!(["online", "onsite"]));
    assert_eq!(body["days"][0], "mon");
    assert_eq!(body["days"][6], "sun");
}

#[tokio::test]
async fn test_create_lesson_request_derives_times() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;

    let (name, value) = as_user(&student);
    let response = ctx
        .server
        .post("/dashboard/lesson-request/")
        .add_header(name, value)
        .form(&request_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["student_id"], student.id.to_string());
    assert_eq!(body["end_time"], "11:00:00");
    assert_eq!(body["time_of_day"], "morning");
    assert_eq!(body["days"], json!(["mon", "wed"]));

    let stored = ctx.store.lesson_requests_for_student(student.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].formatted_days(), "Monday, Wednesday");
    assert_eq!(stored[0].time_range(), "09:30 - 11:00");
}

#[tokio::test]
async fn test_create_lesson_request_reports_each_field() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;

    let (name, value) = as_user(&student);
    let response = ctx
        .server
        .post("/dashboard/lesson-request/")
        .add_header(name, value)
        .form(&[
            ("knowledge_area", "cobol"),
            ("term", "sept-dec"),
            ("start_time", "07:30"),
            ("venue_preference", "online"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    let fields = &body["fields"];
    assert_eq!(fields["start_time"][0], "The start time must be between 08:00 and 20:00.");
    assert_eq!(fields["duration"][0], "This field is required.");
    assert_eq!(fields["days"][0], "This field is required.");
    assert!(fields["knowledge_area"].is_array());
    assert!(fields.get("term").is_none());

    assert!(ctx.store.lesson_requests_for_student(student.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_lesson_request_not_for_tutors() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/dashboard/lesson-request/")
        .add_header(name, value)
        .form(&request_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert!(ctx.store.all_lesson_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_view_lesson_requests_lists_only_own() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;
    let other = ctx.user(Role::Student).await;
    for start in [t(9, 0), t(13, 0)] {
        ctx.store
            .create_lesson_request(student.id, lesson(Some(start), LessonDuration::HalfHour))
            .await
            .unwrap();
    }
    ctx.store
        .create_lesson_request(other.id, lesson(Some(t(15, 0)), LessonDuration::HalfHour))
        .await
        .unwrap();

    let (name, value) = as_user(&student);
    let response = ctx
        .server
        .get("/dashboard/view-lesson-request/")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let requests = body.as_array().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r["student_id"] == student.id.to_string()));
}

#[tokio::test]
async fn test_update_lesson_times_recomputes() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;
    let request = ctx
        .store
        .create_lesson_request(student.id, lesson(Some(t(9, 30)), LessonDuration::HourAndHalf))
        .await
        .unwrap();

    let (name, value) = as_user(&student);
    let response = ctx
        .server
        .post(&format!("/dashboard/lesson-request/{}/", request.id))
        .add_header(name, value)
        .form(&[("start_time", "14:00"), ("duration", "60")])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let updated = ctx.store.get_lesson_request(request.id).await.unwrap().unwrap();
    assert_eq!(updated.start_time, Some(t(14, 0)));
    assert_eq!(updated.end_time, Some(t(15, 0)));
    assert_eq!(updated.time_of_day, Some(TimeOfDay::Afternoon));
}

#[tokio::test]
async fn test_update_lesson_times_clearing_start() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;
    let admin = ctx.user(Role::Admin).await;
    let request = ctx
        .store
        .create_lesson_request(student.id, lesson(Some(t(10, 0)), LessonDuration::Hour))
        .await
        .unwrap();

    // An admin may edit any request
    let (name, value) = as_user(&admin);
    let response = ctx
        .server
        .post(&format!("/dashboard/lesson-request/{}/", request.id))
        .add_header(name, value)
        .form(&[("start_time", ""), ("duration", "60")])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["start_time"], Value::Null);
    assert_eq!(body["end_time"], Value::Null);
    assert_eq!(body["time_of_day"], Value::Null);
}

#[tokio::test]
async fn test_update_lesson_times_owner_only() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;
    let other = ctx.user(Role::Student).await;
    let request = ctx
        .store
        .create_lesson_request(student.id, lesson(Some(t(10, 0)), LessonDuration::Hour))
        .await
        .unwrap();

    let (name, value) = as_user(&other);
    let response = ctx
        .server
        .post(&format!("/dashboard/lesson-request/{}/", request.id))
        .add_header(name, value)
        .form(&[("start_time", "14:00"), ("duration", "60")])
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let unchanged = ctx.store.get_lesson_request(request.id).await.unwrap().unwrap();
    assert_eq!(unchanged.start_time, Some(t(10, 0)));

    // Unknown request
    let (name, value) = as_id(student.id);
    let response = ctx
        .server
        .post(&format!("/dashboard/lesson-request/{}/", Uuid::new_v4()))
        .add_header(name, value)
        .form(&[("start_time", "14:00"), ("duration", "60")])
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
