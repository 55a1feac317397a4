use axum::http::StatusCode;
use serde_json::Value;
use tutorsync_core::models::{lesson::LessonDuration, user::Role};
use tutorsync_db::Store;
use uuid::Uuid;

use crate::test_utils::{as_id, as_user, lesson, meeting, t, today, TestContext};

fn find_day<'a>(calendar: &'a Value, day: u64) -> &'a Value {
    calendar["weeks"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|week| week.as_array().unwrap())
        .find(|cell| cell["day"].as_u64() == Some(day))
        .unwrap()
}

#[tokio::test]
async fn test_dashboard_requires_identity() {
    let ctx = TestContext::new();

    // No header at all
    let response = ctx.server.get("/dashboard/").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // A well-formed id nobody owns
    let (name, value) = as_id(Uuid::new_v4());
    let response = ctx.server.get("/dashboard/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tutor_dashboard_defaults_to_current_month() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    let student = ctx.user(Role::Student).await;

    // Two meetings on the 15th, stored out of order
    ctx.store.schedule_meeting(meeting(&tutor, &student, today(), t(11, 0)), None).await.unwrap();
    ctx.store.schedule_meeting(meeting(&tutor, &student, today(), t(9, 0)), None).await.unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx.server.get("/dashboard/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["role"], "tutor");
    assert_eq!(body["hourly_rate"], Value::Null);
    assert_eq!(body["selected_subjects"], serde_json::json!([]));
    assert_eq!(body["subject_catalogue"][0]["field"], "Computer Programming");

    let calendar = &body["calendar"];
    assert_eq!(calendar["month"], 3);
    assert_eq!(calendar["year"], 2024);
    assert_eq!(calendar["month_name"], "March");

    let fifteenth = find_day(calendar, 15);
    assert_eq!(fifteenth["is_today"], true);
    assert_eq!(fifteenth["weekday"], "Friday");
    let meetings = fifteenth["meetings"].as_array().unwrap();
    assert_eq!(meetings.len(), 2);
    assert_eq!(meetings[0]["start"], "09:00");
    assert_eq!(meetings[0]["end"], "10:00");
    assert_eq!(meetings[1]["start"], "11:00");
    assert_eq!(meetings[0]["type"], "meeting");
}

#[tokio::test]
async fn test_tutor_dashboard_month_navigation() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .get("/dashboard/?month=12&year=2024")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let calendar = &body["calendar"];
    assert_eq!(calendar["next_month"], serde_json::json!({ "month": 1, "year": 2025 }));
    assert_eq!(calendar["prev_month"], serde_json::json!({ "month": 11, "year": 2024 }));

    // Viewing another month flags no day as today
    let flagged = calendar["weeks"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|week| week.as_array().unwrap())
        .filter(|cell| cell["is_today"] == true)
        .count();
    assert_eq!(flagged, 0);
}

#[tokio::test]
async fn test_tutor_dashboard_rejects_invalid_month() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .get("/dashboard/?month=13&year=2024")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_dashboard_shows_own_data() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    let student = ctx.user(Role::Student).await;
    let other = ctx.user(Role::Student).await;

    ctx.store
        .create_lesson_request(student.id, lesson(Some(t(10, 0)), LessonDuration::Hour))
        .await
        .unwrap();
    ctx.store
        .create_lesson_request(other.id, lesson(Some(t(14, 0)), LessonDuration::Hour))
        .await
        .unwrap();
    ctx.store.schedule_meeting(meeting(&tutor, &student, today(), t(9, 0)), None).await.unwrap();
    ctx.store.schedule_meeting(meeting(&tutor, &other, today(), t(13, 0)), None).await.unwrap();

    let (name, value) = as_user(&student);
    let response = ctx.server.get("/dashboard/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["role"], "student");
    assert_eq!(body["lesson_requests"].as_array().unwrap().len(), 1);
    assert_eq!(body["lesson_requests"][0]["end_time"], "11:00:00");
    assert_eq!(body["meetings"].as_array().unwrap().len(), 1);
    assert_eq!(body["meetings"][0]["student_id"], student.id.to_string());
}

#[tokio::test]
async fn test_admin_dashboard_counts_users() {
    let ctx = TestContext::new();
    let admin = ctx.user(Role::Admin).await;
    let tutor = ctx.user(Role::Tutor).await;
    let first = ctx.user(Role::Student).await;
    let second = ctx.user(Role::Student).await;

    ctx.store.schedule_meeting(meeting(&tutor, &first, today(), t(9, 0)), None).await.unwrap();
    ctx.store.schedule_meeting(meeting(&tutor, &second, today(), t(13, 0)), None).await.unwrap();

    let (name, value) = as_user(&admin);
    let response = ctx.server.post("/dashboard/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["role"], "admin");
    assert_eq!(body["total_students"], 2);
    assert_eq!(body["total_tutors"], 1);
    assert_eq!(body["meetings"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_my_meetings_for_tutor() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    let other_tutor = ctx.user(Role::Tutor).await;
    let student = ctx.user(Role::Student).await;

    ctx.store.schedule_meeting(meeting(&tutor, &student, today(), t(9, 0)), None).await.unwrap();
    ctx.store.schedule_meeting(meeting(&other_tutor, &student, today(), t(13, 0)), None).await.unwrap();

    let (name, value) = as_user(&tutor);
    let response = ctx.server.get("/dashboard/meetings/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let meetings = body.as_array().unwrap();
    assert_eq!(meetings.len(), 1);
    assert_eq!(meetings[0]["tutor_name"], tutor.full_name());
}
