use axum::http::StatusCode;
use serde_json::Value;
use tutorsync_core::models::user::Role;
use tutorsync_db::Store;
use uuid::Uuid;

use crate::test_utils::{as_user, meeting, t, today, TestContext};

#[tokio::test]
async fn test_participants_can_save_notes() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    let student = ctx.user(Role::Student).await;
    let created = ctx
        .store
        .schedule_meeting(meeting(&tutor, &student, today(), t(9, 0)), None)
        .await
        .unwrap();

    for (author, notes) in [(&tutor, "Covered traits"), (&student, "Need more practice")] {
        let (name, value) = as_user(author);
        let response = ctx
            .server
            .post("/tutor/save-lesson-notes/")
            .add_header(name, value)
            .form(&[("lesson_id", created.id.to_string()), ("notes", notes.to_string())])
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["notes"], notes);
    }

    let stored = ctx.store.get_meeting(created.id).await.unwrap().unwrap();
    assert_eq!(stored.notes, "Need more practice");
}

#[tokio::test]
async fn test_outsiders_cannot_save_notes() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    let student = ctx.user(Role::Student).await;
    let admin = ctx.user(Role::Admin).await;
    let other_tutor = ctx.user(Role::Tutor).await;
    let created = ctx
        .store
        .schedule_meeting(meeting(&tutor, &student, today(), t(9, 0)), None)
        .await
        .unwrap();

    for outsider in [&admin, &other_tutor] {
        let (name, value) = as_user(outsider);
        let response = ctx
            .server
            .post("/tutor/save-lesson-notes/")
            .add_header(name, value)
            .form(&[("lesson_id", created.id.to_string()), ("notes", "overwritten".to_string())])
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    let stored = ctx.store.get_meeting(created.id).await.unwrap().unwrap();
    assert_eq!(stored.notes, "");
}

#[tokio::test]
async fn test_notes_for_unknown_meeting() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;

    let (name, value) = as_user(&tutor);
    let response = ctx
        .server
        .post("/tutor/save-lesson-notes/")
        .add_header(name, value)
        .form(&[("lesson_id", Uuid::new_v4().to_string()), ("notes", "hello".to_string())])
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
