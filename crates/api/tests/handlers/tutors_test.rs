use axum::http::StatusCode;
use serde_json::Value;
use tutorsync_core::models::user::{Role, User};
use tutorsync_db::Store;

use crate::test_utils::{as_user, TestContext};

async fn tutor_teaching(ctx: &TestContext, subjects: &[&str]) -> User {
    let tutor = ctx.user(Role::Tutor).await;
    ctx.store
        .set_subjects(tutor.id, subjects.iter().map(|s| s.to_string()).collect())
        .await
        .unwrap();
    tutor
}

fn listed_ids(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|listing| listing["tutor"]["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_tutor_directory_filters_by_subject() {
    let ctx = TestContext::new();
    let student = ctx.user(Role::Student).await;
    let rubyist = tutor_teaching(&ctx, &["Ruby", "Swift"]).await;
    let java_dev = tutor_teaching(&ctx, &["Java"]).await;
    let _scala_dev = tutor_teaching(&ctx, &["Scala"]).await;

    let (name, value) = as_user(&student);
    let response = ctx
        .server
        .get("/tutors/?subjects=ruby&subjects=JAVA")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let mut expected = vec![rubyist.id.to_string(), java_dev.id.to_string()];
    expected.sort();
    assert_eq!(listed_ids(&response.json()), expected);
}

#[tokio::test]
async fn test_tutor_directory_without_filter_lists_all() {
    let ctx = TestContext::new();
    let admin = ctx.user(Role::Admin).await;
    tutor_teaching(&ctx, &["Ruby"]).await;
    tutor_teaching(&ctx, &[]).await;

    let (name, value) = as_user(&admin);
    let response = ctx.server.get("/tutors/").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tutor_directory_requires_identity() {
    let ctx = TestContext::new();
    let response = ctx.server.get("/tutors/").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
