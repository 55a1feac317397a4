use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::Value;
use tutorsync_api::middleware::{
    auth::{CurrentUser, USER_ID_HEADER},
    error_handling::{map_error, AppError},
};
use tutorsync_core::{
    errors::{FieldErrors, TutorError},
    models::user::Role,
};

use crate::test_utils::TestContext;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_error_handling_not_found() {
    let response = map_error(TutorError::NotFound("Student not found".to_string()));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Resource not found: Student not found");
}

#[tokio::test]
async fn test_error_handling_validation() {
    let response = map_error(TutorError::Validation("Invalid month".to_string()));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_invalid_form() {
    let mut errors = FieldErrors::new();
    errors.add("start_time", "Enter a valid time.");

    let response = map_error(errors.into());
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["fields"]["start_time"][0], "Enter a valid time.");
}

#[tokio::test]
async fn test_error_handling_authentication() {
    let response = map_error(TutorError::Authentication("Missing X-User-Id header".to_string()));
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_handling_authorization() {
    let response = map_error(TutorError::Authorization("Admin role required".to_string()));
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_handling_integrity() {
    let response = map_error(TutorError::Integrity("duplicate availability window".to_string()));
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_database() {
    let response = map_error(TutorError::Database(eyre::eyre!("Database error")));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: AppError = eyre::eyre!("pool timed out").into();
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = TutorError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));
    let response = map_error(error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_require_role() {
    let ctx = TestContext::new();
    let tutor = ctx.user(Role::Tutor).await;
    let current = CurrentUser(tutor.clone());

    assert_eq!(current.require(&[Role::Tutor]).unwrap().id, tutor.id);
    assert!(current.require(&[Role::Student, Role::Tutor]).is_ok());
    assert!(matches!(
        current.require(&[Role::Admin]),
        Err(TutorError::Authorization(_))
    ));
}

#[tokio::test]
async fn test_malformed_identity_header() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/dashboard/")
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_identity() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_version_reports_package() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/version").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["name"], "tutorsync-api");
}
