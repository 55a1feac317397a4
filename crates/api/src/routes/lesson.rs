use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::lesson, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/dashboard/lesson-request/",
            get(lesson::lesson_request_form).post(lesson::create_lesson_request),
        )
        .route("/dashboard/lesson-request/:id/", post(lesson::update_lesson_times))
        .route("/dashboard/view-lesson-request/", get(lesson::view_lesson_requests))
}
