use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    handlers::{availability, meeting, profile},
    ApiState,
};

/// Routes a tutor uses to maintain their own data.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/tutor/availability/save",
            get(availability::get_availability).post(availability::save_availability),
        )
        .route("/api/tutor/availability", post(availability::save_availability_json))
        .route("/tutor/hourly-rate/save", post(profile::save_hourly_rate))
        .route("/tutor/subjects/save", post(profile::save_subjects))
        .route("/tutor/subjects/custom", post(profile::add_custom_subject))
        .route("/tutor/save-lesson-notes/", post(meeting::save_lesson_notes))
}
