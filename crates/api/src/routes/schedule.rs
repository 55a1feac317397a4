use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::schedule, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/schedule-session/:student_id/",
        get(schedule::schedule_form).post(schedule::schedule_session),
    )
}
