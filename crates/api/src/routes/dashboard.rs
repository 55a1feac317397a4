use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::dashboard, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/dashboard/", get(dashboard::dashboard).post(dashboard::dashboard))
        .route("/dashboard/meetings/", get(dashboard::my_meetings))
}
