use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::tutors, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/tutors/", get(tutors::list_tutors))
}
