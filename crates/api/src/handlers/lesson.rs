use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tutorsync_core::{
    errors::TutorError,
    models::{
        lesson::{KnowledgeArea, LessonDuration, LessonRequest, LessonRequestForm, LessonTimesForm, Term, Venue},
        user::Role,
        weekday,
    },
};
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Values the lesson request form accepts.
#[derive(Debug, Serialize)]
pub struct LessonChoices {
    pub knowledge_areas: Vec<&'static str>,
    pub terms: Vec<&'static str>,
    pub venues: Vec<&'static str>,
    pub durations: Vec<i32>,
    pub days: Vec<&'static str>,
}

impl LessonChoices {
    pub fn all() -> Self {
        Self {
            knowledge_areas: KnowledgeArea::ALL.iter().map(KnowledgeArea::as_str).collect(),
            terms: Term::ALL.iter().map(Term::as_str).collect(),
            venues: Venue::ALL.iter().map(Venue::as_str).collect(),
            durations: LessonDuration::ALL.iter().map(LessonDuration::minutes).collect(),
            days: weekday::WEEK.iter().map(|day| weekday::short_code(*day)).collect(),
        }
    }
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn lesson_request_form(current: CurrentUser) -> Result<Json<LessonChoices>, AppError> {
    current.require(&[Role::Student, Role::Admin])?;
    Ok(Json(LessonChoices::all()))
}

/// Files a lesson request for the caller. `days` may repeat in the body.
#[axum::debug_handler]
pub async fn create_lesson_request(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<LessonRequest>), AppError> {
    let user = current.require(&[Role::Student, Role::Admin])?;
    let new_request = LessonRequestForm::from_pairs(pairs).validate()?;

    let request = state.store.create_lesson_request(user.id, new_request).await?;
    tracing::info!("User {} filed lesson request {}", user.id, request.id);

    Ok((StatusCode::CREATED, Json(request)))
}

/// The caller's own requests, oldest first.
#[axum::debug_handler]
pub async fn view_lesson_requests(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LessonRequest>>, AppError> {
    let requests = state.store.lesson_requests_for_student(user.id).await?;
    Ok(Json(requests))
}

/// Changes the start time or duration of a request; end time and time of
/// day are re-derived by the store.
#[axum::debug_handler]
pub async fn update_lesson_times(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Form(form): Form<LessonTimesForm>,
) -> Result<Json<LessonRequest>, AppError> {
    let request = state
        .store
        .get_lesson_request(id)
        .await?
        .ok_or_else(|| TutorError::NotFound(format!("Lesson request with ID {id} not found")))?;

    if request.student_id != user.id && !user.is(Role::Admin) {
        return Err(TutorError::Authorization("Only the requesting student or an admin may edit this request".into()).into());
    }

    let (start_time, duration) = form.validate()?;
    let updated = state.store.update_lesson_times(id, start_time, duration).await?;
    Ok(Json(updated))
}
