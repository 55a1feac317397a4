//! # Scheduling Workflow
//!
//! Admin-only conversion of a student's pending lesson request into a
//! meeting. The role check runs before anything is read, so a refused
//! caller never touches the student's data.
//!
//! GET returns the context the form is filled from: the student, the
//! request that will be converted, the pre-filled window and the tutor
//! directory. POST validates the submission, runs the configured
//! [`MeetingValidator`](tutorsync_core::scheduling::MeetingValidator), then
//! creates the meeting and deletes the request in one write.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use serde::Serialize;
use std::sync::Arc;
use tutorsync_core::{
    errors::{FieldErrors, TutorError, TutorResult},
    models::{
        lesson::LessonRequest,
        meeting::{Meeting, ScheduleSessionForm},
        profile::TutorListing,
        user::{Role, User},
    },
    scheduling::SessionWindow,
};
use uuid::Uuid;

use super::tutors::tutor_listings;
use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Serialize)]
pub struct ScheduleContext {
    pub student: User,
    pub pending_request: Option<LessonRequest>,
    pub initial: SessionWindow,
    pub tutors: Vec<TutorListing>,
}

#[axum::debug_handler]
pub async fn schedule_form(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(student_id): Path<String>,
) -> Result<Json<ScheduleContext>, AppError> {
    current.require(&[Role::Admin])?;
    let student = load_student(&state, &student_id).await?;

    let pending_request = state.store.pending_lesson_request(student.id).await?;
    let initial = SessionWindow::prefill(pending_request.as_ref());
    let tutors = tutor_listings(state.store.as_ref()).await?;

    Ok(Json(ScheduleContext {
        student,
        pending_request,
        initial,
        tutors,
    }))
}

#[axum::debug_handler]
pub async fn schedule_session(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Path(student_id): Path<String>,
    Form(form): Form<ScheduleSessionForm>,
) -> Result<(StatusCode, Json<Meeting>), AppError> {
    let admin = current.require(&[Role::Admin])?;
    let student = load_student(&state, &student_id).await?;
    let pending_request = state.store.pending_lesson_request(student.id).await?;

    let new_meeting = form.validate(student.id)?;
    ensure_tutor(&state, new_meeting.tutor_id).await?;
    state.validator.check(&new_meeting)?;

    let retire = pending_request.map(|request| request.id);
    let meeting = state.store.schedule_meeting(new_meeting, retire).await?;

    tracing::info!(
        "Admin {} scheduled meeting {} for student {} (retired request: {:?})",
        admin.id,
        meeting.id,
        student.id,
        retire
    );

    Ok((StatusCode::CREATED, Json(meeting)))
}

/// Resolves the path id to a student. An unparsable id, an unknown id and a
/// non-student user all read as not found.
async fn load_student(state: &ApiState, raw_id: &str) -> TutorResult<User> {
    let not_found = || TutorError::NotFound(format!("Student with ID {raw_id} not found"));

    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;
    match state.store.get_user(id).await? {
        Some(user) if user.is(Role::Student) => Ok(user),
        _ => Err(not_found()),
    }
}

async fn ensure_tutor(state: &ApiState, tutor_id: Uuid) -> TutorResult<()> {
    match state.store.get_user(tutor_id).await? {
        Some(user) if user.is(Role::Tutor) => Ok(()),
        _ => {
            let mut errors = FieldErrors::new();
            errors.add("tutor_id", "Select a valid tutor.");
            Err(errors.into())
        }
    }
}
