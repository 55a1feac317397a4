use axum::{extract::State, Form, Json};
use std::sync::Arc;
use tutorsync_core::{
    errors::TutorError,
    models::meeting::{LessonNotesForm, Meeting},
};

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Overwrites the notes of a meeting the caller takes part in.
#[axum::debug_handler]
pub async fn save_lesson_notes(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<LessonNotesForm>,
) -> Result<Json<Meeting>, AppError> {
    let meeting = state
        .store
        .get_meeting(form.lesson_id)
        .await?
        .ok_or_else(|| TutorError::NotFound(format!("Meeting with ID {} not found", form.lesson_id)))?;

    if !meeting.is_participant(user.id) {
        tracing::warn!("User {} tried to edit notes of meeting {}", user.id, meeting.id);
        return Err(TutorError::Authorization("Only the meeting's student or tutor may edit its notes".into()).into());
    }

    let updated = state.store.update_meeting_notes(meeting.id, form.notes).await?;
    Ok(Json(updated))
}
