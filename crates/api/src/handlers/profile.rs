use axum::{extract::State, Form, Json};
use std::{collections::HashMap, sync::Arc};
use tutorsync_core::models::{
    profile::{parse_hourly_rate, validate_custom_subject, TutorProfile},
    user::Role,
};

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Sets the caller's hourly rate. A blank value leaves the profile as is.
#[axum::debug_handler]
pub async fn save_hourly_rate(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<TutorProfile>, AppError> {
    let tutor = current.require(&[Role::Tutor])?;

    let raw = fields.get("hourly_rate").map(|v| v.trim()).unwrap_or_default();
    if raw.is_empty() {
        let profile = state.store.get_or_create_profile(tutor.id).await?;
        return Ok(Json(profile));
    }

    let rate = parse_hourly_rate(raw)?;
    let profile = state.store.set_hourly_rate(tutor.id, rate).await?;
    Ok(Json(profile))
}

/// Replaces the caller's subject list with every submitted `subjects` value.
#[axum::debug_handler]
pub async fn save_subjects(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<TutorProfile>, AppError> {
    let tutor = current.require(&[Role::Tutor])?;

    let subjects: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| key == "subjects")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

    let profile = state.store.set_subjects(tutor.id, subjects).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn add_custom_subject(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<TutorProfile>, AppError> {
    let tutor = current.require(&[Role::Tutor])?;
    let subject = validate_custom_subject(fields.get("custom_subject").map(String::as_str))?;

    let profile = state.store.add_custom_subject(tutor.id, subject).await?;
    Ok(Json(profile))
}
