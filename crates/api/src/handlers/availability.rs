use axum::{extract::State, Form, Json};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tutorsync_core::models::{
    availability::{entries_from_form, entries_from_json, AvailabilityWindow},
    user::Role,
};

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Current weekly windows of the calling tutor.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<AvailabilityWindow>>, AppError> {
    let tutor = current.require(&[Role::Tutor])?;
    let windows = state.store.list_availability(tutor.id).await?;
    Ok(Json(windows))
}

/// Replaces the caller's windows with the submitted weekly form.
///
/// Submitting with no day enabled clears every window. A repeated day field
/// is rejected with 422 and nothing is written.
#[axum::debug_handler]
pub async fn save_availability(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Json<Vec<AvailabilityWindow>>, AppError> {
    let tutor = current.require(&[Role::Tutor])?;
    let entries = entries_from_form(&fields)?;

    tracing::info!("Replacing availability of tutor {} with {} windows", tutor.id, entries.len());
    let windows = state.store.replace_availability(tutor.id, entries).await?;
    Ok(Json(windows))
}

/// JSON variant allowing several windows per day.
#[axum::debug_handler]
pub async fn save_availability_json(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Json(body): Json<HashMap<String, Value>>,
) -> Result<Json<Vec<AvailabilityWindow>>, AppError> {
    let tutor = current.require(&[Role::Tutor])?;
    let entries = entries_from_json(&body)?;

    tracing::info!("Replacing availability of tutor {} with {} windows", tutor.id, entries.len());
    let windows = state.store.replace_availability(tutor.id, entries).await?;
    Ok(Json(windows))
}
