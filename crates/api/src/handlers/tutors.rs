use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tutorsync_core::{
    errors::TutorResult,
    models::{
        profile::{filter_by_subjects, TutorListing, TutorProfile},
        user::Role,
    },
};
use tutorsync_db::Store;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

/// Every tutor with profile and availability, in store order. Read only: a
/// tutor without a stored profile is listed with an empty one.
pub async fn tutor_listings(store: &dyn Store) -> TutorResult<Vec<TutorListing>> {
    let tutors = store.list_users_by_role(Role::Tutor).await?;
    let mut listings = Vec::with_capacity(tutors.len());
    for tutor in tutors {
        let profile = store
            .find_profile(tutor.id)
            .await?
            .unwrap_or_else(|| TutorProfile::empty(tutor.id));
        let availability = store.list_availability(tutor.id).await?;
        listings.push(TutorListing {
            tutor,
            profile,
            availability,
        });
    }
    Ok(listings)
}

/// Tutor directory. Repeated `subjects` parameters keep tutors teaching any
/// of them.
#[axum::debug_handler]
pub async fn list_tutors(
    State(state): State<Arc<ApiState>>,
    _current: CurrentUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<TutorListing>>, AppError> {
    let filters: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "subjects")
        .map(|(_, value)| value)
        .collect();

    let listings = tutor_listings(state.store.as_ref()).await?;
    Ok(Json(filter_by_subjects(listings, &filters)))
}
