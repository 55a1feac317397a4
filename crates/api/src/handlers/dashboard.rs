//! # Dashboard Handlers
//!
//! One entry point for every role. The caller's role picks the view:
//!
//! - **Tutor**: profile, subject catalogue, availability, and the month
//!   calendar for `?month=&year=` (the clock's current month by default)
//! - **Student**: own meetings and lesson requests
//! - **Admin**: user totals, every lesson request and every meeting

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tutorsync_core::{
    calendar::{CalendarData, TutorCalendar},
    errors::TutorResult,
    models::{
        availability::AvailabilityWindow,
        lesson::LessonRequest,
        meeting::MeetingDetail,
        profile::{TutorProfile, SUBJECT_CATALOGUE},
        user::{Role, User},
    },
};

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectGroup {
    pub field: &'static str,
    pub subjects: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TutorDashboard {
    pub user: User,
    pub profile: TutorProfile,
    pub hourly_rate: Option<Decimal>,
    pub subject_catalogue: Vec<SubjectGroup>,
    pub selected_subjects: Vec<String>,
    pub availability: Vec<AvailabilityWindow>,
    pub meetings: Vec<MeetingDetail>,
    pub calendar: CalendarData,
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub user: User,
    pub meetings: Vec<MeetingDetail>,
    pub lesson_requests: Vec<LessonRequest>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub user: User,
    pub total_students: usize,
    pub total_tutors: usize,
    pub lesson_requests: Vec<LessonRequest>,
    pub meetings: Vec<MeetingDetail>,
}

/// Dashboard content, tagged with the role it was built for.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum DashboardView {
    Tutor(TutorDashboard),
    Student(StudentDashboard),
    Admin(AdminDashboard),
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<DashboardView>, AppError> {
    tracing::debug!("Building {} dashboard for user {}", user.role, user.id);

    let view = match user.role {
        Role::Tutor => DashboardView::Tutor(tutor_dashboard(&state, user, query).await?),
        Role::Student => DashboardView::Student(student_dashboard(&state, user).await?),
        Role::Admin => DashboardView::Admin(admin_dashboard(&state, user).await?),
    };

    Ok(Json(view))
}

/// Meetings visible to the caller, by date then start time.
#[axum::debug_handler]
pub async fn my_meetings(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<MeetingDetail>>, AppError> {
    let meetings = state.store.meetings_for_user(user.id, user.role).await?;
    Ok(Json(meetings))
}

pub fn subject_catalogue() -> Vec<SubjectGroup> {
    SUBJECT_CATALOGUE
        .iter()
        .map(|(field, subjects)| SubjectGroup {
            field,
            subjects: subjects.to_vec(),
        })
        .collect()
}

async fn tutor_dashboard(state: &ApiState, user: User, query: MonthQuery) -> TutorResult<TutorDashboard> {
    let calendar = TutorCalendar::for_query(query.year, query.month, state.clock.as_ref())?;

    let profile = state.store.get_or_create_profile(user.id).await?;
    let availability = state.store.list_availability(user.id).await?;
    let meetings = state
        .store
        .meetings_for_tutor_month(user.id, calendar.year(), calendar.month())
        .await?;
    let calendar_data = calendar.build(Some(meetings.as_slice()), Some(availability.as_slice()), state.clock.as_ref());

    Ok(TutorDashboard {
        hourly_rate: profile.hourly_rate,
        selected_subjects: profile.subjects.clone(),
        subject_catalogue: subject_catalogue(),
        user,
        profile,
        availability,
        meetings,
        calendar: calendar_data,
    })
}

async fn student_dashboard(state: &ApiState, user: User) -> TutorResult<StudentDashboard> {
    let meetings = state.store.meetings_for_user(user.id, Role::Student).await?;
    let lesson_requests = state.store.lesson_requests_for_student(user.id).await?;

    Ok(StudentDashboard {
        user,
        meetings,
        lesson_requests,
    })
}

async fn admin_dashboard(state: &ApiState, user: User) -> TutorResult<AdminDashboard> {
    let total_students = state.store.list_users_by_role(Role::Student).await?.len();
    let total_tutors = state.store.list_users_by_role(Role::Tutor).await?.len();
    let lesson_requests = state.store.all_lesson_requests().await?;
    let meetings = state.store.meetings_for_user(user.id, Role::Admin).await?;

    Ok(AdminDashboard {
        user,
        total_students,
        total_tutors,
        lesson_requests,
        meetings,
    })
}
