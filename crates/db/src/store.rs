//! # Store
//!
//! The persistence boundary the HTTP layer talks to. [`PgStore`] is the
//! production implementation over the repository functions; the `mock`
//! module carries an in-memory store and a `mockall` double.
//!
//! Every method reports failures in the domain taxonomy: constraint
//! violations surface as [`TutorError::Integrity`], missing rows on update as
//! [`TutorError::NotFound`].

use async_trait::async_trait;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use tutorsync_core::errors::{TutorError, TutorResult};
use tutorsync_core::models::{
    availability::{AvailabilityEntry, AvailabilityWindow},
    lesson::{LessonDuration, LessonRequest, NewLessonRequest},
    meeting::{Meeting, MeetingDetail, NewMeeting},
    profile::TutorProfile,
    user::{NewUser, Role, User},
};
use tutorsync_core::scheduling::pick_pending;
use uuid::Uuid;

use crate::models::convert_all;
use crate::repositories::{availability, lesson, meeting, profile, user};
use crate::{classify_error, DbPool};

#[async_trait]
pub trait Store: Send + Sync {
    // Users
    async fn create_user(&self, user: NewUser) -> TutorResult<User>;
    async fn get_user(&self, id: Uuid) -> TutorResult<Option<User>>;
    async fn list_users_by_role(&self, role: Role) -> TutorResult<Vec<User>>;

    // Lesson requests
    /// Persists a request, deriving its end time and time of day. A request
    /// without a duration fails with an integrity error.
    async fn create_lesson_request(
        &self,
        student_id: Uuid,
        request: NewLessonRequest,
    ) -> TutorResult<LessonRequest>;
    async fn get_lesson_request(&self, id: Uuid) -> TutorResult<Option<LessonRequest>>;
    /// Re-times a request and re-derives its dependent fields.
    async fn update_lesson_times(
        &self,
        id: Uuid,
        start_time: Option<NaiveTime>,
        duration: LessonDuration,
    ) -> TutorResult<LessonRequest>;
    /// The student's requests, oldest first.
    async fn lesson_requests_for_student(&self, student_id: Uuid) -> TutorResult<Vec<LessonRequest>>;
    /// Every request, most recent first.
    async fn all_lesson_requests(&self) -> TutorResult<Vec<LessonRequest>>;

    // Meetings
    /// Creates the meeting and deletes `retire_request` atomically.
    async fn schedule_meeting(
        &self,
        meeting: NewMeeting,
        retire_request: Option<Uuid>,
    ) -> TutorResult<Meeting>;
    async fn get_meeting(&self, id: Uuid) -> TutorResult<Option<Meeting>>;
    async fn update_meeting_notes(&self, id: Uuid, notes: String) -> TutorResult<Meeting>;
    async fn meetings_for_tutor_month(
        &self,
        tutor_id: Uuid,
        year: i32,
        month: u32,
    ) -> TutorResult<Vec<MeetingDetail>>;
    /// Meetings visible to a user: their own as student or tutor, all for an
    /// admin. Ordered by date, then start time.
    async fn meetings_for_user(&self, user_id: Uuid, role: Role) -> TutorResult<Vec<MeetingDetail>>;

    // Availability
    async fn replace_availability(
        &self,
        tutor_id: Uuid,
        entries: Vec<AvailabilityEntry>,
    ) -> TutorResult<Vec<AvailabilityWindow>>;
    async fn list_availability(&self, tutor_id: Uuid) -> TutorResult<Vec<AvailabilityWindow>>;

    // Profiles
    async fn get_or_create_profile(&self, tutor_id: Uuid) -> TutorResult<TutorProfile>;
    /// `None` when the tutor has no profile row yet. Never writes.
    async fn find_profile(&self, tutor_id: Uuid) -> TutorResult<Option<TutorProfile>>;
    async fn set_hourly_rate(&self, tutor_id: Uuid, rate: Decimal) -> TutorResult<TutorProfile>;
    async fn set_subjects(&self, tutor_id: Uuid, subjects: Vec<String>) -> TutorResult<TutorProfile>;
    async fn add_custom_subject(&self, tutor_id: Uuid, subject: String) -> TutorResult<TutorProfile>;

    /// The request an admin would convert for `student_id`.
    async fn pending_lesson_request(&self, student_id: Uuid) -> TutorResult<Option<LessonRequest>> {
        let requests = self.lesson_requests_for_student(student_id).await?;
        Ok(pick_pending(&requests).cloned())
    }
}

/// [`Store`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new_user: NewUser) -> TutorResult<User> {
        new_user.validate()?;
        let row = user::create_user(&self.pool, &new_user)
            .await
            .map_err(classify_error)?;
        Ok(row.into())
    }

    async fn get_user(&self, id: Uuid) -> TutorResult<Option<User>> {
        let row = user::get_user_by_id(&self.pool, id)
            .await
            .map_err(classify_error)?;
        Ok(row.map(User::from))
    }

    async fn list_users_by_role(&self, role: Role) -> TutorResult<Vec<User>> {
        let rows = user::get_users_by_role(&self.pool, role)
            .await
            .map_err(classify_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create_lesson_request(
        &self,
        student_id: Uuid,
        request: NewLessonRequest,
    ) -> TutorResult<LessonRequest> {
        let row = lesson::create_lesson_request(&self.pool, student_id, &request)
            .await
            .map_err(classify_error)?;
        Ok(LessonRequest::try_from(row)?)
    }

    async fn get_lesson_request(&self, id: Uuid) -> TutorResult<Option<LessonRequest>> {
        let row = lesson::get_lesson_request_by_id(&self.pool, id)
            .await
            .map_err(classify_error)?;
        Ok(row.map(LessonRequest::try_from).transpose()?)
    }

    async fn update_lesson_times(
        &self,
        id: Uuid,
        start_time: Option<NaiveTime>,
        duration: LessonDuration,
    ) -> TutorResult<LessonRequest> {
        let row = lesson::update_lesson_times(&self.pool, id, start_time, duration)
            .await
            .map_err(classify_error)?
            .ok_or_else(|| TutorError::NotFound(format!("Lesson request {id} not found")))?;
        Ok(LessonRequest::try_from(row)?)
    }

    async fn lesson_requests_for_student(&self, student_id: Uuid) -> TutorResult<Vec<LessonRequest>> {
        let rows = lesson::get_lesson_requests_by_student(&self.pool, student_id)
            .await
            .map_err(classify_error)?;
        Ok(convert_all(rows)?)
    }

    async fn all_lesson_requests(&self) -> TutorResult<Vec<LessonRequest>> {
        let rows = lesson::get_all_lesson_requests(&self.pool)
            .await
            .map_err(classify_error)?;
        Ok(convert_all(rows)?)
    }

    async fn schedule_meeting(
        &self,
        new_meeting: NewMeeting,
        retire_request: Option<Uuid>,
    ) -> TutorResult<Meeting> {
        let row = meeting::create_meeting(&self.pool, &new_meeting, retire_request)
            .await
            .map_err(classify_error)?;
        Ok(Meeting::try_from(row)?)
    }

    async fn get_meeting(&self, id: Uuid) -> TutorResult<Option<Meeting>> {
        let row = meeting::get_meeting_by_id(&self.pool, id)
            .await
            .map_err(classify_error)?;
        Ok(row.map(Meeting::try_from).transpose()?)
    }

    async fn update_meeting_notes(&self, id: Uuid, notes: String) -> TutorResult<Meeting> {
        let row = meeting::update_meeting_notes(&self.pool, id, &notes)
            .await
            .map_err(classify_error)?
            .ok_or_else(|| TutorError::NotFound(format!("Meeting {id} not found")))?;
        Ok(Meeting::try_from(row)?)
    }

    async fn meetings_for_tutor_month(
        &self,
        tutor_id: Uuid,
        year: i32,
        month: u32,
    ) -> TutorResult<Vec<MeetingDetail>> {
        let rows = meeting::get_tutor_meetings_for_month(&self.pool, tutor_id, year, month)
            .await
            .map_err(classify_error)?;
        Ok(convert_all(rows)?)
    }

    async fn meetings_for_user(&self, user_id: Uuid, role: Role) -> TutorResult<Vec<MeetingDetail>> {
        let (student_id, tutor_id) = match role {
            Role::Student => (Some(user_id), None),
            Role::Tutor => (None, Some(user_id)),
            Role::Admin => (None, None),
        };
        let rows = meeting::get_meeting_details(&self.pool, student_id, tutor_id)
            .await
            .map_err(classify_error)?;
        Ok(convert_all(rows)?)
    }

    async fn replace_availability(
        &self,
        tutor_id: Uuid,
        entries: Vec<AvailabilityEntry>,
    ) -> TutorResult<Vec<AvailabilityWindow>> {
        let rows = availability::replace_availability(&self.pool, tutor_id, &entries)
            .await
            .map_err(classify_error)?;
        Ok(convert_all(rows)?)
    }

    async fn list_availability(&self, tutor_id: Uuid) -> TutorResult<Vec<AvailabilityWindow>> {
        let rows = availability::get_availability_by_tutor(&self.pool, tutor_id)
            .await
            .map_err(classify_error)?;
        Ok(convert_all(rows)?)
    }

    async fn get_or_create_profile(&self, tutor_id: Uuid) -> TutorResult<TutorProfile> {
        let row = profile::get_or_create_profile(&self.pool, tutor_id)
            .await
            .map_err(classify_error)?;
        Ok(row.into())
    }

    async fn find_profile(&self, tutor_id: Uuid) -> TutorResult<Option<TutorProfile>> {
        let row = profile::find_profile(&self.pool, tutor_id)
            .await
            .map_err(classify_error)?;
        Ok(row.map(Into::into))
    }

    async fn set_hourly_rate(&self, tutor_id: Uuid, rate: Decimal) -> TutorResult<TutorProfile> {
        let row = profile::set_hourly_rate(&self.pool, tutor_id, rate)
            .await
            .map_err(classify_error)?;
        Ok(row.into())
    }

    async fn set_subjects(&self, tutor_id: Uuid, subjects: Vec<String>) -> TutorResult<TutorProfile> {
        let row = profile::set_subjects(&self.pool, tutor_id, &subjects)
            .await
            .map_err(classify_error)?;
        Ok(row.into())
    }

    async fn add_custom_subject(&self, tutor_id: Uuid, subject: String) -> TutorResult<TutorProfile> {
        let row = profile::add_subject(&self.pool, tutor_id, &subject)
            .await
            .map_err(classify_error)?;
        Ok(row.into())
    }
}
