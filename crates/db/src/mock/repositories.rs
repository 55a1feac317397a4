use async_trait::async_trait;
use chrono::NaiveTime;
use mockall::mock;
use rust_decimal::Decimal;
use tutorsync_core::errors::TutorResult;
use tutorsync_core::models::{
    availability::{AvailabilityEntry, AvailabilityWindow},
    lesson::{LessonDuration, LessonRequest, NewLessonRequest},
    meeting::{Meeting, MeetingDetail, NewMeeting},
    profile::TutorProfile,
    user::{NewUser, Role, User},
};
use uuid::Uuid;

use crate::store::Store;

// Mock store for testing
mock! {
    pub Store {}

    #[async_trait]
    impl Store for Store {
        async fn create_user(&self, user: NewUser) -> TutorResult<User>;
        async fn get_user(&self, id: Uuid) -> TutorResult<Option<User>>;
        async fn list_users_by_role(&self, role: Role) -> TutorResult<Vec<User>>;

        async fn create_lesson_request(
            &self,
            student_id: Uuid,
            request: NewLessonRequest,
        ) -> TutorResult<LessonRequest>;
        async fn get_lesson_request(&self, id: Uuid) -> TutorResult<Option<LessonRequest>>;
        async fn update_lesson_times(
            &self,
            id: Uuid,
            start_time: Option<NaiveTime>,
            duration: LessonDuration,
        ) -> TutorResult<LessonRequest>;
        async fn lesson_requests_for_student(&self, student_id: Uuid) -> TutorResult<Vec<LessonRequest>>;
        async fn all_lesson_requests(&self) -> TutorResult<Vec<LessonRequest>>;
        async fn pending_lesson_request(&self, student_id: Uuid) -> TutorResult<Option<LessonRequest>>;

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
        async fn meetings_for_user(&self, user_id: Uuid, role: Role) -> TutorResult<Vec<MeetingDetail>>;

        async fn replace_availability(
            &self,
            tutor_id: Uuid,
            entries: Vec<AvailabilityEntry>,
        ) -> TutorResult<Vec<AvailabilityWindow>>;
        async fn list_availability(&self, tutor_id: Uuid) -> TutorResult<Vec<AvailabilityWindow>>;

        async fn get_or_create_profile(&self, tutor_id: Uuid) -> TutorResult<TutorProfile>;
        async fn find_profile(&self, tutor_id: Uuid) -> TutorResult<Option<TutorProfile>>;
        async fn set_hourly_rate(&self, tutor_id: Uuid, rate: Decimal) -> TutorResult<TutorProfile>;
        async fn set_subjects(&self, tutor_id: Uuid, subjects: Vec<String>) -> TutorResult<TutorProfile>;
        async fn add_custom_subject(&self, tutor_id: Uuid, subject: String) -> TutorResult<TutorProfile>;
    }
}
